//! Turnaround estimation
//!
//! Independent of the price: only the service type, parcel size, terrain and
//! rush flag matter.

use shared_types::{ServiceType, Terrain, TimelineEstimate};

use crate::pricing::TimelineTable;

/// Estimate delivery time in business days
///
/// Rush jobs take half the normal schedule, rounded up, so a rushed job is
/// still proportional to its size and terrain.
pub fn estimate_days(
    service_type: ServiceType,
    acres: f64,
    terrain: Terrain,
    rush: bool,
    table: &TimelineTable,
) -> TimelineEstimate {
    let mut days = table.base_days(service_type);

    // +N days per full size step beyond the first
    if acres > table.size_step_acres {
        let steps = ((acres - table.size_step_acres) / table.size_step_acres).floor() as u32;
        days = days.saturating_add(steps.saturating_mul(table.days_per_size_step));
    }

    days = days.saturating_add(match terrain {
        Terrain::Hilly | Terrain::Mountainous => table.rough_terrain_days,
        Terrain::Extreme => table.extreme_terrain_days,
        _ => 0,
    });

    if rush {
        days = days.div_ceil(2);
    }

    TimelineEstimate {
        days: days.max(1),
        expedited: rush,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(service: ServiceType, acres: f64, terrain: Terrain, rush: bool) -> u32 {
        estimate_days(service, acres, terrain, rush, &TimelineTable::default()).days
    }

    #[test]
    fn test_base_days_per_service() {
        assert_eq!(days(ServiceType::Boundary, 1.0, Terrain::Flat, false), 10);
        assert_eq!(days(ServiceType::Mortgage, 1.0, Terrain::Flat, false), 5);
        assert_eq!(days(ServiceType::Subdivision, 1.0, Terrain::Flat, false), 30);
    }

    #[test]
    fn test_large_parcels_add_days_per_full_step() {
        assert_eq!(days(ServiceType::Boundary, 5.0, Terrain::Flat, false), 10);
        assert_eq!(days(ServiceType::Boundary, 9.9, Terrain::Flat, false), 10);
        assert_eq!(days(ServiceType::Boundary, 10.0, Terrain::Flat, false), 12);
        assert_eq!(days(ServiceType::Boundary, 27.0, Terrain::Flat, false), 18);
    }

    #[test]
    fn test_terrain_adds_days() {
        assert_eq!(days(ServiceType::Boundary, 1.0, Terrain::Rolling, false), 10);
        assert_eq!(days(ServiceType::Boundary, 1.0, Terrain::Hilly, false), 13);
        assert_eq!(days(ServiceType::Boundary, 1.0, Terrain::Mountainous, false), 13);
        assert_eq!(days(ServiceType::Boundary, 1.0, Terrain::Extreme, false), 17);
        assert_eq!(days(ServiceType::Boundary, 1.0, Terrain::Unknown, false), 10);
    }

    #[test]
    fn test_rush_halves_and_rounds_up() {
        assert_eq!(days(ServiceType::Boundary, 1.0, Terrain::Flat, true), 5);
        assert_eq!(days(ServiceType::Boundary, 1.0, Terrain::Hilly, true), 7);
        assert_eq!(days(ServiceType::Mortgage, 1.0, Terrain::Flat, true), 3);

        let estimate = estimate_days(
            ServiceType::Boundary,
            1.0,
            Terrain::Flat,
            true,
            &TimelineTable::default(),
        );
        assert!(estimate.expedited);
    }

    #[test]
    fn test_never_below_one_day() {
        let mut table = TimelineTable::default();
        table.base_days.insert(ServiceType::Mortgage, 0);
        assert_eq!(
            estimate_days(ServiceType::Mortgage, 0.1, Terrain::Flat, false, &table).days,
            1
        );
        table.base_days.insert(ServiceType::Mortgage, 1);
        assert_eq!(
            estimate_days(ServiceType::Mortgage, 0.1, Terrain::Flat, true, &table).days,
            1
        );
    }

    #[test]
    fn test_huge_parcels_saturate_instead_of_overflowing() {
        let estimate = estimate_days(
            ServiceType::Boundary,
            1e30,
            Terrain::Extreme,
            false,
            &TimelineTable::default(),
        );
        assert_eq!(estimate.days, u32::MAX);
    }
}
