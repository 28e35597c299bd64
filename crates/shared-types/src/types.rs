use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Minimum number of corners or boundary segments for a closed parcel
pub const MIN_POLYGON_VERTICES: u32 = 3;

/// Largest parcel accepted, in acres (about 1.5 million square miles)
pub const MAX_AREA_ACRES: f64 = 1.0e9;

pub const SQUARE_FEET_PER_ACRE: f64 = 43_560.0;
pub const SQUARE_METERS_PER_ACRE: f64 = 4_046.856_422_4;
pub const ACRES_PER_HECTARE: f64 = 2.471_05;

/// Units a parcel area can be entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaUnit {
    #[serde(alias = "sqft", alias = "sq_ft")]
    SquareFeet,
    #[serde(alias = "sqm", alias = "sq_m")]
    SquareMeters,
    Acres,
    #[serde(alias = "ha")]
    Hectares,
}

impl AreaUnit {
    pub fn label(&self) -> &'static str {
        match self {
            AreaUnit::SquareFeet => "sq ft",
            AreaUnit::SquareMeters => "sq m",
            AreaUnit::Acres => "acres",
            AreaUnit::Hectares => "hectares",
        }
    }

    /// Convert an area in this unit to acres
    pub fn to_acres(&self, area: f64) -> f64 {
        match self {
            AreaUnit::SquareFeet => area / SQUARE_FEET_PER_ACRE,
            AreaUnit::SquareMeters => area / SQUARE_METERS_PER_ACRE,
            AreaUnit::Acres => area,
            AreaUnit::Hectares => area * ACRES_PER_HECTARE,
        }
    }

    pub fn all() -> &'static [AreaUnit] {
        &[
            AreaUnit::SquareFeet,
            AreaUnit::SquareMeters,
            AreaUnit::Acres,
            AreaUnit::Hectares,
        ]
    }
}

/// Kind of survey being ordered
///
/// Values the client sends that are not listed here deserialize to
/// `Unknown` and are priced as the cheapest known survey.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    #[default]
    Boundary,
    Mortgage,
    Topographic,
    Alta,
    Subdivision,
    ConstructionStaking,
    #[serde(other)]
    Unknown,
}

impl ServiceType {
    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::Boundary => "Boundary Survey",
            ServiceType::Mortgage => "Mortgage / Location Survey",
            ServiceType::Topographic => "Topographic Survey",
            ServiceType::Alta => "ALTA/NSPS Land Title Survey",
            ServiceType::Subdivision => "Subdivision Plat",
            ServiceType::ConstructionStaking => "Construction Staking",
            ServiceType::Unknown => "Other Survey",
        }
    }

    /// Every priced service type, excluding `Unknown`
    pub fn all() -> &'static [ServiceType] {
        &[
            ServiceType::Boundary,
            ServiceType::Mortgage,
            ServiceType::Topographic,
            ServiceType::Alta,
            ServiceType::Subdivision,
            ServiceType::ConstructionStaking,
        ]
    }
}

/// Property class of the parcel
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum JobCategory {
    #[default]
    Residential,
    Commercial,
    Industrial,
    Agricultural,
    Vacant,
    #[serde(other)]
    Unknown,
}

impl JobCategory {
    pub fn label(&self) -> &'static str {
        match self {
            JobCategory::Residential => "Residential",
            JobCategory::Commercial => "Commercial",
            JobCategory::Industrial => "Industrial",
            JobCategory::Agricultural => "Agricultural",
            JobCategory::Vacant => "Vacant Land",
            JobCategory::Unknown => "Other",
        }
    }

    pub fn all() -> &'static [JobCategory] {
        &[
            JobCategory::Residential,
            JobCategory::Commercial,
            JobCategory::Industrial,
            JobCategory::Agricultural,
            JobCategory::Vacant,
        ]
    }
}

/// Terrain difficulty, ordered from easiest to hardest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    #[default]
    Flat,
    Rolling,
    Hilly,
    Mountainous,
    Extreme,
    #[serde(other)]
    Unknown,
}

impl Terrain {
    pub fn label(&self) -> &'static str {
        match self {
            Terrain::Flat => "Flat",
            Terrain::Rolling => "Gently rolling",
            Terrain::Hilly => "Hilly",
            Terrain::Mountainous => "Mountainous",
            Terrain::Extreme => "Extreme / cliffs",
            Terrain::Unknown => "Unspecified",
        }
    }

    /// Known tiers in ascending difficulty
    pub fn all() -> &'static [Terrain] {
        &[
            Terrain::Flat,
            Terrain::Rolling,
            Terrain::Hilly,
            Terrain::Mountainous,
            Terrain::Extreme,
        ]
    }

    /// The two steepest tiers, where field time is least predictable
    pub fn is_severe(&self) -> bool {
        matches!(self, Terrain::Mountainous | Terrain::Extreme)
    }
}

/// How hard it is to get a crew and equipment onto the site
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SiteAccess {
    #[default]
    Easy,
    Moderate,
    Difficult,
    Remote,
    #[serde(other)]
    Unknown,
}

impl SiteAccess {
    pub fn label(&self) -> &'static str {
        match self {
            SiteAccess::Easy => "Easy (road frontage)",
            SiteAccess::Moderate => "Moderate",
            SiteAccess::Difficult => "Difficult",
            SiteAccess::Remote => "Remote / no road access",
            SiteAccess::Unknown => "Unspecified",
        }
    }

    pub fn all() -> &'static [SiteAccess] {
        &[
            SiteAccess::Easy,
            SiteAccess::Moderate,
            SiteAccess::Difficult,
            SiteAccess::Remote,
        ]
    }
}

/// Vegetation density along the boundary lines
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Vegetation {
    #[default]
    #[serde(alias = "none")]
    Clear,
    Light,
    Moderate,
    Heavy,
    Dense,
    #[serde(other)]
    Unknown,
}

impl Vegetation {
    pub fn label(&self) -> &'static str {
        match self {
            Vegetation::Clear => "Clear",
            Vegetation::Light => "Light brush",
            Vegetation::Moderate => "Moderate",
            Vegetation::Heavy => "Heavy woods",
            Vegetation::Dense => "Dense / overgrown",
            Vegetation::Unknown => "Unspecified",
        }
    }

    pub fn all() -> &'static [Vegetation] {
        &[
            Vegetation::Clear,
            Vegetation::Light,
            Vegetation::Moderate,
            Vegetation::Heavy,
            Vegetation::Dense,
        ]
    }
}

/// Add-on services, each billed only when its flag is set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionalServices {
    /// Set monuments (iron pins) at every corner
    pub monumentation: bool,
    /// Topographic survey performed alongside the primary survey
    pub topographic: bool,
    pub elevation_certificate: bool,
    pub flood_determination: bool,
    pub utility_location: bool,
}

impl OptionalServices {
    pub fn any(&self) -> bool {
        self.monumentation
            || self.topographic
            || self.elevation_certificate
            || self.flood_determination
            || self.utility_location
    }
}

/// Everything the estimator needs to price one survey job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    #[serde(default)]
    pub service_type: ServiceType,
    #[serde(default)]
    pub category: JobCategory,
    pub area: f64,
    pub area_unit: AreaUnit,
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub access: SiteAccess,
    #[serde(default)]
    pub vegetation: Vegetation,
    #[serde(default = "default_vertex_count")]
    pub boundary_segments: u32,
    #[serde(default = "default_vertex_count")]
    pub corners: u32,
    #[serde(default)]
    pub options: OptionalServices,
    /// A previous survey or plat of this parcel exists
    #[serde(default)]
    pub has_prior_survey: bool,
    /// Age of that survey; ignored when `has_prior_survey` is false
    #[serde(default)]
    pub prior_survey_age_years: f64,
    /// Boundary monuments are already in the ground
    #[serde(default)]
    pub has_existing_markers: bool,
    #[serde(default)]
    pub rush: bool,
}

fn default_vertex_count() -> u32 {
    4
}

impl Default for JobRequest {
    fn default() -> Self {
        Self {
            service_type: ServiceType::default(),
            category: JobCategory::default(),
            area: 1.0,
            area_unit: AreaUnit::Acres,
            terrain: Terrain::default(),
            access: SiteAccess::default(),
            vegetation: Vegetation::default(),
            boundary_segments: default_vertex_count(),
            corners: default_vertex_count(),
            options: OptionalServices::default(),
            has_prior_survey: false,
            prior_survey_age_years: 0.0,
            has_existing_markers: false,
            rush: false,
        }
    }
}

impl JobRequest {
    /// Check the structural invariants the estimator relies on
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.area.is_finite() || self.area <= 0.0 {
            return Err(ValidationError::NonPositiveArea(self.area));
        }
        let acres = self.area_unit.to_acres(self.area);
        if !acres.is_finite() || acres > MAX_AREA_ACRES {
            return Err(ValidationError::AreaTooLarge(acres));
        }
        if self.boundary_segments < MIN_POLYGON_VERTICES {
            return Err(ValidationError::TooFewVertices {
                field: "boundary_segments",
                value: self.boundary_segments,
            });
        }
        if self.corners < MIN_POLYGON_VERTICES {
            return Err(ValidationError::TooFewVertices {
                field: "corners",
                value: self.corners,
            });
        }
        if self.has_prior_survey
            && (!self.prior_survey_age_years.is_finite() || self.prior_survey_age_years < 0.0)
        {
            return Err(ValidationError::InvalidSurveyAge(
                self.prior_survey_age_years,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request_is_valid() {
        assert!(JobRequest::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_area() {
        for area in [0.0, -2.5, f64::NAN, f64::INFINITY] {
            let request = JobRequest {
                area,
                ..JobRequest::default()
            };
            assert!(matches!(
                request.validate(),
                Err(ValidationError::NonPositiveArea(_))
            ));
        }
    }

    #[test]
    fn test_rejects_area_beyond_any_parcel() {
        let request = JobRequest {
            area: 1e308,
            area_unit: AreaUnit::Hectares,
            has_existing_markers: true,
            ..JobRequest::default()
        };
        assert!(matches!(
            request.validate(),
            Err(ValidationError::AreaTooLarge(_))
        ));

        let request = JobRequest {
            area: MAX_AREA_ACRES * 1.01,
            ..JobRequest::default()
        };
        assert!(request.validate().is_err());

        let request = JobRequest {
            area: MAX_AREA_ACRES,
            ..JobRequest::default()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_to_acres() {
        assert_eq!(AreaUnit::SquareFeet.to_acres(43_560.0), 1.0);
        assert_eq!(AreaUnit::Acres.to_acres(3.5), 3.5);
        assert_eq!(AreaUnit::Hectares.to_acres(1.0), ACRES_PER_HECTARE);
    }

    #[test]
    fn test_rejects_open_polygon() {
        let request = JobRequest {
            corners: 2,
            ..JobRequest::default()
        };
        assert_eq!(
            request.validate(),
            Err(ValidationError::TooFewVertices {
                field: "corners",
                value: 2
            })
        );

        let request = JobRequest {
            boundary_segments: 0,
            ..JobRequest::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_survey_age_only_checked_when_prior_survey_exists() {
        let request = JobRequest {
            prior_survey_age_years: -1.0,
            ..JobRequest::default()
        };
        assert!(request.validate().is_ok());

        let request = JobRequest {
            has_prior_survey: true,
            prior_survey_age_years: -1.0,
            ..JobRequest::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_unknown_enum_values_deserialize_to_fallback() {
        let json = r#"{
            "service_type": "drone_mapping",
            "category": "institutional",
            "area": 2.0,
            "area_unit": "acres",
            "terrain": "lunar",
            "vegetation": "none"
        }"#;
        let request: JobRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.service_type, ServiceType::Unknown);
        assert_eq!(request.category, JobCategory::Unknown);
        assert_eq!(request.terrain, Terrain::Unknown);
        assert_eq!(request.vegetation, Vegetation::Clear);
        assert_eq!(request.corners, 4);
        assert!(!request.options.any());
    }

    #[test]
    fn test_unknown_area_unit_is_rejected() {
        let json = r#"{ "area": 2.0, "area_unit": "furlongs" }"#;
        assert!(serde_json::from_str::<JobRequest>(json).is_err());
    }

    #[test]
    fn test_area_unit_aliases() {
        let unit: AreaUnit = serde_json::from_str(r#""sqft""#).unwrap();
        assert_eq!(unit, AreaUnit::SquareFeet);
        let unit: AreaUnit = serde_json::from_str(r#""ha""#).unwrap();
        assert_eq!(unit, AreaUnit::Hectares);
    }

    #[test]
    fn test_difficulty_tiers_are_ordered() {
        assert!(Terrain::all().windows(2).all(|w| w[0] < w[1]));
        assert!(SiteAccess::all().windows(2).all(|w| w[0] < w[1]));
        assert!(Vegetation::all().windows(2).all(|w| w[0] < w[1]));
    }
}
