//! Pricing tables for the estimator
//!
//! All rates, fees and turnaround tables live in [`PricingConfig`]. The
//! built-in defaults reflect typical land-survey pricing; a TOML file can
//! override any subset of them.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use shared_types::{JobCategory, ServiceType, SiteAccess, Terrain, Vegetation};
use tracing::debug;

/// Complete set of pricing and scheduling tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Starting price per survey type
    pub base_prices: BTreeMap<ServiceType, f64>,
    /// Multiplier applied to the base price per property class
    pub category_multipliers: BTreeMap<JobCategory, f64>,
    /// Fraction of the field base charged per terrain tier
    pub terrain_surcharges: BTreeMap<Terrain, f64>,
    /// Fraction of the field base charged per access tier
    pub access_surcharges: BTreeMap<SiteAccess, f64>,
    /// Fraction of the field base charged per vegetation tier
    pub vegetation_surcharges: BTreeMap<Vegetation, f64>,
    /// Flat filing and recording fee, always charged
    pub permit_fee: f64,
    /// Rush surcharge as a fraction of the field-work subtotal
    pub rush_rate: f64,
    /// Discount when monuments already exist, as a fraction of the subtotal
    pub marker_discount_rate: f64,
    pub size: SizeTiers,
    pub shape: ShapePricing,
    pub services: ServicePricing,
    pub research: ResearchPricing,
    pub complexity: ComplexityBands,
    pub timeline: TimelineTable,
    pub advisories: AdvisoryThresholds,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_prices: BTreeMap::from([
                (ServiceType::Boundary, 500.0),
                (ServiceType::Mortgage, 350.0),
                (ServiceType::Topographic, 900.0),
                (ServiceType::Alta, 2_500.0),
                (ServiceType::Subdivision, 1_800.0),
                (ServiceType::ConstructionStaking, 750.0),
            ]),
            category_multipliers: BTreeMap::from([
                (JobCategory::Residential, 1.0),
                (JobCategory::Commercial, 1.4),
                (JobCategory::Industrial, 1.6),
                (JobCategory::Agricultural, 0.9),
                (JobCategory::Vacant, 0.8),
            ]),
            terrain_surcharges: BTreeMap::from([
                (Terrain::Flat, 0.0),
                (Terrain::Rolling, 0.10),
                (Terrain::Hilly, 0.25),
                (Terrain::Mountainous, 0.40),
                (Terrain::Extreme, 0.60),
            ]),
            access_surcharges: BTreeMap::from([
                (SiteAccess::Easy, 0.0),
                (SiteAccess::Moderate, 0.10),
                (SiteAccess::Difficult, 0.25),
                (SiteAccess::Remote, 0.45),
            ]),
            vegetation_surcharges: BTreeMap::from([
                (Vegetation::Clear, 0.0),
                (Vegetation::Light, 0.05),
                (Vegetation::Moderate, 0.15),
                (Vegetation::Heavy, 0.30),
                (Vegetation::Dense, 0.45),
            ]),
            permit_fee: 125.0,
            rush_rate: 0.25,
            marker_discount_rate: 0.10,
            size: SizeTiers::default(),
            shape: ShapePricing::default(),
            services: ServicePricing::default(),
            research: ResearchPricing::default(),
            complexity: ComplexityBands::default(),
            timeline: TimelineTable::default(),
            advisories: AdvisoryThresholds::default(),
        }
    }
}

/// Staircase for the size adjustment, in acres
///
/// ```text
/// acres <= free_up_to                 0
/// acres <= small_up_to                small_flat
/// acres <= medium_up_to               small_flat + medium_rate * (acres - small_up_to)
/// acres <= large_up_to                large_flat + large_rate  * (acres - medium_up_to)
/// acres >  large_up_to                estate_flat + estate_rate * (acres - large_up_to)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeTiers {
    pub free_up_to: f64,
    pub small_up_to: f64,
    pub medium_up_to: f64,
    pub large_up_to: f64,
    pub small_flat: f64,
    pub medium_rate: f64,
    pub large_flat: f64,
    pub large_rate: f64,
    pub estate_flat: f64,
    pub estate_rate: f64,
}

impl Default for SizeTiers {
    fn default() -> Self {
        Self {
            free_up_to: 0.25,
            small_up_to: 1.0,
            medium_up_to: 5.0,
            large_up_to: 10.0,
            small_flat: 150.0,
            medium_rate: 100.0,
            large_flat: 550.0,
            large_rate: 75.0,
            estate_flat: 925.0,
            estate_rate: 40.0,
        }
    }
}

/// Surcharge for parcels with more sides than a simple rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapePricing {
    /// Segments and corners up to this count are free
    pub baseline: u32,
    pub per_extra_segment: f64,
    pub per_extra_corner: f64,
}

impl Default for ShapePricing {
    fn default() -> Self {
        Self {
            baseline: 4,
            per_extra_segment: 50.0,
            per_extra_corner: 25.0,
        }
    }
}

/// Prices for the add-on services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicePricing {
    pub monumentation_per_corner: f64,
    pub topographic_flat: f64,
    pub topographic_per_acre: f64,
    pub elevation_certificate: f64,
    pub flood_determination: f64,
    pub utility_location: f64,
}

impl Default for ServicePricing {
    fn default() -> Self {
        Self {
            monumentation_per_corner: 75.0,
            topographic_flat: 400.0,
            topographic_per_acre: 150.0,
            elevation_certificate: 250.0,
            flood_determination: 100.0,
            utility_location: 300.0,
        }
    }
}

/// Deed and plat research fees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchPricing {
    /// A prior survey younger than `recent_years` exists
    pub recent_fee: f64,
    /// A prior survey exists but is at least `recent_years` old
    pub stale_fee: f64,
    /// No prior survey on record
    pub no_record_fee: f64,
    pub recent_years: f64,
}

impl Default for ResearchPricing {
    fn default() -> Self {
        Self {
            recent_fee: 150.0,
            stale_fee: 350.0,
            no_record_fee: 600.0,
            recent_years: 10.0,
        }
    }
}

/// Cut-offs for the complexity tier and the width of each tier's price band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityBands {
    /// Adjustment ratio at which a job stops being standard
    pub moderate_from: f64,
    /// Adjustment ratio at which a job becomes complex
    pub complex_from: f64,
    pub standard_spread: f64,
    pub moderate_spread: f64,
    pub complex_spread: f64,
}

impl Default for ComplexityBands {
    fn default() -> Self {
        Self {
            moderate_from: 0.15,
            complex_from: 0.40,
            standard_spread: 0.10,
            moderate_spread: 0.15,
            complex_spread: 0.25,
        }
    }
}

/// Turnaround table, keyed by the same service types as the price table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineTable {
    pub base_days: BTreeMap<ServiceType, u32>,
    /// Parcels above this size get extra days for every further full step
    pub size_step_acres: f64,
    pub days_per_size_step: u32,
    /// Added for hilly and mountainous terrain
    pub rough_terrain_days: u32,
    /// Added for the extreme terrain tier
    pub extreme_terrain_days: u32,
}

impl Default for TimelineTable {
    fn default() -> Self {
        Self {
            base_days: BTreeMap::from([
                (ServiceType::Boundary, 10),
                (ServiceType::Mortgage, 5),
                (ServiceType::Topographic, 14),
                (ServiceType::Alta, 21),
                (ServiceType::Subdivision, 30),
                (ServiceType::ConstructionStaking, 7),
            ]),
            size_step_acres: 5.0,
            days_per_size_step: 2,
            rough_terrain_days: 3,
            extreme_terrain_days: 7,
        }
    }
}

impl TimelineTable {
    /// Base turnaround for a service type; unknown types get the shortest
    pub fn base_days(&self, service: ServiceType) -> u32 {
        match self.base_days.get(&service) {
            Some(days) => *days,
            None => {
                let fallback = self.base_days.values().copied().min().unwrap_or(1);
                debug!(?service, fallback, "no turnaround for service type, using shortest");
                fallback
            }
        }
    }
}

/// Thresholds used by the advisory rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryThresholds {
    pub high_total: f64,
    pub large_area_acres: f64,
}

impl Default for AdvisoryThresholds {
    fn default() -> Self {
        Self {
            high_total: 5_000.0,
            large_area_acres: 20.0,
        }
    }
}

impl PricingConfig {
    /// Load pricing from a TOML file
    ///
    /// Tables present in the file replace only the entries they name; every
    /// other value keeps its built-in default.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    /// - The resulting tables fail [`PricingConfig::validate`]
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read pricing file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("Invalid pricing file: {}", path.display()))
    }

    /// Parse pricing from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use survey_estimator::pricing::PricingConfig;
    /// use shared_types::ServiceType;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let pricing = PricingConfig::from_str(r#"
    ///     permit_fee = 90.0
    ///
    ///     [base_prices]
    ///     boundary = 650.0
    /// "#)?;
    /// assert_eq!(pricing.base_price(ServiceType::Boundary), 650.0);
    /// assert_eq!(pricing.base_price(ServiceType::Mortgage), 350.0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let parsed: PricingConfig =
            toml::from_str(s).context("Failed to parse TOML pricing configuration")?;
        let pricing = parsed.with_default_entries();
        pricing.validate()?;
        Ok(pricing)
    }

    /// Fill table entries a partial configuration left out
    fn with_default_entries(mut self) -> Self {
        let defaults = PricingConfig::default();
        merge_missing(&mut self.base_prices, defaults.base_prices);
        merge_missing(&mut self.category_multipliers, defaults.category_multipliers);
        merge_missing(&mut self.terrain_surcharges, defaults.terrain_surcharges);
        merge_missing(&mut self.access_surcharges, defaults.access_surcharges);
        merge_missing(&mut self.vegetation_surcharges, defaults.vegetation_surcharges);
        merge_missing(&mut self.timeline.base_days, defaults.timeline.base_days);
        self
    }

    /// Check that the tables can only ever produce non-negative,
    /// area-monotone prices
    pub fn validate(&self) -> anyhow::Result<()> {
        let maps = [
            ("base_prices", collect_values(&self.base_prices)),
            ("category_multipliers", collect_values(&self.category_multipliers)),
            ("terrain_surcharges", collect_values(&self.terrain_surcharges)),
            ("access_surcharges", collect_values(&self.access_surcharges)),
            ("vegetation_surcharges", collect_values(&self.vegetation_surcharges)),
        ];
        for (name, values) in &maps {
            for value in values {
                ensure!(
                    value.is_finite() && *value >= 0.0,
                    "{} contains a negative or non-finite value: {}",
                    name,
                    value
                );
            }
        }
        ensure!(!self.base_prices.is_empty(), "base_prices must not be empty");

        // Unrecognised keys would otherwise price the Unknown fallback
        ensure!(
            !self.category_multipliers.contains_key(&JobCategory::Unknown),
            "category_multipliers contains a key that is not a known category"
        );
        ensure!(
            !self.terrain_surcharges.contains_key(&Terrain::Unknown),
            "terrain_surcharges contains a key that is not a known terrain tier"
        );
        ensure!(
            !self.access_surcharges.contains_key(&SiteAccess::Unknown),
            "access_surcharges contains a key that is not a known access tier"
        );
        ensure!(
            !self.vegetation_surcharges.contains_key(&Vegetation::Unknown),
            "vegetation_surcharges contains a key that is not a known vegetation tier"
        );

        ensure_rising_tiers("terrain_surcharges", Terrain::all(), |t| {
            self.terrain_surcharge(t)
        })?;
        ensure_rising_tiers("access_surcharges", SiteAccess::all(), |a| {
            self.access_surcharge(a)
        })?;
        ensure_rising_tiers("vegetation_surcharges", Vegetation::all(), |v| {
            self.vegetation_surcharge(v)
        })?;

        let amounts = [
            ("permit_fee", self.permit_fee),
            ("shape.per_extra_segment", self.shape.per_extra_segment),
            ("shape.per_extra_corner", self.shape.per_extra_corner),
            ("services.monumentation_per_corner", self.services.monumentation_per_corner),
            ("services.topographic_flat", self.services.topographic_flat),
            ("services.topographic_per_acre", self.services.topographic_per_acre),
            ("services.elevation_certificate", self.services.elevation_certificate),
            ("services.flood_determination", self.services.flood_determination),
            ("services.utility_location", self.services.utility_location),
            ("research.recent_fee", self.research.recent_fee),
            ("research.stale_fee", self.research.stale_fee),
            ("research.no_record_fee", self.research.no_record_fee),
            ("size.small_flat", self.size.small_flat),
            ("size.medium_rate", self.size.medium_rate),
            ("size.large_rate", self.size.large_rate),
            ("size.estate_rate", self.size.estate_rate),
        ];
        for (name, value) in amounts {
            ensure!(
                value.is_finite() && value >= 0.0,
                "{} must be a non-negative amount (got {})",
                name,
                value
            );
        }

        ensure!(
            (0.0..=1.0).contains(&self.rush_rate),
            "rush_rate must be between 0 and 1 (got {})",
            self.rush_rate
        );
        ensure!(
            (0.0..=1.0).contains(&self.marker_discount_rate),
            "marker_discount_rate must be between 0 and 1 (got {})",
            self.marker_discount_rate
        );

        let size = &self.size;
        ensure!(
            0.0 <= size.free_up_to
                && size.free_up_to < size.small_up_to
                && size.small_up_to < size.medium_up_to
                && size.medium_up_to < size.large_up_to,
            "size breakpoints must be strictly increasing"
        );
        let medium_end = size.small_flat + size.medium_rate * (size.medium_up_to - size.small_up_to);
        ensure!(
            size.large_flat >= medium_end,
            "size.large_flat ({}) is below the medium tier's end ({})",
            size.large_flat,
            medium_end
        );
        let large_end = size.large_flat + size.large_rate * (size.large_up_to - size.medium_up_to);
        ensure!(
            size.estate_flat >= large_end,
            "size.estate_flat ({}) is below the large tier's end ({})",
            size.estate_flat,
            large_end
        );

        ensure!(
            self.research.recent_years > 0.0,
            "research.recent_years must be positive"
        );
        ensure!(
            self.timeline.size_step_acres > 0.0,
            "timeline.size_step_acres must be positive"
        );

        let bands = &self.complexity;
        ensure!(
            0.0 <= bands.moderate_from && bands.moderate_from <= bands.complex_from,
            "complexity thresholds must be ordered"
        );
        for spread in [
            bands.standard_spread,
            bands.moderate_spread,
            bands.complex_spread,
        ] {
            ensure!(
                (0.0..=1.0).contains(&spread),
                "complexity spreads must be between 0 and 1 (got {})",
                spread
            );
        }

        Ok(())
    }

    /// Base price for a service type; unknown types get the cheapest price
    pub fn base_price(&self, service: ServiceType) -> f64 {
        match self.base_prices.get(&service) {
            Some(price) => *price,
            None => {
                let fallback = self
                    .base_prices
                    .values()
                    .copied()
                    .reduce(f64::min)
                    .unwrap_or(0.0);
                debug!(?service, fallback, "no base price for service type, using cheapest");
                fallback
            }
        }
    }

    /// Category multiplier; unknown categories are priced at 1.0
    pub fn category_multiplier(&self, category: JobCategory) -> f64 {
        lookup_or(&self.category_multipliers, category, 1.0)
    }

    pub fn terrain_surcharge(&self, terrain: Terrain) -> f64 {
        lookup_or(&self.terrain_surcharges, terrain, 0.0)
    }

    pub fn access_surcharge(&self, access: SiteAccess) -> f64 {
        lookup_or(&self.access_surcharges, access, 0.0)
    }

    pub fn vegetation_surcharge(&self, vegetation: Vegetation) -> f64 {
        lookup_or(&self.vegetation_surcharges, vegetation, 0.0)
    }
}

fn lookup_or<K>(table: &BTreeMap<K, f64>, key: K, fallback: f64) -> f64
where
    K: Ord + std::fmt::Debug,
{
    match table.get(&key) {
        Some(value) => *value,
        None => {
            debug!(?key, fallback, "no table entry, using fallback");
            fallback
        }
    }
}

/// Surcharges must start at zero and never fall as the tier gets harder
fn ensure_rising_tiers<K>(
    name: &str,
    tiers: &[K],
    surcharge: impl Fn(K) -> f64,
) -> anyhow::Result<()>
where
    K: Copy + std::fmt::Debug,
{
    let Some(easiest) = tiers.first() else {
        return Ok(());
    };
    ensure!(
        surcharge(*easiest) == 0.0,
        "{} must charge nothing for the easiest tier {:?} (got {})",
        name,
        easiest,
        surcharge(*easiest)
    );
    for pair in tiers.windows(2) {
        let (easier, harder) = (surcharge(pair[0]), surcharge(pair[1]));
        ensure!(
            easier <= harder,
            "{}: {:?} ({}) is cheaper than the easier tier {:?} ({})",
            name,
            pair[1],
            harder,
            pair[0],
            easier
        );
    }
    Ok(())
}

fn merge_missing<K: Ord, V>(target: &mut BTreeMap<K, V>, defaults: BTreeMap<K, V>) {
    for (key, value) in defaults {
        target.entry(key).or_insert(value);
    }
}

fn collect_values<K>(table: &BTreeMap<K, f64>) -> Vec<f64> {
    table.values().copied().collect()
}
