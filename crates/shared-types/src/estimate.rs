use serde::{Deserialize, Serialize};

/// Named charge on an estimate, in the order it is accumulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItem {
    Base,
    SizeAdjustment,
    TerrainAdjustment,
    AccessAdjustment,
    VegetationAdjustment,
    ShapeAdjustment,
    Monumentation,
    TopographicSurvey,
    ElevationCertificate,
    FloodDetermination,
    UtilityLocation,
    Research,
    Permit,
    RushSurcharge,
}

impl LineItem {
    pub fn label(&self) -> &'static str {
        match self {
            LineItem::Base => "Base survey fee",
            LineItem::SizeAdjustment => "Parcel size adjustment",
            LineItem::TerrainAdjustment => "Terrain adjustment",
            LineItem::AccessAdjustment => "Site access adjustment",
            LineItem::VegetationAdjustment => "Vegetation adjustment",
            LineItem::ShapeAdjustment => "Irregular shape adjustment",
            LineItem::Monumentation => "Corner monumentation",
            LineItem::TopographicSurvey => "Topographic survey",
            LineItem::ElevationCertificate => "Elevation certificate",
            LineItem::FloodDetermination => "Flood zone determination",
            LineItem::UtilityLocation => "Utility location",
            LineItem::Research => "Records research",
            LineItem::Permit => "Filing & recording fees",
            LineItem::RushSurcharge => "Rush surcharge",
        }
    }
}

/// Itemized price of one survey job
///
/// Every line item is always present; services that were not ordered are
/// exactly `0.0`. `total` is `subtotal() - discount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Service base price with the category multiplier applied
    pub base: f64,
    pub size_adjustment: f64,
    pub terrain_adjustment: f64,
    pub access_adjustment: f64,
    pub vegetation_adjustment: f64,
    pub shape_adjustment: f64,
    pub monumentation: f64,
    pub topographic_survey: f64,
    pub elevation_certificate: f64,
    pub flood_determination: f64,
    pub utility_location: f64,
    pub research: f64,
    pub permit: f64,
    pub rush_surcharge: f64,
    pub discount: f64,
    pub total: f64,
    pub cost_per_acre: f64,
}

impl CostBreakdown {
    /// All line items in accumulation order, zeros included
    pub fn line_items(&self) -> [(LineItem, f64); 14] {
        [
            (LineItem::Base, self.base),
            (LineItem::SizeAdjustment, self.size_adjustment),
            (LineItem::TerrainAdjustment, self.terrain_adjustment),
            (LineItem::AccessAdjustment, self.access_adjustment),
            (LineItem::VegetationAdjustment, self.vegetation_adjustment),
            (LineItem::ShapeAdjustment, self.shape_adjustment),
            (LineItem::Monumentation, self.monumentation),
            (LineItem::TopographicSurvey, self.topographic_survey),
            (LineItem::ElevationCertificate, self.elevation_certificate),
            (LineItem::FloodDetermination, self.flood_determination),
            (LineItem::UtilityLocation, self.utility_location),
            (LineItem::Research, self.research),
            (LineItem::Permit, self.permit),
            (LineItem::RushSurcharge, self.rush_surcharge),
        ]
    }

    /// Line items worth showing on an invoice
    pub fn itemized(&self) -> Vec<(LineItem, f64)> {
        self.line_items()
            .into_iter()
            .filter(|(_, amount)| *amount != 0.0)
            .collect()
    }

    /// Pre-discount sum of all line items
    pub fn subtotal(&self) -> f64 {
        self.line_items().iter().map(|(_, amount)| amount).sum()
    }

    /// Base plus size: the amount the difficulty percentages apply to
    pub fn field_base(&self) -> f64 {
        self.base + self.size_adjustment
    }

    /// Difficulty and shape surcharges on top of the field base
    pub fn field_adjustments(&self) -> f64 {
        self.terrain_adjustment
            + self.access_adjustment
            + self.vegetation_adjustment
            + self.shape_adjustment
    }

    pub fn optional_services(&self) -> f64 {
        self.monumentation
            + self.topographic_survey
            + self.elevation_certificate
            + self.flood_determination
            + self.utility_location
    }
}

/// Expected turnaround
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEstimate {
    /// Business days until delivery, never below 1
    pub days: u32,
    pub expedited: bool,
}

/// How predictable the quote is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTier {
    Standard,
    Moderate,
    Complex,
}

impl ComplexityTier {
    pub fn label(&self) -> &'static str {
        match self {
            ComplexityTier::Standard => "Standard",
            ComplexityTier::Moderate => "Moderate complexity",
            ComplexityTier::Complex => "High complexity",
        }
    }
}

/// Band a real quote is likely to land in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

/// Complete result for one [`crate::JobRequest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Parcel area in acres
    pub normalized_area: f64,
    pub breakdown: CostBreakdown,
    pub complexity: ComplexityTier,
    pub price_range: PriceRange,
    pub timeline: TimelineEstimate,
    pub advisories: Vec<String>,
}
