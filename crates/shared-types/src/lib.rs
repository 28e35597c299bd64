pub mod error;
pub mod estimate;
pub mod format;
pub mod types;

pub use error::ValidationError;
pub use estimate::{
    ComplexityTier, CostBreakdown, Estimate, LineItem, PriceRange, TimelineEstimate,
};
pub use format::format_usd;
pub use types::{
    AreaUnit, JobCategory, JobRequest, OptionalServices, ServiceType, SiteAccess, Terrain,
    Vegetation, ACRES_PER_HECTARE, MAX_AREA_ACRES, MIN_POLYGON_VERTICES, SQUARE_FEET_PER_ACRE,
    SQUARE_METERS_PER_ACRE,
};
