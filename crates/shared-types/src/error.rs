use thiserror::Error;

/// Input that cannot describe a real parcel
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Area must be a positive number (got {0})")]
    NonPositiveArea(f64),

    #[error("Area is larger than any surveyable parcel ({0} acres)")]
    AreaTooLarge(f64),

    #[error("{field} must be at least 3 to close the parcel boundary (got {value})")]
    TooFewVertices { field: &'static str, value: u32 },

    #[error("Prior survey age must be a non-negative number of years (got {0})")]
    InvalidSurveyAge(f64),
}
