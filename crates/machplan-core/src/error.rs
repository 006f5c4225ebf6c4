//! Error types for the core data model.

use thiserror::Error;

/// Errors raised while validating a feature's dimensional attributes.
///
/// These are recoverable: the planner records them as warnings and the
/// engines produce degraded results for the affected feature.
#[derive(Error, Debug)]
pub enum FeatureError {
    /// A dimension the feature type requires is absent.
    #[error("Feature {feature}: missing required {dimension}")]
    MissingDimension { feature: u32, dimension: String },

    /// A dimension is present but zero or negative.
    #[error("Feature {feature}: invalid {dimension} = {value}")]
    InvalidDimension {
        feature: u32,
        dimension: String,
        value: f64,
    },
}
