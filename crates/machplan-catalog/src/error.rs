//! Error types for catalog lookups.
//!
//! A lookup miss is a reportable condition for the caller ("recommendation
//! unavailable"), never a silent zero default.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// No material with this id in the catalog.
    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    /// No cutting-parameter row for this material/tool-material pair.
    #[error("No cutting parameters for {material} with {tool_material} tooling")]
    NoCuttingParameters {
        material: String,
        tool_material: String,
    },

    /// No stocked tool matches the requested type and diameter.
    #[error("No {tool_type} tool near Ø{diameter:.2} mm (±{tolerance:.2} mm)")]
    NoToolFound {
        tool_type: String,
        diameter: f64,
        tolerance: f64,
    },

    /// No rate entry for this machine class.
    #[error("Unknown machine class: {0}")]
    UnknownMachine(String),

    /// Tool life is zero or negative; cost per operation is undefined.
    #[error("Tool {tool_id} has non-positive tool life ({life_minutes} min)")]
    InvalidToolLife { tool_id: String, life_minutes: f64 },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
