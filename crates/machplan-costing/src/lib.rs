//! Cost estimation for MachPlan.
//!
//! A [`CostEstimator`] built over injected machine and material catalogs
//! produces deterministic batch cost breakdowns, batch-size comparisons
//! and automation ROI estimates.

pub mod error;
pub mod estimator;

pub use error::{CostError, CostResult};
pub use estimator::{CostEstimator, CostRequest};
