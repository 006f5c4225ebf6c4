//! # MachPlan Planner
//!
//! Orchestrates the full process-planning pipeline: feature validation,
//! pattern recognition, geometry analysis, classification, setup grouping,
//! operation generation and sequencing, and cost estimation. Produces a
//! single serializable [`PlanReport`] per run.

pub mod error;
pub mod operations;
pub mod planner;

pub use error::{PlanError, PlanResult};
pub use operations::{MachiningOperation, OperationPlanner};
pub use planner::{FeatureAssessment, PlanReport, PlanRequest, PlanSummary, ProcessPlanner};
