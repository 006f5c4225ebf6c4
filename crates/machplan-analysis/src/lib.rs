//! Analysis engines for MachPlan.
//!
//! Four independent engines over an extracted feature set:
//! - [`GeometryAnalyzer`]: undercuts, wall thickness, draft angles,
//!   accessibility and complexity scoring.
//! - [`PatternRecognizer`]: linear rows, bolt circles, grids and mirror
//!   symmetry.
//! - [`FeatureClassifier`] / [`MachinabilityScorer`]: fuzzy hole/pocket
//!   classification, multi-criteria decisions and difficulty scoring.
//! - [`AdjacencyAnalyzer`]: relationship graphs and setup grouping.
//!
//! Every engine is a pure function of its input plus a shared
//! [`Tolerances`](machplan_core::Tolerances) config; none of them mutate
//! the feature set.

pub mod adjacency;
pub mod classify;
pub mod geometry;
pub mod patterns;

pub use adjacency::AdjacencyAnalyzer;
pub use classify::{
    FeatureClassifier, MachinabilityScore, MachinabilityScorer, MultiCriteriaResult,
};
pub use geometry::{GeometryAnalyzer, ToolEnvelope};
pub use patterns::PatternRecognizer;
