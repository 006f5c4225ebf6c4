//! # MachPlan Core
//!
//! Shared data model for the MachPlan process-planning pipeline: machining
//! features and their taxonomy, detected patterns, geometry analysis
//! results, feature relationship graphs, cost breakdowns, and the
//! centralized tolerance configuration.
//!
//! Entities here are plain serializable data; the analysis engines live in
//! the sibling crates and attach their derived fields to these types.

pub mod classify;
pub mod config;
pub mod cost;
pub mod error;
pub mod feature;
pub mod geometry;
pub mod graph;
pub mod pattern;

pub use classify::{ClassLabel, ClassificationResult, Decision};
pub use config::Tolerances;
pub use cost::{round2, BatchPoint, CostBreakdown, CostDetails, RoiEstimate};
pub use error::FeatureError;
pub use feature::{
    Dimension, Feature, FeatureCategory, FeatureId, FeatureIdAllocator, FeatureType,
    ToleranceClass,
};
pub use geometry::{Difficulty, FaceSample, GeometryAnalysis, PartGeometry};
pub use graph::{
    AccessDirection, FeatureGraph, FeatureRelationship, GraphNode, RelationshipKind, Setup,
};
pub use pattern::{FeaturePattern, MirrorPlane, PatternId, PatternType};
