//! Classification result types shared between the classifier engine and the
//! planner report.

use serde::{Deserialize, Serialize};

use crate::feature::FeatureId;

/// Classification labels the fuzzy classifier distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassLabel {
    Hole,
    Pocket,
}

impl std::fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hole => write!(f, "hole"),
            Self::Pocket => write!(f, "pocket"),
        }
    }
}

/// Outcome of fuzzy classification for one feature. Produced once per
/// feature per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub feature_id: FeatureId,
    pub primary: ClassLabel,
    /// Membership value of the primary label, 0.0..=1.0.
    pub confidence: f64,
    /// Other labels with membership above the alternative floor, sorted by
    /// descending membership.
    pub alternatives: Vec<(ClassLabel, f64)>,
    pub reasoning: Vec<String>,
}

/// Multi-criteria decision verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Accept,
    Uncertain,
    Reject,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accept => write!(f, "accept"),
            Self::Uncertain => write!(f, "uncertain"),
            Self::Reject => write!(f, "reject"),
        }
    }
}
