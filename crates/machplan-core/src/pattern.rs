//! Detected feature patterns: linear rows, bolt circles, grids and mirror
//! symmetry. A pattern references member features by id only; it owns
//! nothing, and one feature belongs to at most one pattern
//! (first-detected-wins).

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::feature::FeatureId;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PatternId(pub u32);

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Pattern kinds in fixed detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PatternType {
    Linear,
    Circular,
    Grid,
    Mirror,
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "Linear Pattern"),
            Self::Circular => write!(f, "Circular Pattern (Bolt Circle)"),
            Self::Grid => write!(f, "Grid Pattern (2D Array)"),
            Self::Mirror => write!(f, "Mirror Symmetry"),
        }
    }
}

/// Canonical mirror planes through the part origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MirrorPlane {
    /// Mirror across the XY plane (flips Z).
    Xy,
    /// Mirror across the XZ plane (flips Y).
    Xz,
    /// Mirror across the YZ plane (flips X).
    Yz,
}

impl MirrorPlane {
    /// Index of the coordinate the plane negates.
    pub fn flip_axis(&self) -> usize {
        match self {
            Self::Xy => 2,
            Self::Xz => 1,
            Self::Yz => 0,
        }
    }
}

impl std::fmt::Display for MirrorPlane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xy => write!(f, "XY"),
            Self::Xz => write!(f, "XZ"),
            Self::Yz => write!(f, "YZ"),
        }
    }
}

/// A detected geometric pattern over a set of features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturePattern {
    pub id: PatternId,
    pub pattern_type: PatternType,
    /// Member feature ids, ordered along the pattern (by line position,
    /// angle, or grid scan order).
    pub feature_ids: Vec<FeatureId>,

    // Geometric parameters; presence depends on the pattern type.
    pub spacing: Option<f64>,
    pub direction: Option<Vector3<f64>>,
    pub center: Option<Point3<f64>>,
    pub radius: Option<f64>,
    pub angle_increment_deg: Option<f64>,
    pub rows: Option<usize>,
    pub columns: Option<usize>,
    pub row_spacing: Option<f64>,
    pub column_spacing: Option<f64>,
    pub mirror_plane: Option<MirrorPlane>,

    pub confidence: f64,
}

impl FeaturePattern {
    pub fn new(id: PatternId, pattern_type: PatternType, feature_ids: Vec<FeatureId>) -> Self {
        Self {
            id,
            pattern_type,
            feature_ids,
            spacing: None,
            direction: None,
            center: None,
            radius: None,
            angle_increment_deg: None,
            rows: None,
            columns: None,
            row_spacing: None,
            column_spacing: None,
            mirror_plane: None,
            confidence: 1.0,
        }
    }

    pub fn member_count(&self) -> usize {
        self.feature_ids.len()
    }

    /// Lowest member id, the deterministic tie-break key for result ordering.
    pub fn lowest_member(&self) -> Option<FeatureId> {
        self.feature_ids.iter().min().copied()
    }
}
