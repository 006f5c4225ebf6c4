//! Feature relationship graph: a derived, disposable view over the current
//! feature set. Nodes are feature ids, edges carry a relationship kind and
//! strength. Nothing here owns a feature.

use serde::{Deserialize, Serialize};

use crate::feature::{FeatureId, FeatureType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipKind {
    Adjacent,
    Contained,
    Overlapping,
    ParentChild,
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Adjacent => write!(f, "adjacent"),
            Self::Contained => write!(f, "contained"),
            Self::Overlapping => write!(f, "overlapping"),
            Self::ParentChild => write!(f, "parent-child"),
        }
    }
}

/// Directed relationship between two features. For `ParentChild` the source
/// is the parent; other kinds are symmetric and stored with
/// `source.id < target.id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRelationship {
    pub source: FeatureId,
    pub target: FeatureId,
    pub kind: RelationshipKind,
    /// 0.0..=1.0; decreases with distance for adjacency, 1.0 for
    /// containment and parent-child.
    pub strength: f64,
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: FeatureId,
    pub feature_type: FeatureType,
    pub depth: Option<f64>,
    pub diameter: Option<f64>,
}

/// Relationship graph over the current feature set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<FeatureRelationship>,
}

/// One workholding configuration: features cut without repositioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setup {
    pub id: u32,
    pub feature_ids: Vec<FeatureId>,
    /// Shared tool approach direction for every feature in this setup.
    pub access_direction: AccessDirection,
}

/// Quantized tool approach direction used for setup grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessDirection {
    Top,
    Bottom,
    Side,
    Angled,
}

impl std::fmt::Display for AccessDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
            Self::Side => write!(f, "side"),
            Self::Angled => write!(f, "angled"),
        }
    }
}

impl AccessDirection {
    /// Classify a unit approach axis: |z| > 0.9 is top/bottom, |z| < 0.3 is
    /// side, anything between needs an angled approach.
    pub fn from_axis(axis: &nalgebra::Vector3<f64>) -> Self {
        let z = axis.z;
        if z.abs() > 0.9 {
            if z > 0.0 {
                Self::Top
            } else {
                Self::Bottom
            }
        } else if z.abs() < 0.3 {
            Self::Side
        } else {
            Self::Angled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_access_direction_quantization() {
        assert_eq!(AccessDirection::from_axis(&Vector3::z()), AccessDirection::Top);
        assert_eq!(
            AccessDirection::from_axis(&-Vector3::z()),
            AccessDirection::Bottom
        );
        assert_eq!(AccessDirection::from_axis(&Vector3::x()), AccessDirection::Side);
        let tilted = Vector3::new(0.7, 0.0, 0.7).normalize();
        assert_eq!(AccessDirection::from_axis(&tilted), AccessDirection::Angled);
    }
}
