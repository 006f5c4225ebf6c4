//! Part geometry input and geometry analysis results.
//!
//! The planner consumes already-extracted geometry: a set of face samples
//! (normal, centroid, area) plus a bounding box. No solid-kernel operations
//! happen here; faces are opaque measurements handed over by the CAD
//! front-end.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// One sampled face of the part: unit normal, centroid and surface area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceSample {
    pub normal: Vector3<f64>,
    pub centroid: Point3<f64>,
    pub area_mm2: f64,
}

impl FaceSample {
    pub fn new(normal: Vector3<f64>, centroid: Point3<f64>, area_mm2: f64) -> Self {
        Self {
            normal: normal.normalize(),
            centroid,
            area_mm2,
        }
    }

    /// Angle between this face normal and the vertical (+Z) axis, degrees.
    pub fn angle_from_vertical(&self) -> f64 {
        let cos = self.normal.dot(&Vector3::z()).clamp(-1.0, 1.0);
        cos.acos().to_degrees()
    }
}

/// Extracted geometry of the whole part.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartGeometry {
    pub faces: Vec<FaceSample>,
    pub bbox_min: Point3<f64>,
    pub bbox_max: Point3<f64>,
    /// Stock volume of the part, cm³, used for material cost.
    pub volume_cm3: f64,
}

impl PartGeometry {
    pub fn dimensions(&self) -> (f64, f64, f64) {
        (
            self.bbox_max.x - self.bbox_min.x,
            self.bbox_max.y - self.bbox_min.y,
            self.bbox_max.z - self.bbox_min.z,
        )
    }
}

/// Result of geometry risk analysis for a feature or the whole part.
///
/// Immutable once computed for a given input snapshot; recomputed wholesale
/// if the geometry changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryAnalysis {
    pub has_undercuts: bool,
    pub has_thin_walls: bool,
    /// Minimum wall thickness found between parallel opposing faces, mm.
    /// `None` when no opposing pair exists in the input.
    pub min_wall_thickness: Option<f64>,
    pub draft_angles: Vec<f64>,
    /// Fraction of collision-free approach probes, 0.0..=1.0.
    pub accessibility_score: f64,
    /// Machining complexity, 1.0..=10.0.
    pub complexity_score: f64,
    pub manufacturing_risks: Vec<String>,
    pub suggested_strategies: Vec<String>,
}

impl Default for GeometryAnalysis {
    fn default() -> Self {
        Self {
            has_undercuts: false,
            has_thin_walls: false,
            min_wall_thickness: None,
            draft_angles: Vec::new(),
            accessibility_score: 1.0,
            complexity_score: 1.0,
            manufacturing_risks: Vec::new(),
            suggested_strategies: Vec::new(),
        }
    }
}

/// Difficulty bands shared by complexity and machinability scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Moderate,
    Difficult,
    VeryDifficult,
}

impl Difficulty {
    /// Band a 1-10 score: 1-3 easy, 4-6 moderate, 7-9 difficult, 10 very
    /// difficult.
    pub fn from_score(score: f64) -> Self {
        if score <= 3.0 {
            Self::Easy
        } else if score <= 6.0 {
            Self::Moderate
        } else if score < 10.0 {
            Self::Difficult
        } else {
            Self::VeryDifficult
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "Easy"),
            Self::Moderate => write!(f, "Moderate"),
            Self::Difficult => write!(f, "Difficult"),
            Self::VeryDifficult => write!(f, "Very Difficult"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_from_vertical() {
        let up = FaceSample::new(Vector3::z(), Point3::origin(), 100.0);
        assert!(up.angle_from_vertical().abs() < 1e-9);

        let side = FaceSample::new(Vector3::x(), Point3::origin(), 100.0);
        assert!((side.angle_from_vertical() - 90.0).abs() < 1e-9);

        let down = FaceSample::new(-Vector3::z(), Point3::origin(), 100.0);
        assert!((down.angle_from_vertical() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_difficulty_bands() {
        assert_eq!(Difficulty::from_score(1.0), Difficulty::Easy);
        assert_eq!(Difficulty::from_score(3.0), Difficulty::Easy);
        assert_eq!(Difficulty::from_score(4.5), Difficulty::Moderate);
        assert_eq!(Difficulty::from_score(7.0), Difficulty::Difficult);
        assert_eq!(Difficulty::from_score(10.0), Difficulty::VeryDifficult);
    }
}
