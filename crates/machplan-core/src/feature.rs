//! Machining feature model.
//!
//! A [`Feature`] is a discrete machinable element recognized on a part:
//! a hole, pocket, boss, groove, surface region or edge treatment. Features
//! are created by the (external) recognition front-end, enriched by the
//! analysis engines, and read-only by the time toolpath and cost stages see
//! them. Feature ids are minted by [`FeatureIdAllocator`] and stay stable
//! for the whole pipeline run.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::FeatureError;
use crate::geometry::GeometryAnalysis;
use crate::pattern::PatternId;

/// Stable integer handle for a feature.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FeatureId(pub u32);

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "F{}", self.0)
    }
}

/// Mints feature ids for a single pipeline run.
///
/// Passed explicitly through recognition so that no component depends on a
/// process-wide counter; ids are sequential and never reused within a run.
#[derive(Debug, Default)]
pub struct FeatureIdAllocator {
    next: u32,
}

impl FeatureIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start allocation above ids already present in an imported feature set.
    pub fn starting_after(features: &[Feature]) -> Self {
        let next = features.iter().map(|f| f.id.0 + 1).max().unwrap_or(0);
        Self { next }
    }

    pub fn allocate(&mut self) -> FeatureId {
        let id = FeatureId(self.next);
        self.next += 1;
        id
    }
}

/// High-level grouping of feature types, used for operation sequencing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureCategory {
    Holes,
    Pockets,
    Protrusions,
    Grooves,
    Surfaces,
    Edges,
}

impl std::fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Holes => write!(f, "Holes"),
            Self::Pockets => write!(f, "Pockets"),
            Self::Protrusions => write!(f, "Protrusions"),
            Self::Grooves => write!(f, "Grooves"),
            Self::Surfaces => write!(f, "Surfaces"),
            Self::Edges => write!(f, "Edges"),
        }
    }
}

/// Tagged machining feature type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureType {
    // Holes
    ThroughHole,
    BlindHole,
    ThreadedHole,
    CounterboreHole,
    CountersinkHole,
    TaperedHole,
    StepHole,

    // Pockets and slots
    RectangularPocket,
    CircularPocket,
    IrregularPocket,
    MultiLevelPocket,
    IslandPocket,
    OpenPocket,
    AngledWallPocket,
    Slot,

    // Protrusions (material to leave, machined around)
    CircularBoss,
    RectangularBoss,
    Rib,
    Stud,
    Lug,
    Flange,

    // Grooves
    RectangularGroove,
    ORingGroove,
    TSlot,
    DovetailSlot,
    Keyway,
    SpiralGroove,

    // Surfaces
    PlanarFace,
    ContouredFace,
    RuledSurface,
    SculpturedSurface,
    BlendedSurface,
    Surface3d,
    ThinWall,

    // Edge treatments
    Fillet,
    VariableFillet,
    Chamfer,
    FaceBlend,
    ReliefCut,
    EdgeBreak,
}

impl FeatureType {
    pub fn category(&self) -> FeatureCategory {
        use FeatureType::*;
        match self {
            ThroughHole | BlindHole | ThreadedHole | CounterboreHole | CountersinkHole
            | TaperedHole | StepHole => FeatureCategory::Holes,
            RectangularPocket | CircularPocket | IrregularPocket | MultiLevelPocket
            | IslandPocket | OpenPocket | AngledWallPocket | Slot => FeatureCategory::Pockets,
            CircularBoss | RectangularBoss | Rib | Stud | Lug | Flange => {
                FeatureCategory::Protrusions
            }
            RectangularGroove | ORingGroove | TSlot | DovetailSlot | Keyway | SpiralGroove => {
                FeatureCategory::Grooves
            }
            PlanarFace | ContouredFace | RuledSurface | SculpturedSurface | BlendedSurface
            | Surface3d | ThinWall => FeatureCategory::Surfaces,
            Fillet | VariableFillet | Chamfer | FaceBlend | ReliefCut | EdgeBreak => {
                FeatureCategory::Edges
            }
        }
    }

    /// True for features that remove material (holes, pockets, grooves).
    pub fn is_subtractive(&self) -> bool {
        matches!(
            self.category(),
            FeatureCategory::Holes | FeatureCategory::Pockets | FeatureCategory::Grooves
        )
    }

    /// Dimensions a feature of this type must carry to be fully specified.
    pub fn required_dimensions(&self) -> &'static [Dimension] {
        use FeatureType::*;
        match self {
            ThroughHole | BlindHole | ThreadedHole | CounterboreHole | CountersinkHole
            | TaperedHole | StepHole => &[Dimension::Diameter, Dimension::Depth],
            CircularPocket => &[Dimension::Diameter, Dimension::Depth],
            RectangularPocket | MultiLevelPocket | IslandPocket | OpenPocket
            | AngledWallPocket => &[Dimension::Width, Dimension::Length, Dimension::Depth],
            IrregularPocket => &[Dimension::Area, Dimension::Depth],
            Slot | RectangularGroove | TSlot | DovetailSlot | Keyway | SpiralGroove => {
                &[Dimension::Width, Dimension::Depth]
            }
            ORingGroove => &[Dimension::Diameter, Dimension::Width, Dimension::Depth],
            CircularBoss | Stud => &[Dimension::Diameter, Dimension::Height],
            RectangularBoss | Rib | Lug | Flange => &[Dimension::Width, Dimension::Height],
            PlanarFace | ContouredFace | RuledSurface | SculpturedSurface | BlendedSurface
            | Surface3d => &[Dimension::Area],
            ThinWall => &[Dimension::Width, Dimension::Height],
            Fillet | VariableFillet | Chamfer | FaceBlend | ReliefCut | EdgeBreak => {
                &[Dimension::Width]
            }
        }
    }
}

impl std::fmt::Display for FeatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use FeatureType::*;
        let name = match self {
            ThroughHole => "Through Hole",
            BlindHole => "Blind Hole",
            ThreadedHole => "Threaded Hole",
            CounterboreHole => "Counterbore Hole",
            CountersinkHole => "Countersink Hole",
            TaperedHole => "Tapered Hole",
            StepHole => "Step Drilled Hole",
            RectangularPocket => "Rectangular Pocket",
            CircularPocket => "Circular Pocket",
            IrregularPocket => "Irregular Pocket",
            MultiLevelPocket => "Multi-Level Pocket",
            IslandPocket => "Pocket with Island",
            OpenPocket => "Open Pocket",
            AngledWallPocket => "Angled Wall Pocket",
            Slot => "Slot",
            CircularBoss => "Circular Boss",
            RectangularBoss => "Rectangular Boss",
            Rib => "Rib",
            Stud => "Stud",
            Lug => "Lug",
            Flange => "Flange",
            RectangularGroove => "Rectangular Groove",
            ORingGroove => "O-Ring Groove",
            TSlot => "T-Slot",
            DovetailSlot => "Dovetail Slot",
            Keyway => "Keyway",
            SpiralGroove => "Spiral Groove",
            PlanarFace => "Planar Face",
            ContouredFace => "Contoured Face",
            RuledSurface => "Ruled Surface",
            SculpturedSurface => "Sculptured Surface",
            BlendedSurface => "Blended Surface",
            Surface3d => "3D Surface",
            ThinWall => "Thin Wall",
            Fillet => "Fillet",
            VariableFillet => "Variable Radius Fillet",
            Chamfer => "Chamfer",
            FaceBlend => "Face Blend",
            ReliefCut => "Relief Cut",
            EdgeBreak => "Edge Break",
        };
        write!(f, "{}", name)
    }
}

/// Dimensional attribute slots a feature type may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    Depth,
    Diameter,
    Width,
    Length,
    Height,
    Area,
    Volume,
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Depth => "depth",
            Self::Diameter => "diameter",
            Self::Width => "width",
            Self::Length => "length",
            Self::Height => "height",
            Self::Area => "area",
            Self::Volume => "volume",
        };
        write!(f, "{}", name)
    }
}

/// Tolerance requirement attached to a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToleranceClass {
    #[default]
    Standard,
    Precision,
    Tight,
}

/// A machinable geometric element and everything the pipeline has learned
/// about it so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub feature_type: FeatureType,

    // Dimensional attributes (mm / mm² / mm³); presence depends on the type.
    pub depth: Option<f64>,
    pub diameter: Option<f64>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub height: Option<f64>,
    pub area: Option<f64>,
    pub volume: Option<f64>,
    /// Corner or fillet radius of the finished feature, where meaningful.
    pub corner_radius: Option<f64>,

    // Spatial attributes.
    pub center: Point3<f64>,
    /// Tool approach axis; +Z means machinable from the top setup.
    pub axis: Vector3<f64>,
    pub face_normals: Vec<Vector3<f64>>,

    pub tolerance_class: ToleranceClass,

    // Derived fields, attached by the analysis engines.
    pub confidence_score: f64,
    pub complexity_rating: f64,
    pub risk_factors: Vec<String>,
    pub alternative_strategies: Vec<String>,
    pub pattern_id: Option<PatternId>,
    pub geometry_analysis: Option<GeometryAnalysis>,
}

impl Feature {
    /// Create a feature with no dimensions set and neutral derived fields.
    pub fn new(id: FeatureId, feature_type: FeatureType) -> Self {
        Self {
            id,
            feature_type,
            depth: None,
            diameter: None,
            width: None,
            length: None,
            height: None,
            area: None,
            volume: None,
            corner_radius: None,
            center: Point3::origin(),
            axis: Vector3::z(),
            face_normals: Vec::new(),
            tolerance_class: ToleranceClass::Standard,
            confidence_score: 1.0,
            complexity_rating: 1.0,
            risk_factors: Vec::new(),
            alternative_strategies: Vec::new(),
            pattern_id: None,
            geometry_analysis: None,
        }
    }

    pub fn with_center(mut self, x: f64, y: f64, z: f64) -> Self {
        self.center = Point3::new(x, y, z);
        self
    }

    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_diameter(mut self, diameter: f64) -> Self {
        self.diameter = Some(diameter);
        self
    }

    pub fn with_size(mut self, width: f64, length: f64) -> Self {
        self.width = Some(width);
        self.length = Some(length);
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_tolerance(mut self, tolerance: ToleranceClass) -> Self {
        self.tolerance_class = tolerance;
        self
    }

    fn dimension_value(&self, dim: Dimension) -> Option<f64> {
        match dim {
            Dimension::Depth => self.depth,
            Dimension::Diameter => self.diameter,
            Dimension::Width => self.width,
            Dimension::Length => self.length,
            Dimension::Height => self.height,
            Dimension::Area => self.area,
            Dimension::Volume => self.volume,
        }
    }

    /// Check that every dimension the type requires is present and positive.
    ///
    /// A failed validation does not abort a pipeline run; the planner records
    /// the error in the report warnings and the affected engines produce
    /// degraded (low-confidence) results for this feature.
    pub fn validate(&self) -> Result<(), FeatureError> {
        for dim in self.feature_type.required_dimensions() {
            match self.dimension_value(*dim) {
                None => {
                    return Err(FeatureError::MissingDimension {
                        feature: self.id.0,
                        dimension: dim.to_string(),
                    })
                }
                Some(v) if v <= 0.0 => {
                    return Err(FeatureError::InvalidDimension {
                        feature: self.id.0,
                        dimension: dim.to_string(),
                        value: v,
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Depth / diameter aspect ratio, the main classification signal.
    pub fn aspect_ratio(&self) -> Option<f64> {
        match (self.depth, self.diameter) {
            (Some(d), Some(dia)) if dia > 0.0 => Some(d / dia),
            _ => None,
        }
    }

    /// Half of the feature's largest planar extent, used as a spherical
    /// envelope for containment and overlap tests.
    pub fn bounding_radius(&self) -> f64 {
        let candidates = [
            self.diameter.map(|d| d / 2.0),
            self.width.map(|w| w / 2.0),
            self.length.map(|l| l / 2.0),
        ];
        candidates
            .into_iter()
            .flatten()
            .fold(0.0_f64, f64::max)
    }

    /// Material removed by this feature, in mm³. Uses the explicit volume
    /// when present, otherwise estimates from the dimensions.
    pub fn removal_volume_mm3(&self) -> f64 {
        if let Some(v) = self.volume {
            return v;
        }
        match (self.diameter, self.width, self.length, self.depth) {
            (Some(dia), _, _, Some(depth)) => {
                std::f64::consts::PI * (dia / 2.0).powi(2) * depth
            }
            (None, Some(w), Some(l), Some(depth)) => w * l * depth,
            (None, Some(w), None, Some(depth)) => w * w * depth,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_is_sequential_and_stable() {
        let mut alloc = FeatureIdAllocator::new();
        assert_eq!(alloc.allocate(), FeatureId(0));
        assert_eq!(alloc.allocate(), FeatureId(1));
        assert_eq!(alloc.allocate(), FeatureId(2));
    }

    #[test]
    fn test_allocator_resumes_after_imported_ids() {
        let features = vec![
            Feature::new(FeatureId(3), FeatureType::ThroughHole),
            Feature::new(FeatureId(7), FeatureType::Slot),
        ];
        let mut alloc = FeatureIdAllocator::starting_after(&features);
        assert_eq!(alloc.allocate(), FeatureId(8));
    }

    #[test]
    fn test_category_grouping() {
        assert_eq!(FeatureType::ThreadedHole.category(), FeatureCategory::Holes);
        assert_eq!(FeatureType::Slot.category(), FeatureCategory::Pockets);
        assert_eq!(FeatureType::Rib.category(), FeatureCategory::Protrusions);
        assert_eq!(FeatureType::TSlot.category(), FeatureCategory::Grooves);
        assert_eq!(FeatureType::ThinWall.category(), FeatureCategory::Surfaces);
        assert_eq!(FeatureType::Chamfer.category(), FeatureCategory::Edges);
    }

    #[test]
    fn test_validate_flags_missing_diameter() {
        let hole = Feature::new(FeatureId(1), FeatureType::ThroughHole).with_depth(10.0);
        let err = hole.validate().unwrap_err();
        assert!(err.to_string().contains("diameter"));
    }

    #[test]
    fn test_validate_accepts_complete_hole() {
        let hole = Feature::new(FeatureId(1), FeatureType::ThroughHole)
            .with_depth(10.0)
            .with_diameter(6.0);
        assert!(hole.validate().is_ok());
    }

    #[test]
    fn test_aspect_ratio() {
        let hole = Feature::new(FeatureId(1), FeatureType::BlindHole)
            .with_depth(15.0)
            .with_diameter(10.0);
        assert!((hole.aspect_ratio().unwrap() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_removal_volume_cylindrical() {
        let hole = Feature::new(FeatureId(1), FeatureType::ThroughHole)
            .with_depth(10.0)
            .with_diameter(10.0);
        let expected = std::f64::consts::PI * 25.0 * 10.0;
        assert!((hole.removal_volume_mm3() - expected).abs() < 1e-9);
    }
}
