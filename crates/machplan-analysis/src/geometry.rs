//! Geometry risk analysis.
//!
//! Pure functions of the extracted geometry: undercut detection, wall
//! thickness, draft angles, accessibility probing and complexity scoring.
//! Insufficient input never aborts the run; the analyzer returns defaults
//! with empty risk lists instead.

use nalgebra::Vector3;
use tracing::debug;

use machplan_core::{Difficulty, FaceSample, Feature, GeometryAnalysis, PartGeometry, Tolerances};

/// Tool envelope used for accessibility probing.
#[derive(Debug, Clone, Copy)]
pub struct ToolEnvelope {
    pub length_mm: f64,
    pub diameter_mm: f64,
}

impl Default for ToolEnvelope {
    fn default() -> Self {
        Self {
            length_mm: 50.0,
            diameter_mm: 10.0,
        }
    }
}

/// Geometry analyzer; stateless apart from the shared tolerance config.
pub struct GeometryAnalyzer<'a> {
    tolerances: &'a Tolerances,
}

impl<'a> GeometryAnalyzer<'a> {
    pub fn new(tolerances: &'a Tolerances) -> Self {
        Self { tolerances }
    }

    /// Full part-level analysis.
    pub fn analyze_part(&self, part: &PartGeometry) -> GeometryAnalysis {
        let mut analysis = GeometryAnalysis::default();

        let undercuts = Self::undercut_severities(&part.faces);
        analysis.has_undercuts = !undercuts.is_empty();

        analysis.min_wall_thickness = Self::min_wall_thickness(&part.faces);
        analysis.has_thin_walls = analysis
            .min_wall_thickness
            .is_some_and(|t| t < self.tolerances.thin_wall_mm);

        analysis.draft_angles = Self::draft_angles(&part.faces);

        analysis.accessibility_score =
            self.accessibility_score(part, &ToolEnvelope::default());

        analysis.complexity_score = self.part_complexity(part, analysis.accessibility_score);

        analysis.manufacturing_risks = self.identify_risks(&analysis);
        analysis.suggested_strategies = self.suggest_strategies(&analysis);

        debug!(
            undercuts = analysis.has_undercuts,
            thin_walls = analysis.has_thin_walls,
            accessibility = analysis.accessibility_score,
            complexity = analysis.complexity_score,
            "part geometry analyzed"
        );

        analysis
    }

    /// Feature-scoped analysis: the feature's own faces plus its dimensional
    /// attributes drive the scores.
    pub fn analyze_feature(
        &self,
        feature: &Feature,
        part: &PartGeometry,
        material_hardness_hb: f64,
        hardened: bool,
    ) -> GeometryAnalysis {
        let mut analysis = GeometryAnalysis::default();

        let faces: Vec<FaceSample> = feature
            .face_normals
            .iter()
            .map(|n| FaceSample::new(*n, feature.center, 0.0))
            .collect();

        let undercuts = Self::undercut_severities(&faces);
        analysis.has_undercuts = !undercuts.is_empty();
        analysis.draft_angles = Self::draft_angles(&faces);

        analysis.accessibility_score = self.feature_accessibility(feature, part);

        let hard = hardened || material_hardness_hb > self.tolerances.hard_material_hb;
        analysis.complexity_score =
            self.feature_complexity(feature, hard, analysis.accessibility_score);

        analysis.manufacturing_risks = self.identify_risks(&analysis);
        analysis.suggested_strategies = self.suggest_strategies(&analysis);

        analysis
    }

    /// Faces whose normal tips more than 90° away from the vertical are
    /// undercuts; severity is (angle − 90°)/90°, clipped to [0, 1].
    pub fn undercut_severities(faces: &[FaceSample]) -> Vec<(usize, f64)> {
        faces
            .iter()
            .enumerate()
            .filter_map(|(i, face)| {
                let angle = face.angle_from_vertical();
                if angle > 90.0 {
                    Some((i, ((angle - 90.0) / 90.0).clamp(0.0, 1.0)))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Minimum perpendicular distance over all parallel opposing face pairs.
    /// `None` when the input has no such pair.
    pub fn min_wall_thickness(faces: &[FaceSample]) -> Option<f64> {
        let mut min: Option<f64> = None;
        for i in 0..faces.len() {
            for j in (i + 1)..faces.len() {
                // Opposing pair: normals anti-parallel.
                if faces[i].normal.dot(&faces[j].normal) > -0.99 {
                    continue;
                }
                let offset = faces[j].centroid - faces[i].centroid;
                let thickness = offset.dot(&faces[i].normal).abs();
                if thickness <= 0.0 {
                    continue;
                }
                min = Some(match min {
                    Some(m) => m.min(thickness),
                    None => thickness,
                });
            }
        }
        min
    }

    /// Draft angle per face: 90° minus the angle between the normal and the
    /// vertical. Vertical walls have 0° draft; horizontal faces are skipped.
    pub fn draft_angles(faces: &[FaceSample]) -> Vec<f64> {
        faces
            .iter()
            .filter_map(|face| {
                let from_vertical = face.angle_from_vertical();
                // Horizontal faces (normal near ±Z) carry no draft notion.
                if from_vertical < 10.0 || from_vertical > 170.0 {
                    None
                } else {
                    Some(90.0 - from_vertical)
                }
            })
            .collect()
    }

    /// Fraction of collision-free approach probes for the whole part.
    ///
    /// Probes tilt the tool axis 0°, 45° and 90° away from vertical in four
    /// azimuth directions. A probe collides when some face both opposes the
    /// approach and sits within the tool envelope radius of the probe axis.
    pub fn accessibility_score(&self, part: &PartGeometry, tool: &ToolEnvelope) -> f64 {
        if part.faces.is_empty() {
            return 1.0;
        }
        let target = nalgebra::center(&part.bbox_min, &part.bbox_max);
        let probes = Self::probe_directions();
        let total = probes.len();
        let clear = probes
            .iter()
            .filter(|dir| !Self::probe_collides(&part.faces, &target, dir, tool))
            .count();
        clear as f64 / total as f64
    }

    /// Accessibility of a single feature, probed at its center against the
    /// surrounding part faces.
    pub fn feature_accessibility(&self, feature: &Feature, part: &PartGeometry) -> f64 {
        if part.faces.is_empty() {
            return 1.0;
        }
        let tool = ToolEnvelope {
            length_mm: feature.depth.unwrap_or(20.0) + 20.0,
            diameter_mm: feature.diameter.or(feature.width).unwrap_or(10.0),
        };
        let probes = Self::probe_directions();
        let clear = probes
            .iter()
            .filter(|dir| !Self::probe_collides(&part.faces, &feature.center, dir, &tool))
            .count();
        clear as f64 / probes.len() as f64
    }

    fn probe_directions() -> Vec<Vector3<f64>> {
        // 0° (straight down the Z axis), then 45° and 90° tilts at four
        // azimuths each.
        let mut probes = vec![Vector3::z()];
        for (ax, ay) in [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)] {
            probes.push(Vector3::new(ax, ay, 1.0).normalize()); // 45°
            probes.push(Vector3::new(ax, ay, 0.0)); // 90°
        }
        probes
    }

    fn probe_collides(
        faces: &[FaceSample],
        target: &nalgebra::Point3<f64>,
        approach: &Vector3<f64>,
        tool: &ToolEnvelope,
    ) -> bool {
        let radius = tool.diameter_mm / 2.0;
        faces.iter().any(|face| {
            let to_face = face.centroid - target;
            let along = to_face.dot(approach);
            // Only geometry between the target and the tool holder matters.
            if along <= 0.0 || along > tool.length_mm {
                return false;
            }
            let radial = (to_face - approach * along).norm();
            // A face blocks the probe when it faces the approach direction
            // inside the swept envelope.
            radial < radius && face.normal.dot(approach) > 0.3
        })
    }

    /// Additive complexity score for a feature, 1.0..=10.0.
    pub fn feature_complexity(&self, feature: &Feature, hard: bool, accessibility: f64) -> f64 {
        let t = self.tolerances;
        let mut score: f64 = 1.0;
        if let Some(ratio) = feature.aspect_ratio() {
            if ratio > t.deep_ratio {
                score += 2.0;
            }
        }
        if feature.diameter.is_some_and(|d| d < t.small_diameter_mm) {
            score += 1.5;
        }
        if hard {
            score += 2.0;
        }
        if feature.tolerance_class != machplan_core::ToleranceClass::Standard {
            score += 1.0;
        }
        if accessibility < t.low_accessibility {
            score += 1.5;
        }
        score.min(10.0)
    }

    /// Part-level complexity from face-type mix and face count.
    fn part_complexity(&self, part: &PartGeometry, accessibility: f64) -> f64 {
        let total = part.faces.len();
        if total == 0 {
            return 1.0;
        }
        // Faces neither axis-aligned up/down nor vertical count as complex
        // (freeform/angled geometry).
        let complex = part
            .faces
            .iter()
            .filter(|f| {
                let a = f.angle_from_vertical();
                !(a < 10.0 || a > 170.0 || (80.0..=100.0).contains(&a))
            })
            .count();

        let mut score = 1.0 + (complex as f64 / total as f64) * 5.0;
        if total > 20 {
            score += 2.0;
        } else if total > 10 {
            score += 1.0;
        }
        if accessibility < self.tolerances.low_accessibility {
            score += 1.5;
        }
        score.min(10.0)
    }

    /// Manufacturing risk text for the report.
    pub fn identify_risks(&self, analysis: &GeometryAnalysis) -> Vec<String> {
        let t = self.tolerances;
        let mut risks = Vec::new();

        if analysis.has_undercuts {
            risks.push(
                "Undercuts detected - may require special tooling or multiple setups".to_string(),
            );
        }
        if let Some(thickness) = analysis.min_wall_thickness {
            if thickness < t.risky_wall_mm {
                risks.push(format!(
                    "Wall thickness {:.1}mm below machinable limit - redesign recommended",
                    thickness
                ));
            } else if thickness < t.critical_wall_mm {
                risks.push(format!(
                    "Critical: thin walls ({:.1}mm) - high risk of deflection/chatter",
                    thickness
                ));
            } else if thickness < t.thin_wall_mm {
                risks.push(format!(
                    "Thin walls detected ({:.1}mm) - risk of deflection/chatter",
                    thickness
                ));
            }
        }
        if analysis.accessibility_score < t.low_accessibility {
            risks.push("Poor accessibility - may require 4/5-axis machining".to_string());
        }
        if analysis.complexity_score > 7.0 {
            risks.push("High complexity - extended programming and machining time".to_string());
        }
        for angle in &analysis.draft_angles {
            if *angle > 0.0 && *angle < t.min_draft_deg {
                risks.push(format!(
                    "Low draft angle ({:.1}°) - may be difficult to machine",
                    angle
                ));
            }
        }

        risks
    }

    /// Suggested machining strategies for the report.
    pub fn suggest_strategies(&self, analysis: &GeometryAnalysis) -> Vec<String> {
        let mut strategies = Vec::new();

        if analysis.has_thin_walls {
            strategies.push("Use light depth of cut and multiple passes".to_string());
            strategies.push("Consider climb milling to reduce cutting forces".to_string());
            strategies.push("Use sharp tools to minimize deflection".to_string());
        }
        if analysis.has_undercuts {
            strategies.push("Evaluate if undercuts can be accessed with angled tools".to_string());
            strategies.push("Consider additional setups or part rotation".to_string());
        }
        if analysis.complexity_score > 7.0 {
            strategies.push("Break into multiple operations with tool changes".to_string());
            strategies.push("Use adaptive clearing for efficient roughing".to_string());
        }
        if analysis.accessibility_score < 0.7 {
            strategies.push("Consider 4-axis or 5-axis machining".to_string());
            strategies.push("Optimize fixture design for better access".to_string());
        }

        strategies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use machplan_core::{FeatureId, FeatureType};
    use nalgebra::{Point3, Vector3};

    fn face(nx: f64, ny: f64, nz: f64, cx: f64, cy: f64, cz: f64) -> FaceSample {
        FaceSample::new(
            Vector3::new(nx, ny, nz),
            Point3::new(cx, cy, cz),
            100.0,
        )
    }

    #[test]
    fn test_undercut_detection_and_severity() {
        // Straight-down face: 180° from vertical, severity 1.0.
        let faces = vec![face(0.0, 0.0, -1.0, 0.0, 0.0, 0.0)];
        let undercuts = GeometryAnalyzer::undercut_severities(&faces);
        assert_eq!(undercuts.len(), 1);
        assert!((undercuts[0].1 - 1.0).abs() < 1e-9);

        // Vertical wall: exactly 90°, not an undercut.
        let faces = vec![face(1.0, 0.0, 0.0, 0.0, 0.0, 0.0)];
        assert!(GeometryAnalyzer::undercut_severities(&faces).is_empty());
    }

    #[test]
    fn test_wall_thickness_between_opposing_faces() {
        let faces = vec![
            face(1.0, 0.0, 0.0, 2.0, 0.0, 0.0),
            face(-1.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        ];
        let thickness = GeometryAnalyzer::min_wall_thickness(&faces).unwrap();
        assert!((thickness - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_opposing_pair_no_thickness() {
        let faces = vec![
            face(1.0, 0.0, 0.0, 0.0, 0.0, 0.0),
            face(0.0, 1.0, 0.0, 5.0, 5.0, 0.0),
        ];
        assert!(GeometryAnalyzer::min_wall_thickness(&faces).is_none());
    }

    #[test]
    fn test_thin_wall_triggers_risk_and_strategy() {
        let tol = Tolerances::default();
        let analyzer = GeometryAnalyzer::new(&tol);
        let part = PartGeometry {
            faces: vec![
                face(1.0, 0.0, 0.0, 1.2, 0.0, 0.0),
                face(-1.0, 0.0, 0.0, 0.0, 0.0, 0.0),
            ],
            bbox_min: Point3::new(0.0, 0.0, 0.0),
            bbox_max: Point3::new(1.2, 50.0, 50.0),
            volume_cm3: 10.0,
        };
        let analysis = analyzer.analyze_part(&part);
        assert!(analysis.has_thin_walls);
        assert!(analysis
            .manufacturing_risks
            .iter()
            .any(|r| r.contains("Critical")));
        assert!(analysis
            .suggested_strategies
            .iter()
            .any(|s| s.contains("light depth of cut")));
    }

    #[test]
    fn test_draft_angle_of_near_vertical_wall() {
        // Normal tilted 3° off horizontal: draft angle 3°.
        let tilt = 3.0_f64.to_radians();
        let faces = vec![face(tilt.cos(), 0.0, tilt.sin(), 0.0, 0.0, 0.0)];
        let drafts = GeometryAnalyzer::draft_angles(&faces);
        assert_eq!(drafts.len(), 1);
        assert!((drafts[0] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_open_part_is_fully_accessible() {
        let tol = Tolerances::default();
        let analyzer = GeometryAnalyzer::new(&tol);
        // Only upward faces: nothing blocks any probe.
        let part = PartGeometry {
            faces: vec![face(0.0, 0.0, 1.0, 0.0, 0.0, 10.0)],
            bbox_min: Point3::new(0.0, 0.0, 0.0),
            bbox_max: Point3::new(100.0, 100.0, 10.0),
            volume_cm3: 100.0,
        };
        let score = analyzer.accessibility_score(&part, &ToolEnvelope::default());
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_complexity_monotone_in_aspect_ratio() {
        let tol = Tolerances::default();
        let analyzer = GeometryAnalyzer::new(&tol);
        let shallow = Feature::new(FeatureId(1), FeatureType::BlindHole)
            .with_diameter(10.0)
            .with_depth(10.0);
        let deep = Feature::new(FeatureId(2), FeatureType::BlindHole)
            .with_diameter(10.0)
            .with_depth(40.0);
        let c_shallow = analyzer.feature_complexity(&shallow, false, 1.0);
        let c_deep = analyzer.feature_complexity(&deep, false, 1.0);
        assert!(c_deep >= c_shallow);
        assert!((1.0..=10.0).contains(&c_shallow));
        assert!((1.0..=10.0).contains(&c_deep));
    }

    #[test]
    fn test_complexity_clipped_at_ten() {
        let tol = Tolerances::default();
        let analyzer = GeometryAnalyzer::new(&tol);
        let nasty = Feature::new(FeatureId(1), FeatureType::BlindHole)
            .with_diameter(2.0)
            .with_depth(20.0)
            .with_tolerance(machplan_core::ToleranceClass::Tight);
        let score = analyzer.feature_complexity(&nasty, true, 0.2);
        assert!(score <= 10.0);
        assert_eq!(Difficulty::from_score(score), Difficulty::Difficult);
    }

    #[test]
    fn test_empty_geometry_yields_defaults_not_panic() {
        let tol = Tolerances::default();
        let analyzer = GeometryAnalyzer::new(&tol);
        let analysis = analyzer.analyze_part(&PartGeometry::default());
        assert!(!analysis.has_undercuts);
        assert!(analysis.min_wall_thickness.is_none());
        assert!(analysis.manufacturing_risks.is_empty());
        assert_eq!(analysis.accessibility_score, 1.0);
    }
}
