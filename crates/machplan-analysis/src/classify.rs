//! Fuzzy feature classification, multi-criteria decisions and
//! machinability scoring.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use machplan_core::{
    ClassLabel, ClassificationResult, Decision, Difficulty, Feature, Tolerances, ToleranceClass,
};

/// Classifies borderline features by membership over the depth/diameter
/// aspect ratio.
pub struct FeatureClassifier<'a> {
    tolerances: &'a Tolerances,
}

impl<'a> FeatureClassifier<'a> {
    pub fn new(tolerances: &'a Tolerances) -> Self {
        Self { tolerances }
    }

    /// Fuzzy hole/pocket classification.
    ///
    /// Hole membership is 1.0 above aspect ratio 2.0 and ramps down
    /// linearly to 0 at ratio 1.0; pocket membership is 1.0 below ratio 0.5
    /// and ramps down to 0 at ratio 1.0. The primary label is the higher
    /// membership, hole winning ties.
    pub fn fuzzy_classify(&self, feature: &Feature) -> ClassificationResult {
        // Missing depth or diameter reads as ratio 0, a shallow feature.
        let ratio = feature.aspect_ratio().unwrap_or(0.0);

        let hole = if ratio > 2.0 {
            1.0
        } else if ratio > 1.0 {
            ratio - 1.0
        } else {
            0.0
        };
        let pocket = if ratio < 0.5 {
            1.0
        } else if ratio < 1.0 {
            (1.0 - ratio) / 0.5
        } else {
            0.0
        };

        let (primary, confidence) = if hole >= pocket {
            (ClassLabel::Hole, hole)
        } else {
            (ClassLabel::Pocket, pocket)
        };

        let mut alternatives: Vec<(ClassLabel, f64)> = [
            (ClassLabel::Hole, hole),
            (ClassLabel::Pocket, pocket),
        ]
        .into_iter()
        .filter(|(label, membership)| {
            *label != primary && *membership > self.tolerances.alternative_floor
        })
        .collect();
        alternatives.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        debug!(feature = %feature.id, %primary, confidence, "fuzzy classification");

        ClassificationResult {
            feature_id: feature.id,
            primary,
            confidence,
            alternatives,
            reasoning: vec![
                format!("Aspect ratio: {ratio:.2}"),
                format!("Hole membership: {hole:.2}"),
                format!("Pocket membership: {pocket:.2}"),
            ],
        }
    }

    /// Weighted multi-criteria decision over geometric evidence.
    ///
    /// Weights are supplied by the caller and are not required to sum to 1;
    /// unnamed criteria default to 0.33.
    pub fn multi_criteria_decision(
        &self,
        feature: &Feature,
        weights: &BTreeMap<String, f64>,
    ) -> MultiCriteriaResult {
        let mut scores: BTreeMap<String, f64> = BTreeMap::new();

        let cylindrical = f64::from(feature.diameter.is_some_and(|d| d > 0.0));
        scores.insert("cylindrical".to_string(), cylindrical);

        if let (Some(depth), Some(width)) = (feature.depth, feature.width) {
            scores.insert("deep".to_string(), f64::from(depth > width));
        }

        if let Some(area) = feature.area {
            let large = if area > 1000.0 {
                1.0
            } else if area > 100.0 {
                0.5
            } else {
                0.0
            };
            scores.insert("large".to_string(), large);
        }

        let weighted_score: f64 = scores
            .iter()
            .map(|(criterion, score)| score * weights.get(criterion).copied().unwrap_or(0.33))
            .sum();

        let decision = if weighted_score > self.tolerances.accept_threshold {
            Decision::Accept
        } else if weighted_score < self.tolerances.reject_threshold {
            Decision::Reject
        } else {
            Decision::Uncertain
        };

        MultiCriteriaResult {
            criteria_scores: scores,
            weighted_score,
            decision,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiCriteriaResult {
    pub criteria_scores: BTreeMap<String, f64>,
    pub weighted_score: f64,
    pub decision: Decision,
}

/// Scores machining difficulty on a 1–10 scale.
pub struct MachinabilityScorer<'a> {
    tolerances: &'a Tolerances,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachinabilityScore {
    /// 1 = easy, 10 = very difficult.
    pub score: f64,
    pub difficulty: Difficulty,
    pub factors: Vec<String>,
}

impl<'a> MachinabilityScorer<'a> {
    pub fn new(tolerances: &'a Tolerances) -> Self {
        Self { tolerances }
    }

    /// Additive penalty model: deep, small, hard, tight-toleranced or
    /// poorly accessible features each raise the score.
    pub fn score(
        &self,
        feature: &Feature,
        material_hardness_hb: f64,
        accessibility: f64,
    ) -> MachinabilityScore {
        let tol = self.tolerances;
        let mut score: f64 = 1.0;
        let mut factors = Vec::new();

        if let (Some(depth), Some(diameter)) = (feature.depth, feature.diameter) {
            if diameter > 0.0 && depth > diameter * tol.deep_ratio {
                score += 2.0;
                factors.push(format!("Deep feature (L/D > {:.0})", tol.deep_ratio));
            }
        }

        if feature.diameter.is_some_and(|d| d < tol.small_diameter_mm) {
            score += 1.5;
            factors.push(format!("Small diameter (< {:.0}mm)", tol.small_diameter_mm));
        }

        if material_hardness_hb > tol.hard_material_hb {
            score += 2.0;
            factors.push("Hard material".to_string());
        }

        if feature.tolerance_class != ToleranceClass::Standard {
            score += 1.0;
            factors.push("Tight tolerance".to_string());
        }

        if accessibility < tol.low_accessibility {
            score += 1.5;
            factors.push("Poor accessibility".to_string());
        }

        let score = score.clamp(1.0, 10.0);
        MachinabilityScore {
            score,
            difficulty: Difficulty::from_score(score),
            factors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use machplan_core::{FeatureId, FeatureType};

    fn classifier_fixture() -> Tolerances {
        Tolerances::default()
    }

    fn hole(depth: f64, diameter: f64) -> Feature {
        Feature::new(FeatureId(0), FeatureType::BlindHole)
            .with_depth(depth)
            .with_diameter(diameter)
    }

    #[test]
    fn test_deep_feature_classified_as_hole() {
        let tol = classifier_fixture();
        let classifier = FeatureClassifier::new(&tol);
        let result = classifier.fuzzy_classify(&hole(25.0, 10.0));
        assert_eq!(result.primary, ClassLabel::Hole);
        assert!((result.confidence - 1.0).abs() < 1e-9);
        assert!(result.alternatives.is_empty());
    }

    #[test]
    fn test_shallow_feature_classified_as_pocket() {
        let tol = classifier_fixture();
        let classifier = FeatureClassifier::new(&tol);
        let result = classifier.fuzzy_classify(&hole(4.0, 20.0));
        assert_eq!(result.primary, ClassLabel::Pocket);
        assert!((result.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_borderline_ratio_partial_membership() {
        // Ratio 1.25: hole membership 0.25, pocket membership 0.
        let tol = classifier_fixture();
        let classifier = FeatureClassifier::new(&tol);
        let result = classifier.fuzzy_classify(&hole(12.5, 10.0));
        assert_eq!(result.primary, ClassLabel::Hole);
        assert!((result.confidence - 0.25).abs() < 1e-9);
        assert!(result.alternatives.is_empty());
    }

    #[test]
    fn test_ratio_between_half_and_one_ramps_pocket() {
        // Ratio 0.75: pocket membership (1 - 0.75) / 0.5 = 0.5.
        let tol = classifier_fixture();
        let classifier = FeatureClassifier::new(&tol);
        let result = classifier.fuzzy_classify(&hole(7.5, 10.0));
        assert_eq!(result.primary, ClassLabel::Pocket);
        assert!((result.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_multi_criteria_accepts_deep_cylindrical() {
        let tol = classifier_fixture();
        let classifier = FeatureClassifier::new(&tol);
        let feature = Feature::new(FeatureId(1), FeatureType::BlindHole)
            .with_depth(30.0)
            .with_diameter(8.0)
            .with_size(8.0, 8.0);
        let weights = BTreeMap::from([
            ("cylindrical".to_string(), 0.5),
            ("deep".to_string(), 0.5),
        ]);

        let result = classifier.multi_criteria_decision(&feature, &weights);
        assert_eq!(result.decision, Decision::Accept);
        assert!((result.weighted_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_multi_criteria_rejects_no_evidence() {
        let tol = classifier_fixture();
        let classifier = FeatureClassifier::new(&tol);
        let feature = Feature::new(FeatureId(2), FeatureType::RectangularPocket)
            .with_depth(5.0)
            .with_size(20.0, 30.0);
        let weights = BTreeMap::from([("cylindrical".to_string(), 1.0)]);

        let result = classifier.multi_criteria_decision(&feature, &weights);
        assert_eq!(result.decision, Decision::Reject);
    }

    #[test]
    fn test_multi_criteria_graded_area_score() {
        let tol = classifier_fixture();
        let classifier = FeatureClassifier::new(&tol);
        let mut feature = Feature::new(FeatureId(3), FeatureType::RectangularPocket)
            .with_depth(5.0)
            .with_size(15.0, 20.0);
        feature.area = Some(300.0);
        let weights = BTreeMap::from([("large".to_string(), 1.0)]);

        let result = classifier.multi_criteria_decision(&feature, &weights);
        assert!((result.criteria_scores["large"] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_machinability_easy_feature() {
        let tol = classifier_fixture();
        let scorer = MachinabilityScorer::new(&tol);
        let result = scorer.score(&hole(10.0, 10.0), 95.0, 1.0);
        assert!((result.score - 1.0).abs() < 1e-9);
        assert_eq!(result.difficulty, Difficulty::Easy);
        assert!(result.factors.is_empty());
    }

    #[test]
    fn test_machinability_penalties_accumulate() {
        let tol = classifier_fixture();
        let scorer = MachinabilityScorer::new(&tol);
        let feature = hole(10.0, 2.0).with_tolerance(ToleranceClass::Precision);
        // Deep (+2), small (+1.5), hard (+2), tight tolerance (+1),
        // poor accessibility (+1.5): 1 + 8 = 9.
        let result = scorer.score(&feature, 620.0, 0.2);
        assert!((result.score - 9.0).abs() < 1e-9);
        assert_eq!(result.difficulty, Difficulty::Difficult);
        assert_eq!(result.factors.len(), 5);
    }

    #[test]
    fn test_machinability_monotonic_in_aspect_ratio() {
        let tol = classifier_fixture();
        let scorer = MachinabilityScorer::new(&tol);
        let shallow = scorer.score(&hole(10.0, 10.0), 95.0, 1.0);
        let deep = scorer.score(&hole(40.0, 10.0), 95.0, 1.0);
        assert!(deep.score >= shallow.score);
    }
}
