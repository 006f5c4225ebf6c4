//! The process planning pipeline.
//!
//! Stage order is fixed: feature validation, pattern recognition, geometry
//! analysis, classification and scoring, adjacency and setup grouping,
//! operation generation, cost estimation. Later stages read but never
//! mutate earlier stage outputs. Only an empty feature set is fatal;
//! every other problem degrades to a warning in the report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{info, warn};

use machplan_analysis::{
    AdjacencyAnalyzer, FeatureClassifier, GeometryAnalyzer, MachinabilityScore,
    MachinabilityScorer, PatternRecognizer,
};
use machplan_catalog::{
    MachineCatalog, MachineClass, MaterialCatalog, MaterialId, ToolCatalog,
};
use machplan_core::{
    round2, BatchPoint, ClassificationResult, CostBreakdown, Feature, FeatureGraph, FeatureId,
    FeaturePattern, GeometryAnalysis, PartGeometry, RoiEstimate, Setup, Tolerances,
};
use machplan_costing::{CostEstimator, CostRequest};

use crate::error::{PlanError, PlanResult};
use crate::operations::{MachiningOperation, OperationPlanner};

/// One planning job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub features: Vec<Feature>,
    pub part: Option<PartGeometry>,
    pub material: MaterialId,
    pub machine: MachineClass,
    pub quantity: u32,
    /// Extra batch sizes to compare against, beyond `quantity`.
    #[serde(default)]
    pub batch_quantities: Vec<u32>,
    /// Enables the automation ROI section of the report.
    #[serde(default)]
    pub parts_per_year: Option<u32>,
}

/// Per-feature assessment gathered across the analysis stages. Geometry
/// results live on the enriched feature itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureAssessment {
    pub feature_id: FeatureId,
    pub classification: ClassificationResult,
    pub machinability: MachinabilityScore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total_features: usize,
    pub total_patterns: usize,
    pub total_operations: usize,
    pub total_setups: usize,
    pub unique_tools: usize,
    pub cutting_minutes_per_part: f64,
    pub machining_hours_per_part: f64,
    pub average_complexity: f64,
}

/// Complete planning report. A finished run always returns one of these;
/// degraded sub-results are listed in `warnings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    pub generated_at: DateTime<Utc>,
    pub material: MaterialId,
    pub machine: MachineClass,
    pub patterns: Vec<FeaturePattern>,
    pub part_geometry: Option<GeometryAnalysis>,
    /// Input features with the derived fields filled in: pattern membership,
    /// classification confidence, complexity, risks and per-feature geometry.
    pub features: Vec<Feature>,
    pub assessments: Vec<FeatureAssessment>,
    pub graph: FeatureGraph,
    pub setups: Vec<Setup>,
    pub operations: Vec<MachiningOperation>,
    pub cost: CostBreakdown,
    pub batch_comparison: Vec<BatchPoint>,
    pub roi: Option<RoiEstimate>,
    pub summary: PlanSummary,
    pub warnings: Vec<String>,
}

/// Pipeline orchestrator over injected catalogs.
pub struct ProcessPlanner<'a> {
    tolerances: Tolerances,
    materials: &'a MaterialCatalog,
    tools: &'a ToolCatalog,
    machines: &'a MachineCatalog,
}

impl<'a> ProcessPlanner<'a> {
    pub fn new(
        materials: &'a MaterialCatalog,
        tools: &'a ToolCatalog,
        machines: &'a MachineCatalog,
    ) -> Self {
        Self {
            tolerances: Tolerances::default(),
            materials,
            tools,
            machines,
        }
    }

    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    pub fn plan(&self, request: &PlanRequest) -> PlanResult<PlanReport> {
        if request.features.is_empty() {
            return Err(PlanError::EmptyFeatureSet);
        }
        let material = self.materials.get(&request.material)?;
        let mut warnings = Vec::new();

        // Stage 1: input validation. Invalid features stay in the set for
        // the global analyses but are excluded from operation generation.
        let mut invalid = BTreeSet::new();
        for feature in &request.features {
            if let Err(e) = feature.validate() {
                warn!(feature = %feature.id, error = %e, "invalid feature");
                warnings.push(e.to_string());
                invalid.insert(feature.id);
            }
        }

        // Stage 2: pattern recognition.
        let recognizer = PatternRecognizer::new(&self.tolerances);
        let patterns = recognizer.recognize_all(&request.features);

        // Stage 3: geometry analysis.
        let analyzer = GeometryAnalyzer::new(&self.tolerances);
        let part_geometry = request.part.as_ref().map(|p| analyzer.analyze_part(p));
        let feature_geometry: Vec<Option<GeometryAnalysis>> = request
            .features
            .iter()
            .map(|f| {
                request.part.as_ref().map(|p| {
                    analyzer.analyze_feature(f, p, material.hardness_hb, material.hardened)
                })
            })
            .collect();

        // Stage 4: classification and machinability scoring, with the
        // derived fields written back onto a working copy of the features.
        let classifier = FeatureClassifier::new(&self.tolerances);
        let scorer = MachinabilityScorer::new(&self.tolerances);
        let mut features = request.features.clone();
        let mut assessments = Vec::with_capacity(features.len());
        for (feature, geometry) in features.iter_mut().zip(feature_geometry) {
            let accessibility = geometry
                .as_ref()
                .map(|g| g.accessibility_score)
                .unwrap_or(1.0);
            let classification = classifier.fuzzy_classify(feature);
            let machinability = scorer.score(feature, material.hardness_hb, accessibility);

            feature.pattern_id = patterns
                .iter()
                .find(|p| p.feature_ids.contains(&feature.id))
                .map(|p| p.id);
            feature.confidence_score = classification.confidence;
            match &geometry {
                Some(g) => {
                    feature.complexity_rating = g.complexity_score;
                    feature.risk_factors = g.manufacturing_risks.clone();
                    feature.alternative_strategies = g.suggested_strategies.clone();
                }
                // No part geometry; machinability scoring stands in.
                None => {
                    feature.complexity_rating = machinability.score;
                    feature.risk_factors = machinability.factors.clone();
                }
            }
            feature.geometry_analysis = geometry;

            assessments.push(FeatureAssessment {
                feature_id: feature.id,
                classification,
                machinability,
            });
        }
        let average_complexity = assessments
            .iter()
            .map(|a| a.machinability.score)
            .sum::<f64>()
            / assessments.len() as f64;

        // Stage 5: adjacency and setup grouping.
        let adjacency = AdjacencyAnalyzer::new(&self.tolerances);
        let graph = adjacency.build_graph(&features);
        let setups = adjacency.group_setups(&features);

        // Stage 6: operation generation and sequencing.
        let valid: Vec<Feature> = features
            .iter()
            .filter(|f| !invalid.contains(&f.id))
            .cloned()
            .collect();
        let setup_of = |id: FeatureId| {
            setups
                .iter()
                .find(|s| s.feature_ids.contains(&id))
                .map(|s| s.id)
                .unwrap_or(0)
        };
        let op_planner = OperationPlanner::new(self.tools, self.materials);
        let operations =
            op_planner.generate_operations(&valid, material, &setup_of, &mut warnings);

        let cutting_minutes: f64 = operations.iter().map(|o| o.estimated_minutes).sum();
        let unique_tools = {
            let mut ids: Vec<&str> = operations.iter().map(|o| o.tool_id.as_str()).collect();
            ids.sort_unstable();
            ids.dedup();
            ids.len()
        };
        let tool_cost_per_part = operations.iter().map(|o| o.tool_cost_usd).sum::<f64>();

        // Stage 7: cost estimation.
        let estimator = CostEstimator::new(self.machines, self.materials);
        let machining_hours =
            estimator.machining_hours(cutting_minutes, unique_tools as u32, request.machine)?;

        let stock_volume_cm3 = request
            .part
            .as_ref()
            .map(|p| p.volume_cm3)
            .unwrap_or_else(|| {
                // No stock model; approximate from removed material.
                let removed: f64 = features.iter().map(|f| f.removal_volume_mm3()).sum();
                (removed / 1000.0) * 2.0
            });
        let cost_request = CostRequest {
            material: request.material.clone(),
            stock_volume_cm3,
            quantity: request.quantity.max(1),
            num_features: request.features.len() as u32,
            complexity_score: average_complexity,
            has_patterns: !patterns.is_empty(),
            num_setups: setups.len().max(1) as u32,
            machine: request.machine,
            machining_hours_per_part: machining_hours,
            tool_cost_per_part: round2(tool_cost_per_part),
        };
        let cost = estimator.estimate_complete_cost(&cost_request)?;
        let batch_comparison = if request.batch_quantities.is_empty() {
            Vec::new()
        } else {
            estimator.compare_batch_sizes(&cost_request, &request.batch_quantities)?
        };
        let roi = request.parts_per_year.map(|parts| {
            estimator.estimate_roi(parts, average_complexity, request.features.len() as u32)
        });

        let summary = PlanSummary {
            total_features: request.features.len(),
            total_patterns: patterns.len(),
            total_operations: operations.len(),
            total_setups: setups.len(),
            unique_tools,
            cutting_minutes_per_part: round2(cutting_minutes),
            machining_hours_per_part: machining_hours,
            average_complexity: round2(average_complexity),
        };
        info!(
            features = summary.total_features,
            patterns = summary.total_patterns,
            operations = summary.total_operations,
            setups = summary.total_setups,
            "plan complete"
        );

        Ok(PlanReport {
            generated_at: Utc::now(),
            material: request.material.clone(),
            machine: request.machine,
            patterns,
            part_geometry,
            features,
            assessments,
            graph,
            setups,
            operations,
            cost,
            batch_comparison,
            roi,
            summary,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use machplan_core::FeatureType;

    fn planner_fixtures() -> (MaterialCatalog, ToolCatalog, MachineCatalog) {
        (
            MaterialCatalog::standard(),
            ToolCatalog::standard(),
            MachineCatalog::standard(),
        )
    }

    fn simple_request() -> PlanRequest {
        PlanRequest {
            features: vec![Feature::new(FeatureId(0), FeatureType::ThroughHole)
                .with_diameter(8.0)
                .with_depth(20.0)],
            part: None,
            material: "aluminum_6061".into(),
            machine: MachineClass::ThreeAxisCnc,
            quantity: 5,
            batch_quantities: Vec::new(),
            parts_per_year: None,
        }
    }

    #[test]
    fn test_empty_feature_set_is_fatal() {
        let (materials, tools, machines) = planner_fixtures();
        let planner = ProcessPlanner::new(&materials, &tools, &machines);
        let request = PlanRequest {
            features: Vec::new(),
            ..simple_request()
        };
        assert!(matches!(
            planner.plan(&request),
            Err(PlanError::EmptyFeatureSet)
        ));
    }

    #[test]
    fn test_single_hole_produces_full_report() {
        let (materials, tools, machines) = planner_fixtures();
        let planner = ProcessPlanner::new(&materials, &tools, &machines);
        let report = planner.plan(&simple_request()).unwrap();
        assert!(report.warnings.is_empty());
        assert_eq!(report.summary.total_operations, 1);
        assert_eq!(report.summary.total_setups, 1);
        assert!(report.cost.total_cost > 0.0);
        assert!(report.summary.machining_hours_per_part > 0.0);

        // Without part geometry the machinability score stands in for the
        // feature's complexity rating.
        assert_eq!(report.features.len(), 1);
        let hole = &report.features[0];
        assert!(hole.geometry_analysis.is_none());
        assert!((hole.complexity_rating - report.assessments[0].machinability.score).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_feature_degrades_to_warning() {
        let (materials, tools, machines) = planner_fixtures();
        let planner = ProcessPlanner::new(&materials, &tools, &machines);
        let mut request = simple_request();
        // Hole with no diameter: invalid, but the run still completes.
        request
            .features
            .push(Feature::new(FeatureId(1), FeatureType::BlindHole).with_depth(10.0));

        let report = planner.plan(&request).unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.summary.total_operations, 1);
    }
}
