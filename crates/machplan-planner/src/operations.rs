//! Machining operation generation and sequencing.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use machplan_catalog::{Coolant, Material, MaterialCatalog, ToolCatalog, ToolType};
use machplan_core::{Feature, FeatureCategory, FeatureId, FeatureType, ToleranceClass};
use machplan_toolpath::{
    adaptive_stepdown, analyze_engagement, recommend_milling_type, recommend_strategy,
    trochoidal_parameters, MillingType, OperationPhase, ToolRigidity, ToolpathStrategy,
};

/// One sequenced cut.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachiningOperation {
    pub id: u32,
    pub name: String,
    pub feature_id: FeatureId,
    pub phase: OperationPhase,
    pub strategy: ToolpathStrategy,
    pub milling_type: MillingType,
    pub tool_id: String,
    pub tool_type: ToolType,
    pub tool_diameter_mm: f64,
    pub spindle_rpm: f64,
    pub feed_rate_mm_min: f64,
    pub cutting_speed_m_min: f64,
    pub stepover_mm: f64,
    /// Depth-of-cut schedule; sums to the feature depth.
    pub passes: Vec<f64>,
    pub estimated_minutes: f64,
    pub setup_id: u32,
    pub coolant: Coolant,
    /// Tool wear cost attributed to this operation, USD.
    pub tool_cost_usd: f64,
}

/// Sequencing tier; lower cuts first.
fn priority(feature_type: FeatureType) -> u8 {
    if feature_type == FeatureType::PlanarFace {
        return 0;
    }
    match feature_type.category() {
        FeatureCategory::Holes => 1,
        FeatureCategory::Pockets | FeatureCategory::Grooves | FeatureCategory::Protrusions => 2,
        FeatureCategory::Surfaces | FeatureCategory::Edges => 3,
    }
}

pub struct OperationPlanner<'a> {
    tools: &'a ToolCatalog,
    materials: &'a MaterialCatalog,
}

impl<'a> OperationPlanner<'a> {
    pub fn new(tools: &'a ToolCatalog, materials: &'a MaterialCatalog) -> Self {
        Self { tools, materials }
    }

    /// Generate and sequence operations for the whole feature set.
    ///
    /// Lookup misses degrade to warnings: the feature is skipped, the run
    /// continues. Ordering is by priority tier (facing, then holes, then
    /// pockets, then surfaces), grouping by tool id within a tier to
    /// minimize tool changes, then by setup id to minimize repositioning.
    pub fn generate_operations(
        &self,
        features: &[Feature],
        material: &Material,
        setup_of: &dyn Fn(FeatureId) -> u32,
        warnings: &mut Vec<String>,
    ) -> Vec<MachiningOperation> {
        let mut operations = Vec::new();

        for feature in features {
            match self.operations_for_feature(feature, material, setup_of) {
                Ok(ops) => operations.extend(ops),
                Err(message) => {
                    warn!(feature = %feature.id, message, "operation generation degraded");
                    warnings.push(message);
                }
            }
        }

        let tier: std::collections::BTreeMap<FeatureId, u8> = features
            .iter()
            .map(|f| (f.id, priority(f.feature_type)))
            .collect();
        operations.sort_by(|a, b| {
            let ka = (tier[&a.feature_id], a.phase_rank(), &a.tool_id, a.setup_id, a.feature_id);
            let kb = (tier[&b.feature_id], b.phase_rank(), &b.tool_id, b.setup_id, b.feature_id);
            ka.cmp(&kb)
        });
        for (i, op) in operations.iter_mut().enumerate() {
            op.id = i as u32;
        }

        debug!(operations = operations.len(), "operation sequencing complete");
        operations
    }

    fn operations_for_feature(
        &self,
        feature: &Feature,
        material: &Material,
        setup_of: &dyn Fn(FeatureId) -> u32,
    ) -> Result<Vec<MachiningOperation>, String> {
        let mut ops = Vec::new();

        if feature.feature_type == FeatureType::ThreadedHole {
            // Threads take a pilot drill followed by a thread mill.
            let pilot_diameter = feature.diameter.unwrap_or(6.0) * 0.85;
            ops.push(self.build_operation(
                feature,
                material,
                ToolType::Drill,
                pilot_diameter,
                OperationPhase::Roughing,
                "Drill pilot",
                setup_of,
            )?);
            ops.push(self.build_operation(
                feature,
                material,
                ToolType::ThreadMill,
                feature.diameter.unwrap_or(6.0) * 0.8,
                OperationPhase::Finishing,
                "Thread mill",
                setup_of,
            )?);
            return Ok(ops);
        }

        let diameter = self.characteristic_diameter(feature);
        let depth = feature.depth.or(feature.height).unwrap_or(0.0);
        let tool_type = ToolCatalog::tool_type_for_feature(feature.feature_type, depth, diameter);

        ops.push(self.build_operation(
            feature,
            material,
            tool_type,
            diameter,
            OperationPhase::Roughing,
            "Rough",
            setup_of,
        )?);

        // Toleranced features get a separate finishing pass.
        if feature.tolerance_class != ToleranceClass::Standard {
            ops.push(self.build_operation(
                feature,
                material,
                tool_type,
                diameter,
                OperationPhase::Finishing,
                "Finish",
                setup_of,
            )?);
        }

        Ok(ops)
    }

    #[allow(clippy::too_many_arguments)]
    fn build_operation(
        &self,
        feature: &Feature,
        material: &Material,
        tool_type: ToolType,
        diameter: f64,
        phase: OperationPhase,
        verb: &str,
        setup_of: &dyn Fn(FeatureId) -> u32,
    ) -> Result<MachiningOperation, String> {
        let depth = feature.depth.or(feature.height).unwrap_or(1.0).max(0.1);

        let tool = self
            .tools
            .find_tool(tool_type, diameter, diameter.max(1.0) * 0.5)
            .map_err(|e| format!("{}: {e}", feature.id))?;

        let params = self
            .materials
            .cutting_parameters(&material.id, tool.substrate)
            .map_err(|e| format!("{}: {e}", feature.id))?;

        let cutting_speed = params.mid_cutting_speed();
        let spindle_rpm = (cutting_speed * 1000.0
            / (std::f64::consts::PI * tool.diameter_mm))
            .min(f64::from(tool.max_rpm));
        let mut stepover = (params.stepover_factor * tool.diameter_mm).max(0.1);

        let milling_type =
            recommend_milling_type(material.hardened, phase, ToolRigidity::Standard);
        let strategy = if tool_type == ToolType::Drill {
            ToolpathStrategy::SpiralIn
        } else {
            recommend_strategy(feature)
        };

        let base_feed = spindle_rpm * f64::from(tool.flutes) * params.mid_feed_per_tooth();
        let feed_rate = if tool_type == ToolType::Drill {
            // Axial feed; chip thinning does not apply to drilling.
            base_feed
        } else if strategy == ToolpathStrategy::Trochoidal {
            let width = feature
                .width
                .or(feature.diameter)
                .unwrap_or(tool.diameter_mm);
            let trochoidal = trochoidal_parameters(width, tool.diameter_mm)
                .map_err(|e| format!("{}: {e}", feature.id))?;
            stepover = trochoidal.step_forward_mm;
            base_feed * trochoidal.feed_multiplier
        } else {
            let engagement = analyze_engagement(tool.diameter_mm, stepover, depth)
                .map_err(|e| format!("{}: {e}", feature.id))?;
            base_feed * engagement.feed_adjustment.min(2.5)
        };

        let passes = adaptive_stepdown(tool.diameter_mm, depth, material.hardened)
            .map_err(|e| format!("{}: {e}", feature.id))?;

        let estimated_minutes = Self::estimate_minutes(
            feature,
            tool_type,
            feed_rate,
            stepover,
            passes[0],
            phase,
            depth,
        );
        let tool_cost_usd = ToolCatalog::cost_per_operation(tool, estimated_minutes)
            .map_err(|e| format!("{}: {e}", feature.id))?;

        Ok(MachiningOperation {
            id: 0,
            name: format!("{verb} {} {}", feature.feature_type, feature.id),
            feature_id: feature.id,
            phase,
            strategy,
            milling_type,
            tool_id: tool.id.clone(),
            tool_type,
            tool_diameter_mm: tool.diameter_mm,
            spindle_rpm,
            feed_rate_mm_min: feed_rate,
            cutting_speed_m_min: cutting_speed,
            stepover_mm: stepover,
            passes,
            estimated_minutes,
            setup_id: setup_of(feature.id),
            coolant: params.coolant,
            tool_cost_usd,
        })
    }

    /// Characteristic tool-sizing diameter for a feature.
    fn characteristic_diameter(&self, feature: &Feature) -> f64 {
        if let Some(d) = feature.diameter {
            return d;
        }
        if let Some(w) = feature.width {
            // Pocket tools run at roughly half the narrow dimension.
            return (w / 2.0).clamp(2.0, 25.0);
        }
        match feature.feature_type.category() {
            FeatureCategory::Surfaces => 50.0,
            FeatureCategory::Edges => 6.0,
            _ => 10.0,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn estimate_minutes(
        feature: &Feature,
        tool_type: ToolType,
        feed_rate: f64,
        stepover: f64,
        first_pass_doc: f64,
        phase: OperationPhase,
        depth: f64,
    ) -> f64 {
        let minutes = if tool_type == ToolType::Drill {
            // Plunge at the axial feed plus approach.
            depth / feed_rate.max(1.0) + 0.1
        } else {
            let volume = feature.removal_volume_mm3();
            if volume > 0.0 {
                let mrr = feed_rate.max(1.0) * stepover * first_pass_doc.max(0.1);
                volume / mrr + 0.2
            } else {
                0.5
            }
        };
        // Finishing removes little material but runs the full boundary.
        let minutes = match phase {
            OperationPhase::Roughing => minutes,
            OperationPhase::Finishing => (minutes * 0.4).max(0.1),
        };
        (minutes * 100.0).round() / 100.0
    }
}

impl MachiningOperation {
    fn phase_rank(&self) -> u8 {
        match self.phase {
            OperationPhase::Roughing => 0,
            OperationPhase::Finishing => 1,
        }
    }
}
