//! Batch cost estimation.
//!
//! Programming and setup are one-time costs amortized across the batch;
//! material, machining and tool wear scale per part. Every exported USD
//! figure passes through [`round2`], so re-estimating with identical
//! inputs yields an identical breakdown.

use serde::{Deserialize, Serialize};
use tracing::debug;

use machplan_catalog::{LaborRates, MachineCatalog, MachineClass, MaterialCatalog, MaterialId};
use machplan_core::{round2, BatchPoint, CostBreakdown, CostDetails, RoiEstimate};

use crate::error::{CostError, CostResult};

/// Inputs for one batch estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostRequest {
    pub material: MaterialId,
    /// Stock volume per part.
    pub stock_volume_cm3: f64,
    pub quantity: u32,
    pub num_features: u32,
    /// Part complexity, 1-10.
    pub complexity_score: f64,
    pub has_patterns: bool,
    pub num_setups: u32,
    pub machine: MachineClass,
    pub machining_hours_per_part: f64,
    pub tool_cost_per_part: f64,
}

/// Cost estimator over injected, read-only catalogs.
pub struct CostEstimator<'a> {
    machines: &'a MachineCatalog,
    materials: &'a MaterialCatalog,
    labor: LaborRates,
    /// Overhead-inclusive multiplier applied to direct costs.
    overhead_rate: f64,
    profit_margin: f64,
}

impl<'a> CostEstimator<'a> {
    pub fn new(machines: &'a MachineCatalog, materials: &'a MaterialCatalog) -> Self {
        Self {
            machines,
            materials,
            labor: LaborRates::default(),
            overhead_rate: 1.5,
            profit_margin: 0.25,
        }
    }

    pub fn with_labor_rates(mut self, labor: LaborRates) -> Self {
        self.labor = labor;
        self
    }

    /// Programming hours for an automated feature-based workflow:
    /// 0.05 h per feature scaled by complexity, with a half-hour credit
    /// when patterns let operations be programmed once and repeated.
    /// Floor of 0.25 h.
    pub fn programming_hours(
        &self,
        num_features: u32,
        complexity_score: f64,
        has_patterns: bool,
    ) -> f64 {
        let complexity_multiplier = 1.0 + complexity_score / 10.0;
        let pattern_credit = if has_patterns { 0.5 } else { 0.0 };
        let hours =
            f64::from(num_features) * 0.05 * complexity_multiplier - pattern_credit;
        round2(hours.max(0.25))
    }

    /// Manual programming baseline: 0.5 h per feature scaled by
    /// complexity.
    pub fn manual_programming_hours(&self, num_features: u32, complexity_score: f64) -> f64 {
        round2(f64::from(num_features) * 0.5 * (1.0 + complexity_score / 10.0))
    }

    /// Total setup hours: the first setup at the machine's base rate, each
    /// additional setup at half, the sum scaled by complexity.
    pub fn setup_hours(
        &self,
        machine: MachineClass,
        num_setups: u32,
        complexity_score: f64,
    ) -> CostResult<f64> {
        let rate = self.machines.rate(machine)?;
        let base = rate.base_setup_hours;
        let additional = f64::from(num_setups.saturating_sub(1)) * base * 0.5;
        let complexity_multiplier = 1.0 + complexity_score / 20.0;
        Ok(round2((base + additional) * complexity_multiplier))
    }

    /// Tool change hours: the first tool is pre-loaded, so a job with n
    /// unique tools pays for n−1 changes.
    pub fn tool_change_hours(&self, unique_tools: u32, machine: MachineClass) -> CostResult<f64> {
        let rate = self.machines.rate(machine)?;
        let changes = unique_tools.saturating_sub(1);
        Ok(round2(
            f64::from(changes) * rate.tool_change_minutes / 60.0,
        ))
    }

    /// Machining hours per part: cutting time plus tool changes plus a
    /// 10% allowance for rapid moves.
    pub fn machining_hours(
        &self,
        cutting_minutes: f64,
        unique_tools: u32,
        machine: MachineClass,
    ) -> CostResult<f64> {
        let cutting_hours = cutting_minutes / 60.0;
        let changes = self.tool_change_hours(unique_tools, machine)?;
        Ok(round2(cutting_hours + changes + cutting_hours * 0.10))
    }

    /// Full batch estimate.
    pub fn estimate_complete_cost(&self, request: &CostRequest) -> CostResult<CostBreakdown> {
        if request.quantity == 0 {
            return Err(CostError::ZeroQuantity);
        }
        if !request.machining_hours_per_part.is_finite() || request.machining_hours_per_part < 0.0
        {
            return Err(CostError::InvalidMachiningHours(
                request.machining_hours_per_part,
            ));
        }
        let quantity = f64::from(request.quantity);

        let material_cost_per_part = self
            .materials
            .estimate_material_cost(&request.material, request.stock_volume_cm3)?;
        let material_cost = material_cost_per_part * quantity;

        let programming_hours = self.programming_hours(
            request.num_features,
            request.complexity_score,
            request.has_patterns,
        );
        let programming_cost = programming_hours * self.labor.programmer_hourly;

        let setup_hours =
            self.setup_hours(request.machine, request.num_setups, request.complexity_score)?;
        let setup_cost = setup_hours * self.labor.setup_hourly;

        let machine_rate = self.machines.rate(request.machine)?;
        let machining_cost_per_part =
            request.machining_hours_per_part * machine_rate.hourly_rate_usd;
        let machining_cost = machining_cost_per_part * quantity;

        let tool_cost = request.tool_cost_per_part * quantity;

        let subtotal = material_cost + programming_cost + setup_cost + machining_cost + tool_cost;
        let overhead_cost = subtotal * (self.overhead_rate - 1.0);
        let total_cost = (subtotal + overhead_cost) * (1.0 + self.profit_margin);
        let cost_per_unit = total_cost / quantity;

        debug!(
            quantity = request.quantity,
            total_cost, cost_per_unit, "cost estimate complete"
        );

        Ok(CostBreakdown {
            material_cost: round2(material_cost),
            programming_cost: round2(programming_cost),
            setup_cost: round2(setup_cost),
            machining_cost: round2(machining_cost),
            tool_cost: round2(tool_cost),
            overhead_cost: round2(overhead_cost),
            total_cost: round2(total_cost),
            cost_per_unit: round2(cost_per_unit),
            details: CostDetails {
                quantity: request.quantity,
                material_cost_per_part: round2(material_cost_per_part),
                machining_cost_per_part: round2(machining_cost_per_part),
                programming_hours,
                setup_hours,
                machining_hours_per_part: request.machining_hours_per_part,
                machine_rate_per_hour: machine_rate.hourly_rate_usd,
                overhead_rate_percent: ((self.overhead_rate - 1.0) * 100.0).round() as u32,
                profit_margin_percent: (self.profit_margin * 100.0).round() as u32,
            },
        })
    }

    /// Re-estimate at each requested quantity to expose amortization of
    /// one-time programming and setup costs.
    pub fn compare_batch_sizes(
        &self,
        request: &CostRequest,
        quantities: &[u32],
    ) -> CostResult<Vec<BatchPoint>> {
        let mut points = Vec::with_capacity(quantities.len());
        for &quantity in quantities {
            let breakdown = self.estimate_complete_cost(&CostRequest {
                quantity,
                ..request.clone()
            })?;
            points.push(BatchPoint {
                quantity,
                total_cost: breakdown.total_cost,
                cost_per_unit: breakdown.cost_per_unit,
            });
        }
        Ok(points)
    }

    /// Annual savings of automated planning over manual programming.
    pub fn estimate_roi(
        &self,
        parts_per_year: u32,
        avg_complexity: f64,
        avg_features_per_part: u32,
    ) -> RoiEstimate {
        let manual = self.manual_programming_hours(avg_features_per_part, avg_complexity);
        let automated = self.programming_hours(avg_features_per_part, avg_complexity, false);
        let saved_per_part = manual - automated;
        let annual_hours = saved_per_part * f64::from(parts_per_year);
        let improvement = if manual > 0.0 {
            saved_per_part / manual * 100.0
        } else {
            0.0
        };

        RoiEstimate {
            manual_hours_per_part: manual,
            automated_hours_per_part: automated,
            time_saved_per_part_hours: round2(saved_per_part),
            parts_per_year,
            annual_hours_saved: round2(annual_hours),
            annual_savings_usd: round2(annual_hours * self.labor.programmer_hourly),
            efficiency_improvement_percent: round2(improvement),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogs() -> (MachineCatalog, MaterialCatalog) {
        (MachineCatalog::standard(), MaterialCatalog::standard())
    }

    fn request() -> CostRequest {
        CostRequest {
            material: "aluminum_6061".into(),
            stock_volume_cm3: 500.0,
            quantity: 10,
            num_features: 12,
            complexity_score: 4.0,
            has_patterns: true,
            num_setups: 2,
            machine: MachineClass::ThreeAxisCnc,
            machining_hours_per_part: 0.8,
            tool_cost_per_part: 2.4,
        }
    }

    #[test]
    fn test_programming_hours_floor_and_pattern_credit() {
        let (machines, materials) = catalogs();
        let estimator = CostEstimator::new(&machines, &materials);
        // 12 features, complexity 4: 12 * 0.05 * 1.4 = 0.84, minus 0.5.
        assert!((estimator.programming_hours(12, 4.0, true) - 0.34).abs() < 1e-9);
        assert!((estimator.programming_hours(12, 4.0, false) - 0.84).abs() < 1e-9);
        // Tiny parts hit the floor.
        assert!((estimator.programming_hours(1, 1.0, true) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_setup_hours_additional_setups_at_half_rate() {
        let (machines, materials) = catalogs();
        let estimator = CostEstimator::new(&machines, &materials);
        // 3-axis CNC base 1.0 h; 2 setups: (1.0 + 0.5) * (1 + 4/20) = 1.8.
        let hours = estimator
            .setup_hours(MachineClass::ThreeAxisCnc, 2, 4.0)
            .unwrap();
        assert!((hours - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_machining_hours_includes_changes_and_rapids() {
        let (machines, materials) = catalogs();
        let estimator = CostEstimator::new(&machines, &materials);
        // 30 min cutting, 3 tools on a 3-axis CNC (1.5 min/change):
        // 0.5 + 2 * 0.025 + 0.05 = 0.6.
        let hours = estimator
            .machining_hours(30.0, 3, MachineClass::ThreeAxisCnc)
            .unwrap();
        assert!((hours - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_is_idempotent() {
        let (machines, materials) = catalogs();
        let estimator = CostEstimator::new(&machines, &materials);
        let a = estimator.estimate_complete_cost(&request()).unwrap();
        let b = estimator.estimate_complete_cost(&request()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_total_reconciles_with_per_unit() {
        let (machines, materials) = catalogs();
        let estimator = CostEstimator::new(&machines, &materials);
        let breakdown = estimator.estimate_complete_cost(&request()).unwrap();
        let reconstructed = breakdown.cost_per_unit * f64::from(breakdown.details.quantity);
        assert!((reconstructed - breakdown.total_cost).abs() < 0.1);
    }

    #[test]
    fn test_overhead_and_margin_applied() {
        let (machines, materials) = catalogs();
        let estimator = CostEstimator::new(&machines, &materials);
        let breakdown = estimator.estimate_complete_cost(&request()).unwrap();
        let direct = breakdown.material_cost
            + breakdown.programming_cost
            + breakdown.setup_cost
            + breakdown.machining_cost
            + breakdown.tool_cost;
        assert!((breakdown.overhead_cost - direct * 0.5).abs() < 0.05);
        assert!((breakdown.total_cost - (direct + breakdown.overhead_cost) * 1.25).abs() < 0.05);
    }

    #[test]
    fn test_larger_batches_amortize_one_time_costs() {
        let (machines, materials) = catalogs();
        let estimator = CostEstimator::new(&machines, &materials);
        let points = estimator
            .compare_batch_sizes(&request(), &[1, 10, 100])
            .unwrap();
        assert_eq!(points.len(), 3);
        assert!(points[0].cost_per_unit > points[1].cost_per_unit);
        assert!(points[1].cost_per_unit > points[2].cost_per_unit);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let (machines, materials) = catalogs();
        let estimator = CostEstimator::new(&machines, &materials);
        let bad = CostRequest {
            quantity: 0,
            ..request()
        };
        assert_eq!(
            estimator.estimate_complete_cost(&bad),
            Err(CostError::ZeroQuantity)
        );
    }

    #[test]
    fn test_unknown_material_is_lookup_miss() {
        let (machines, materials) = catalogs();
        let estimator = CostEstimator::new(&machines, &materials);
        let bad = CostRequest {
            material: "unobtainium".into(),
            ..request()
        };
        assert!(matches!(
            estimator.estimate_complete_cost(&bad),
            Err(CostError::Catalog(_))
        ));
    }

    #[test]
    fn test_roi_favors_automation() {
        let (machines, materials) = catalogs();
        let estimator = CostEstimator::new(&machines, &materials);
        let roi = estimator.estimate_roi(200, 5.0, 15);
        // Manual: 15 * 0.5 * 1.5 = 11.25 h; automated: 15 * 0.05 * 1.5 = 1.125.
        assert!((roi.manual_hours_per_part - 11.25).abs() < 1e-9);
        assert!((roi.automated_hours_per_part - 1.13).abs() < 0.01);
        assert!(roi.annual_savings_usd > 0.0);
        assert!(roi.efficiency_improvement_percent > 85.0);
    }
}
