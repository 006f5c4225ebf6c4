//! Cost breakdown types. A [`CostBreakdown`] is derived purely from its
//! inputs; re-estimating with identical inputs yields an identical value.

use serde::{Deserialize, Serialize};

/// Complete cost breakdown for a batch of parts, USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub material_cost: f64,
    pub programming_cost: f64,
    pub setup_cost: f64,
    pub machining_cost: f64,
    pub tool_cost: f64,
    pub overhead_cost: f64,
    pub total_cost: f64,
    pub cost_per_unit: f64,
    pub details: CostDetails,
}

/// Supporting figures behind the breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostDetails {
    pub quantity: u32,
    pub material_cost_per_part: f64,
    pub machining_cost_per_part: f64,
    pub programming_hours: f64,
    pub setup_hours: f64,
    pub machining_hours_per_part: f64,
    pub machine_rate_per_hour: f64,
    pub overhead_rate_percent: u32,
    pub profit_margin_percent: u32,
}

/// Cost per unit at one batch size, for amortization comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPoint {
    pub quantity: u32,
    pub total_cost: f64,
    pub cost_per_unit: f64,
}

/// Return on investment of automated process planning versus manual
/// programming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiEstimate {
    pub manual_hours_per_part: f64,
    pub automated_hours_per_part: f64,
    pub time_saved_per_part_hours: f64,
    pub parts_per_year: u32,
    pub annual_hours_saved: f64,
    pub annual_savings_usd: f64,
    pub efficiency_improvement_percent: f64,
}

/// Round to two decimals; applied to every exported figure (USD, hours,
/// percentages) so repeated estimates are byte-identical.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
