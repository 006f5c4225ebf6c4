//! Tool engagement analysis and multi-pass depth scheduling.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ToolpathError, ToolpathResult};

/// Chip thinning below this value is treated as a degenerate cut when
/// inverting it into a feed adjustment.
const MIN_CHIP_THINNING: f64 = 1e-6;

/// Engagement conditions for one radial stepover at one depth of cut.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolEngagement {
    /// Angular extent of tool-workpiece contact, degrees. 180 is a full
    /// slotting cut.
    pub engagement_angle_deg: f64,
    pub radial_depth_mm: f64,
    pub axial_depth_mm: f64,
    /// sin(angle/2); chips thin out as engagement drops.
    pub chip_thinning_factor: f64,
    /// Relative cutting force versus a full-width, one-diameter-deep cut.
    pub cutting_force_factor: f64,
    /// Feed multiplier compensating for chip thinning.
    pub feed_adjustment: f64,
}

/// Engagement angle and chip-thinning compensation for a given stepover.
///
/// The angle is 2·arcsin(stepover / tool_diameter), clamped so that any
/// stepover at or beyond the tool diameter reads as a full 180° slot.
pub fn analyze_engagement(
    tool_diameter: f64,
    stepover: f64,
    depth_of_cut: f64,
) -> ToolpathResult<ToolEngagement> {
    if tool_diameter <= 0.0 {
        return Err(ToolpathError::InvalidToolDiameter(tool_diameter));
    }
    if stepover <= 0.0 {
        return Err(ToolpathError::InvalidStepover {
            stepover,
            tool_diameter,
        });
    }
    if depth_of_cut <= 0.0 {
        return Err(ToolpathError::InvalidDepth(depth_of_cut));
    }

    let ratio = (stepover / tool_diameter).min(1.0);
    let engagement_angle_deg = 2.0 * ratio.asin().to_degrees();
    let chip_thinning_factor = (engagement_angle_deg / 2.0).to_radians().sin();
    let cutting_force_factor = (engagement_angle_deg / 180.0) * (depth_of_cut / tool_diameter);
    let feed_adjustment = 1.0 / chip_thinning_factor.max(MIN_CHIP_THINNING);

    debug!(
        tool_diameter,
        stepover, engagement_angle_deg, "engagement analysis"
    );

    Ok(ToolEngagement {
        engagement_angle_deg,
        radial_depth_mm: stepover,
        axial_depth_mm: depth_of_cut,
        chip_thinning_factor,
        cutting_force_factor,
        feed_adjustment,
    })
}

/// Decreasing depth-of-cut schedule for multi-pass cutting.
///
/// Starts at 0.5×D (0.3×D for hardened material), scales each pass by
/// 0.9× down to a floor of 0.1×D, and closes with an exact-remainder
/// final pass so the schedule always sums to the feature depth.
pub fn adaptive_stepdown(
    tool_diameter: f64,
    feature_depth: f64,
    hardened: bool,
) -> ToolpathResult<Vec<f64>> {
    if tool_diameter <= 0.0 {
        return Err(ToolpathError::InvalidToolDiameter(tool_diameter));
    }
    if feature_depth <= 0.0 {
        return Err(ToolpathError::InvalidDepth(feature_depth));
    }

    let mut max_doc = tool_diameter * 0.5;
    if hardened {
        max_doc *= 0.6;
    }
    let min_doc = tool_diameter * 0.1;

    let mut schedule = Vec::new();
    let mut remaining = feature_depth;
    let mut doc = max_doc;
    while doc < remaining {
        schedule.push(doc);
        remaining -= doc;
        doc = (doc * 0.9).max(min_doc);
    }
    // The remainder may be below the floor; it still gets its own pass.
    schedule.push(remaining);
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engagement_ten_mm_tool_four_mm_stepover() {
        let e = analyze_engagement(10.0, 4.0, 5.0).unwrap();
        assert!((e.engagement_angle_deg - 47.156).abs() < 0.05);
        assert!((e.chip_thinning_factor - 0.40).abs() < 0.005);
        assert!((e.feed_adjustment - 2.50).abs() < 0.01);
    }

    #[test]
    fn test_full_slot_is_180_degrees() {
        let e = analyze_engagement(10.0, 10.0, 5.0).unwrap();
        assert!((e.engagement_angle_deg - 180.0).abs() < 1e-9);
        assert!((e.chip_thinning_factor - 1.0).abs() < 1e-9);
        assert!((e.feed_adjustment - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_oversized_stepover_clamps_to_full_slot() {
        let e = analyze_engagement(10.0, 14.0, 5.0).unwrap();
        assert!((e.engagement_angle_deg - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_engagement_rejects_bad_input() {
        assert!(analyze_engagement(0.0, 4.0, 5.0).is_err());
        assert!(analyze_engagement(10.0, -1.0, 5.0).is_err());
        assert!(analyze_engagement(10.0, 4.0, 0.0).is_err());
    }

    #[test]
    fn test_stepdown_sums_to_depth_exactly() {
        for &(dia, depth) in &[(10.0, 25.0), (6.0, 7.3), (12.0, 1.0), (8.0, 40.0)] {
            let schedule = adaptive_stepdown(dia, depth, false).unwrap();
            let total: f64 = schedule.iter().sum();
            assert!(
                (total - depth).abs() < 1e-9,
                "dia {dia} depth {depth} sum {total}"
            );
        }
    }

    #[test]
    fn test_stepdown_decreases_and_respects_floor() {
        let schedule = adaptive_stepdown(10.0, 40.0, false).unwrap();
        assert!((schedule[0] - 5.0).abs() < 1e-9);
        for w in schedule.windows(2) {
            // Every pass but the remainder stays at or above the floor.
            assert!(w[0] >= 1.0 - 1e-9);
            assert!(w[1] <= w[0] + 1e-9);
        }
    }

    #[test]
    fn test_stepdown_hardened_reduces_first_pass() {
        let schedule = adaptive_stepdown(10.0, 20.0, true).unwrap();
        assert!((schedule[0] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_shallow_feature_single_pass() {
        let schedule = adaptive_stepdown(10.0, 3.0, false).unwrap();
        assert_eq!(schedule, vec![3.0]);
    }
}
