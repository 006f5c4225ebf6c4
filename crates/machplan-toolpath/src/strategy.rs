//! Cutting strategy selection: milling direction, trochoidal and
//! high-speed parameters, rest machining.

use serde::{Deserialize, Serialize};
use tracing::debug;

use machplan_catalog::MaterialClass;
use machplan_core::{Feature, FeatureCategory};

use crate::error::{ToolpathError, ToolpathResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolpathStrategy {
    Zigzag,
    SpiralIn,
    SpiralOut,
    Adaptive,
    Trochoidal,
    MorphedSpiral,
    ConstantEngagement,
    OneWay,
    Raster,
}

impl std::fmt::Display for ToolpathStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Zigzag => write!(f, "Zigzag"),
            Self::SpiralIn => write!(f, "Spiral Inward"),
            Self::SpiralOut => write!(f, "Spiral Outward"),
            Self::Adaptive => write!(f, "Adaptive Clearing"),
            Self::Trochoidal => write!(f, "Trochoidal Milling"),
            Self::MorphedSpiral => write!(f, "Morphed Spiral"),
            Self::ConstantEngagement => write!(f, "Constant Engagement"),
            Self::OneWay => write!(f, "One-Way Cutting"),
            Self::Raster => write!(f, "Raster Pattern"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MillingType {
    Climb,
    Conventional,
}

impl std::fmt::Display for MillingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Climb => write!(f, "Climb Milling"),
            Self::Conventional => write!(f, "Conventional Milling"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationPhase {
    Roughing,
    Finishing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolRigidity {
    Low,
    Standard,
    High,
}

/// Climb versus conventional milling.
///
/// Hardened material always takes climb (limits work hardening).
/// Roughing in soft material takes conventional for stability; finishing
/// takes climb unless the setup is too flexible to hold it.
pub fn recommend_milling_type(
    hardened: bool,
    phase: OperationPhase,
    rigidity: ToolRigidity,
) -> MillingType {
    if hardened {
        return MillingType::Climb;
    }
    match phase {
        OperationPhase::Roughing => MillingType::Conventional,
        OperationPhase::Finishing => match rigidity {
            ToolRigidity::Low => MillingType::Conventional,
            _ => MillingType::Climb,
        },
    }
}

/// Trochoidal milling parameters for a slot cut.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrochoidalParameters {
    pub loop_diameter_mm: f64,
    pub step_forward_mm: f64,
    /// Effective radial engagement width, equal to the loop diameter.
    pub engagement_width_mm: f64,
    pub loops_per_mm: f64,
    /// Multiplier over the conventional base feed.
    pub feed_multiplier: f64,
}

/// Loop geometry for trochoidal slotting: 0.15×D loops, stepping 0.1×D
/// per loop in a narrow slot (under 1.2×D) and 0.3×D in a wider one.
pub fn trochoidal_parameters(
    slot_width: f64,
    tool_diameter: f64,
) -> ToolpathResult<TrochoidalParameters> {
    if tool_diameter <= 0.0 {
        return Err(ToolpathError::InvalidToolDiameter(tool_diameter));
    }
    if slot_width <= 0.0 {
        return Err(ToolpathError::InvalidSlotWidth(slot_width));
    }

    let loop_diameter = tool_diameter * 0.15;
    let narrow = slot_width < tool_diameter * 1.2;
    let (step_forward, feed_multiplier) = if narrow {
        (tool_diameter * 0.1, 1.5)
    } else {
        (tool_diameter * 0.3, 2.0)
    };

    Ok(TrochoidalParameters {
        loop_diameter_mm: loop_diameter,
        step_forward_mm: step_forward,
        engagement_width_mm: loop_diameter,
        loops_per_mm: 1.0 / step_forward,
        feed_multiplier,
    })
}

/// High-speed machining parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HsmParameters {
    pub cutting_speed_m_min: f64,
    pub spindle_rpm: f64,
    pub feed_multiplier: f64,
    pub radial_engagement_mm: f64,
    pub axial_engagement_mm: f64,
    pub strategy: ToolpathStrategy,
}

/// Speed and feed multipliers for HSM, keyed by material class: 3.0×/2.0×
/// for aluminum and plastics, 1.5×/1.3× for steels, 2.0×/1.5× otherwise.
pub fn hsm_parameters(
    base_cutting_speed_m_min: f64,
    tool_diameter: f64,
    material_class: MaterialClass,
) -> ToolpathResult<HsmParameters> {
    if tool_diameter <= 0.0 {
        return Err(ToolpathError::InvalidToolDiameter(tool_diameter));
    }

    let (speed_multiplier, feed_multiplier) = match material_class {
        MaterialClass::Aluminum | MaterialClass::Plastic => (3.0, 2.0),
        MaterialClass::MildSteel
        | MaterialClass::AlloySteel
        | MaterialClass::StainlessSteel
        | MaterialClass::ToolSteel => (1.5, 1.3),
        _ => (2.0, 1.5),
    };

    let cutting_speed = base_cutting_speed_m_min * speed_multiplier;
    let spindle_rpm = cutting_speed * 1000.0 / (std::f64::consts::PI * tool_diameter);

    debug!(%material_class, cutting_speed, spindle_rpm, "hsm parameters");

    Ok(HsmParameters {
        cutting_speed_m_min: cutting_speed,
        spindle_rpm,
        feed_multiplier,
        radial_engagement_mm: tool_diameter * 0.1,
        axial_engagement_mm: tool_diameter * 0.3,
        strategy: ToolpathStrategy::Adaptive,
    })
}

/// Stock left behind in a corner by a larger previous tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestArea {
    pub area_id: u32,
    pub previous_tool_diameter_mm: f64,
    pub remaining_stock_mm: f64,
    /// Corner location relative to the feature center.
    pub offset_mm: (f64, f64),
    pub size_mm: (f64, f64),
}

/// Corner rest material after a prior operation with a larger tool.
///
/// A rest area exists wherever the feature's corner radius is smaller
/// than the previous tool's radius; rectangular features report one area
/// per corner.
pub fn detect_rest_areas(feature: &Feature, previous_tool_diameters: &[f64]) -> Vec<RestArea> {
    let Some(min_previous) = previous_tool_diameters
        .iter()
        .copied()
        .filter(|d| *d > 0.0)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    else {
        return Vec::new();
    };

    let previous_radius = min_previous / 2.0;
    let corner_radius = feature.corner_radius.unwrap_or(0.0);
    if corner_radius >= previous_radius {
        return Vec::new();
    }
    let remaining_stock = previous_radius - corner_radius;

    let (Some(width), Some(length)) = (feature.width, feature.length) else {
        return Vec::new();
    };

    let inset = previous_radius;
    let corners = [
        (-width / 2.0 + inset, -length / 2.0 + inset),
        (width / 2.0 - inset, -length / 2.0 + inset),
        (-width / 2.0 + inset, length / 2.0 - inset),
        (width / 2.0 - inset, length / 2.0 - inset),
    ];

    corners
        .iter()
        .enumerate()
        .map(|(i, &offset)| RestArea {
            area_id: i as u32,
            previous_tool_diameter_mm: min_previous,
            remaining_stock_mm: remaining_stock,
            offset_mm: offset,
            size_mm: (previous_radius * 2.0, previous_radius * 2.0),
        })
        .collect()
}

/// Default clearing strategy by feature kind: trochoidal for deep slots
/// and grooves, adaptive clearing for pockets and bosses, raster for
/// open surfaces.
pub fn recommend_strategy(feature: &Feature) -> ToolpathStrategy {
    match feature.feature_type.category() {
        FeatureCategory::Grooves => ToolpathStrategy::Trochoidal,
        FeatureCategory::Pockets => {
            let deep_slot = match (feature.depth, feature.width.or(feature.diameter)) {
                (Some(depth), Some(width)) if width > 0.0 => depth > width * 2.0,
                _ => false,
            };
            if deep_slot {
                ToolpathStrategy::Trochoidal
            } else {
                ToolpathStrategy::Adaptive
            }
        }
        FeatureCategory::Protrusions => ToolpathStrategy::Adaptive,
        FeatureCategory::Surfaces => ToolpathStrategy::Raster,
        FeatureCategory::Holes | FeatureCategory::Edges => ToolpathStrategy::SpiralIn,
    }
}
