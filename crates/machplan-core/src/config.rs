//! Pipeline tuning constants.
//!
//! Every numeric threshold the analysis engines use lives here, so the whole
//! pipeline can be tuned and tested against one source of truth instead of
//! constants scattered per algorithm.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tolerances {
    /// Position matching tolerance for pattern detection, mm.
    pub position_mm: f64,
    /// Maximum distance from the best-fit line for linear pattern members, mm.
    pub line_fit_mm: f64,
    /// Radius tolerance for circular pattern membership, mm.
    pub radius_mm: f64,
    /// Angular regularity tolerance for full circular-pattern confidence, degrees.
    pub angle_deg: f64,

    /// Distance below which two features are adjacent, mm.
    pub proximity_mm: f64,

    /// Wall thickness below which a wall counts as thin, mm.
    pub thin_wall_mm: f64,
    /// Wall thickness flagged as a critical risk, mm.
    pub critical_wall_mm: f64,
    /// Wall thickness below which machining is considered unreliable, mm.
    pub risky_wall_mm: f64,
    /// Minimum acceptable draft angle for mold/die surfaces, degrees.
    pub min_draft_deg: f64,

    /// Membership floor for reporting alternative classifications.
    pub alternative_floor: f64,
    /// Multi-criteria weighted score above which the decision is accept.
    pub accept_threshold: f64,
    /// Multi-criteria weighted score below which the decision is reject.
    pub reject_threshold: f64,

    /// Accessibility score below which a feature is flagged for 4/5-axis work.
    pub low_accessibility: f64,
    /// Brinell hardness above which a workpiece material counts as hard.
    pub hard_material_hb: f64,
    /// Depth/diameter ratio above which a feature counts as deep.
    pub deep_ratio: f64,
    /// Diameter below which a feature counts as small, mm.
    pub small_diameter_mm: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            position_mm: 0.5,
            line_fit_mm: 0.3,
            radius_mm: 0.3,
            angle_deg: 2.0,
            proximity_mm: 5.0,
            thin_wall_mm: 3.0,
            critical_wall_mm: 1.5,
            risky_wall_mm: 1.0,
            min_draft_deg: 1.0,
            alternative_floor: 0.3,
            accept_threshold: 0.6,
            reject_threshold: 0.4,
            low_accessibility: 0.5,
            hard_material_hb: 250.0,
            deep_ratio: 3.0,
            small_diameter_mm: 3.0,
        }
    }
}
