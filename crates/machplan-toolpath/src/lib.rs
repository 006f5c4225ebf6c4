//! Toolpath strategy optimization for MachPlan.
//!
//! Engagement-angle and chip-thinning analysis, trochoidal and high-speed
//! parameter generation, adaptive depth scheduling, rest machining
//! detection and the climb/conventional decision. All functions are pure;
//! invalid geometry is rejected with a [`ToolpathError`] rather than
//! clamped silently.

pub mod engagement;
pub mod error;
pub mod strategy;

pub use engagement::{adaptive_stepdown, analyze_engagement, ToolEngagement};
pub use error::{ToolpathError, ToolpathResult};
pub use strategy::{
    detect_rest_areas, hsm_parameters, recommend_milling_type, recommend_strategy,
    trochoidal_parameters, HsmParameters, MillingType, OperationPhase, RestArea, ToolRigidity,
    ToolpathStrategy, TrochoidalParameters,
};
