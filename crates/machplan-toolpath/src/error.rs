use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolpathError {
    #[error("invalid tool diameter: {0}mm")]
    InvalidToolDiameter(f64),

    #[error("invalid stepover {stepover}mm for tool diameter {tool_diameter}mm")]
    InvalidStepover { stepover: f64, tool_diameter: f64 },

    #[error("invalid cut depth: {0}mm")]
    InvalidDepth(f64),

    #[error("invalid slot width: {0}mm")]
    InvalidSlotWidth(f64),
}

pub type ToolpathResult<T> = Result<T, ToolpathError>;
