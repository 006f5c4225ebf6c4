use thiserror::Error;

use machplan_catalog::CatalogError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CostError {
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error("invalid machining hours: {0}")]
    InvalidMachiningHours(f64),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub type CostResult<T> = Result<T, CostError>;
