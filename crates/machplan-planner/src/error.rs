use thiserror::Error;

use machplan_catalog::CatalogError;
use machplan_costing::CostError;
use machplan_toolpath::ToolpathError;

#[derive(Error, Debug)]
pub enum PlanError {
    /// The only structurally fatal input condition; everything else
    /// degrades to a warning in the report.
    #[error("cannot plan an empty feature set")]
    EmptyFeatureSet,

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Cost(#[from] CostError),

    #[error(transparent)]
    Toolpath(#[from] ToolpathError),
}

pub type PlanResult<T> = Result<T, PlanError>;
