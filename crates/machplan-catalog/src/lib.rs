//! # MachPlan Catalog
//!
//! Read-only material, cutting tool and machine catalogs. Catalogs are
//! explicitly constructed and passed into the engines that query them, so
//! every component can be tested against synthetic data; there are no
//! process-wide singletons here.

pub mod error;
pub mod machines;
pub mod materials;
pub mod tools;

pub use error::{CatalogError, CatalogResult};
pub use machines::{LaborRates, MachineCatalog, MachineClass, MachineRate};
pub use materials::{
    Coolant, CuttingParameters, Material, MaterialCatalog, MaterialClass, MaterialId,
    ToolSubstrate,
};
pub use tools::{Tool, ToolCatalog, ToolType};
