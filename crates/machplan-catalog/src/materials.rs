//! Workpiece material catalog.
//!
//! Provides:
//! - Material classes and physical/machining properties
//! - Cutting parameter recommendations per (material, tool material)
//! - Material cost estimation from stock volume
//!
//! The catalog is an explicitly constructed value passed into the engines
//! that need it; nothing here is a process-wide singleton.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CatalogError, CatalogResult};

/// Broad material families, used for HSM parameter selection and coolant
/// recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialClass {
    Aluminum,
    MildSteel,
    AlloySteel,
    StainlessSteel,
    ToolSteel,
    Titanium,
    NickelAlloy,
    Brass,
    Copper,
    Plastic,
    Composite,
}

impl std::fmt::Display for MaterialClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aluminum => write!(f, "Aluminum"),
            Self::MildSteel => write!(f, "Mild Steel"),
            Self::AlloySteel => write!(f, "Alloy Steel"),
            Self::StainlessSteel => write!(f, "Stainless Steel"),
            Self::ToolSteel => write!(f, "Tool Steel"),
            Self::Titanium => write!(f, "Titanium"),
            Self::NickelAlloy => write!(f, "Nickel Alloy"),
            Self::Brass => write!(f, "Brass"),
            Self::Copper => write!(f, "Copper"),
            Self::Plastic => write!(f, "Plastic"),
            Self::Composite => write!(f, "Composite"),
        }
    }
}

/// Cutting tool substrate material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolSubstrate {
    Hss,
    Carbide,
    CoatedCarbide,
}

impl std::fmt::Display for ToolSubstrate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hss => write!(f, "HSS"),
            Self::Carbide => write!(f, "Carbide"),
            Self::CoatedCarbide => write!(f, "Coated Carbide"),
        }
    }
}

/// Coolant recommendation for a cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Coolant {
    None,
    Air,
    Mist,
    Flood,
}

impl std::fmt::Display for Coolant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Air => write!(f, "Air"),
            Self::Mist => write!(f, "Mist"),
            Self::Flood => write!(f, "Flood"),
        }
    }
}

/// Recommended cutting parameters for one material/tool-substrate pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuttingParameters {
    /// Surface speed range, m/min.
    pub cutting_speed_m_min: (f64, f64),
    /// Feed per tooth range, mm.
    pub feed_per_tooth_mm: (f64, f64),
    /// Max depth of cut as a multiple of tool diameter.
    pub doc_factor: f64,
    /// Stepover as a fraction of tool diameter.
    pub stepover_factor: f64,
    pub coolant: Coolant,
}

impl CuttingParameters {
    /// Midpoint of the surface speed range.
    pub fn mid_cutting_speed(&self) -> f64 {
        (self.cutting_speed_m_min.0 + self.cutting_speed_m_min.1) / 2.0
    }

    /// Midpoint of the feed-per-tooth range.
    pub fn mid_feed_per_tooth(&self) -> f64 {
        (self.feed_per_tooth_mm.0 + self.feed_per_tooth_mm.1) / 2.0
    }
}

/// Material identifier, e.g. `"aluminum_6061"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub String);

impl std::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MaterialId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Workpiece material definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    pub class: MaterialClass,
    /// Density, g/cm³.
    pub density_g_cm3: f64,
    /// Brinell hardness.
    pub hardness_hb: f64,
    /// True for heat-treated materials machined in the hardened state.
    pub hardened: bool,
    /// Stock price, USD/kg.
    pub price_per_kg: f64,
    /// 1-10, higher is easier to machine.
    pub machinability_rating: u8,
}

/// Read-only material catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialCatalog {
    materials: HashMap<MaterialId, Material>,
    cutting: HashMap<(MaterialId, ToolSubstrate), CuttingParameters>,
}

impl MaterialCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.id.clone(), material);
    }

    pub fn add_cutting_parameters(
        &mut self,
        material: MaterialId,
        substrate: ToolSubstrate,
        params: CuttingParameters,
    ) {
        self.cutting.insert((material, substrate), params);
    }

    pub fn get(&self, id: &MaterialId) -> CatalogResult<&Material> {
        self.materials
            .get(id)
            .ok_or_else(|| CatalogError::UnknownMaterial(id.to_string()))
    }

    pub fn cutting_parameters(
        &self,
        id: &MaterialId,
        substrate: ToolSubstrate,
    ) -> CatalogResult<&CuttingParameters> {
        self.cutting
            .get(&(id.clone(), substrate))
            .ok_or_else(|| CatalogError::NoCuttingParameters {
                material: id.to_string(),
                tool_material: substrate.to_string(),
            })
    }

    /// Material cost for a stock volume: volume × density / 1000 × price/kg.
    pub fn estimate_material_cost(
        &self,
        id: &MaterialId,
        volume_cm3: f64,
    ) -> CatalogResult<f64> {
        let material = self.get(id)?;
        let mass_kg = volume_cm3 * material.density_g_cm3 / 1000.0;
        Ok(mass_kg * material.price_per_kg)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Catalog stocked with common shop materials and carbide cutting data.
    pub fn standard() -> Self {
        let mut catalog = Self::new();

        let entries = [
            (
                "aluminum_6061",
                "Aluminum 6061-T6",
                MaterialClass::Aluminum,
                2.70,
                95.0,
                false,
                3.0,
                9,
                (250.0, 600.0),
                (0.05, 0.15),
                1.0,
                0.5,
                Coolant::Mist,
            ),
            (
                "aluminum_7075",
                "Aluminum 7075-T651",
                MaterialClass::Aluminum,
                2.81,
                150.0,
                false,
                8.0,
                7,
                (200.0, 500.0),
                (0.05, 0.12),
                0.8,
                0.5,
                Coolant::Mist,
            ),
            (
                "steel_1018",
                "Mild Steel 1018",
                MaterialClass::MildSteel,
                7.87,
                126.0,
                false,
                1.5,
                7,
                (100.0, 200.0),
                (0.04, 0.10),
                0.5,
                0.45,
                Coolant::Flood,
            ),
            (
                "steel_4140",
                "Alloy Steel 4140",
                MaterialClass::AlloySteel,
                7.85,
                197.0,
                false,
                3.5,
                6,
                (80.0, 160.0),
                (0.03, 0.08),
                0.4,
                0.4,
                Coolant::Flood,
            ),
            (
                "stainless_304",
                "Stainless Steel 304",
                MaterialClass::StainlessSteel,
                8.00,
                201.0,
                false,
                4.0,
                5,
                (60.0, 120.0),
                (0.03, 0.07),
                0.35,
                0.35,
                Coolant::Flood,
            ),
            (
                "tool_steel_d2",
                "Tool Steel D2 (hardened)",
                MaterialClass::ToolSteel,
                7.70,
                620.0,
                true,
                20.0,
                2,
                (30.0, 60.0),
                (0.02, 0.05),
                0.2,
                0.25,
                Coolant::Flood,
            ),
            (
                "titanium_6al4v",
                "Titanium 6Al-4V",
                MaterialClass::Titanium,
                4.43,
                334.0,
                false,
                35.0,
                3,
                (30.0, 60.0),
                (0.03, 0.08),
                0.3,
                0.3,
                Coolant::Flood,
            ),
            (
                "brass_360",
                "Brass 360",
                MaterialClass::Brass,
                8.50,
                120.0,
                false,
                6.0,
                10,
                (200.0, 400.0),
                (0.05, 0.15),
                1.0,
                0.5,
                Coolant::Air,
            ),
            (
                "delrin",
                "Delrin (Acetal)",
                MaterialClass::Plastic,
                1.41,
                20.0,
                false,
                9.0,
                10,
                (300.0, 800.0),
                (0.08, 0.25),
                1.5,
                0.6,
                Coolant::Air,
            ),
        ];

        for (
            id,
            name,
            class,
            density,
            hardness,
            hardened,
            price,
            rating,
            speed,
            feed,
            doc_factor,
            stepover_factor,
            coolant,
        ) in entries
        {
            let material_id = MaterialId(id.to_string());
            catalog.add_material(Material {
                id: material_id.clone(),
                name: name.to_string(),
                class,
                density_g_cm3: density,
                hardness_hb: hardness,
                hardened,
                price_per_kg: price,
                machinability_rating: rating,
            });
            catalog.add_cutting_parameters(
                material_id.clone(),
                ToolSubstrate::Carbide,
                CuttingParameters {
                    cutting_speed_m_min: speed,
                    feed_per_tooth_mm: feed,
                    doc_factor,
                    stepover_factor,
                    coolant,
                },
            );
            // Coated tooling runs about 20% over plain carbide.
            catalog.add_cutting_parameters(
                material_id.clone(),
                ToolSubstrate::CoatedCarbide,
                CuttingParameters {
                    cutting_speed_m_min: (speed.0 * 1.2, speed.1 * 1.2),
                    feed_per_tooth_mm: feed,
                    doc_factor,
                    stepover_factor,
                    coolant,
                },
            );
            // HSS runs roughly a third of carbide surface speed.
            catalog.add_cutting_parameters(
                material_id,
                ToolSubstrate::Hss,
                CuttingParameters {
                    cutting_speed_m_min: (speed.0 / 3.0, speed.1 / 3.0),
                    feed_per_tooth_mm: feed,
                    doc_factor: doc_factor * 0.8,
                    stepover_factor,
                    coolant,
                },
            );
        }

        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_cost_aluminum() {
        // 500 cm³ of 6061 at 2.70 g/cm³ and $3/kg is $4.05.
        let catalog = MaterialCatalog::standard();
        let cost = catalog
            .estimate_material_cost(&"aluminum_6061".into(), 500.0)
            .unwrap();
        assert!((cost - 4.05).abs() < 1e-9, "got {cost}");
    }

    #[test]
    fn test_unknown_material_is_an_error() {
        let catalog = MaterialCatalog::standard();
        let err = catalog.get(&"unobtanium".into()).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownMaterial(_)));
    }

    #[test]
    fn test_cutting_parameters_lookup() {
        let catalog = MaterialCatalog::standard();
        let params = catalog
            .cutting_parameters(&"steel_1018".into(), ToolSubstrate::Carbide)
            .unwrap();
        assert!(params.cutting_speed_m_min.0 > 0.0);
        assert!(params.mid_cutting_speed() > params.cutting_speed_m_min.0);
    }

    #[test]
    fn test_hardened_material_flag() {
        let catalog = MaterialCatalog::standard();
        assert!(catalog.get(&"tool_steel_d2".into()).unwrap().hardened);
        assert!(!catalog.get(&"aluminum_6061".into()).unwrap().hardened);
    }
}
