//! Cutting tool catalog.
//!
//! Tool lookup by type/diameter, best-tool mapping for a feature type, and
//! per-operation tool cost from expected tool life.

use serde::{Deserialize, Serialize};
use tracing::debug;

use machplan_core::{FeatureCategory, FeatureType};

use crate::error::{CatalogError, CatalogResult};
use crate::materials::ToolSubstrate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolType {
    Drill,
    EndMill,
    SlotDrill,
    BallMill,
    FaceMill,
    ChamferMill,
    ThreadMill,
    TSlotCutter,
    DovetailCutter,
}

impl std::fmt::Display for ToolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Drill => write!(f, "drill"),
            Self::EndMill => write!(f, "end mill"),
            Self::SlotDrill => write!(f, "slot drill"),
            Self::BallMill => write!(f, "ball mill"),
            Self::FaceMill => write!(f, "face mill"),
            Self::ChamferMill => write!(f, "chamfer mill"),
            Self::ThreadMill => write!(f, "thread mill"),
            Self::TSlotCutter => write!(f, "T-slot cutter"),
            Self::DovetailCutter => write!(f, "dovetail cutter"),
        }
    }
}

/// A stocked cutting tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    pub tool_type: ToolType,
    pub diameter_mm: f64,
    /// Usable flute length, mm.
    pub flute_length_mm: f64,
    pub flutes: u8,
    pub substrate: ToolSubstrate,
    pub max_rpm: u32,
    pub price_usd: f64,
    /// Expected cutting life, minutes.
    pub tool_life_minutes: f64,
}

/// Read-only tool catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCatalog {
    tools: Vec<Tool>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tool(&mut self, tool: Tool) {
        self.tools.push(tool);
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Find a tool of the given type within `tolerance` mm of the requested
    /// diameter. Of the candidates, the closest diameter wins; ties go to
    /// the longer flute length.
    pub fn find_tool(
        &self,
        tool_type: ToolType,
        diameter: f64,
        tolerance: f64,
    ) -> CatalogResult<&Tool> {
        let tool = self
            .tools
            .iter()
            .filter(|t| t.tool_type == tool_type)
            .filter(|t| (t.diameter_mm - diameter).abs() <= tolerance)
            .min_by(|a, b| {
                let da = (a.diameter_mm - diameter).abs();
                let db = (b.diameter_mm - diameter).abs();
                da.partial_cmp(&db)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(
                        b.flute_length_mm
                            .partial_cmp(&a.flute_length_mm)
                            .unwrap_or(std::cmp::Ordering::Equal),
                    )
            })
            .ok_or_else(|| CatalogError::NoToolFound {
                tool_type: tool_type.to_string(),
                diameter,
                tolerance,
            })?;
        debug!(tool = %tool.id, requested = diameter, "tool matched");
        Ok(tool)
    }

    /// Tool type appropriate for cutting a feature of the given type.
    pub fn tool_type_for_feature(feature_type: FeatureType, depth: f64, diameter: f64) -> ToolType {
        match feature_type {
            FeatureType::ThreadedHole => ToolType::ThreadMill,
            FeatureType::TSlot => ToolType::TSlotCutter,
            FeatureType::DovetailSlot => ToolType::DovetailCutter,
            FeatureType::Chamfer | FeatureType::EdgeBreak => ToolType::ChamferMill,
            FeatureType::CountersinkHole => ToolType::ChamferMill,
            _ => match feature_type.category() {
                FeatureCategory::Holes => ToolType::Drill,
                FeatureCategory::Pockets | FeatureCategory::Grooves => {
                    // Deep narrow cuts need a center-cutting slot drill that
                    // can plunge.
                    if diameter > 0.0 && depth > diameter * 2.0 {
                        ToolType::SlotDrill
                    } else {
                        ToolType::EndMill
                    }
                }
                FeatureCategory::Protrusions => ToolType::EndMill,
                FeatureCategory::Surfaces => match feature_type {
                    FeatureType::PlanarFace => ToolType::FaceMill,
                    _ => ToolType::BallMill,
                },
                FeatureCategory::Edges => ToolType::ChamferMill,
            },
        }
    }

    /// Best stocked tool for a feature: maps the feature type to a tool
    /// type, then matches diameter, preferring a flute length that covers
    /// the cut depth.
    pub fn best_tool_for_feature(
        &self,
        feature_type: FeatureType,
        diameter: f64,
        depth: f64,
    ) -> CatalogResult<&Tool> {
        let tool_type = Self::tool_type_for_feature(feature_type, depth, diameter);
        let tool = self.find_tool(tool_type, diameter, diameter.max(1.0) * 0.5)?;
        if depth > tool.flute_length_mm {
            // Prefer a longer tool of the same type if one is stocked.
            if let Some(longer) = self
                .tools
                .iter()
                .filter(|t| t.tool_type == tool_type && t.flute_length_mm >= depth)
                .min_by(|a, b| {
                    let da = (a.diameter_mm - diameter).abs();
                    let db = (b.diameter_mm - diameter).abs();
                    da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                })
            {
                return Ok(longer);
            }
        }
        Ok(tool)
    }

    /// Tool cost attributed to one operation: price × (minutes / life).
    pub fn cost_per_operation(tool: &Tool, operation_minutes: f64) -> CatalogResult<f64> {
        if tool.tool_life_minutes <= 0.0 {
            return Err(CatalogError::InvalidToolLife {
                tool_id: tool.id.clone(),
                life_minutes: tool.tool_life_minutes,
            });
        }
        Ok(tool.price_usd * (operation_minutes / tool.tool_life_minutes))
    }

    /// Catalog stocked with a typical job-shop carbide set.
    pub fn standard() -> Self {
        let mut catalog = Self::new();

        let drills = [1.0, 2.0, 3.0, 3.3, 4.0, 5.0, 6.0, 6.8, 8.0, 8.5, 10.0, 12.0];
        for d in drills {
            catalog.add_tool(Tool {
                id: format!("drill_{:.1}", d),
                tool_type: ToolType::Drill,
                diameter_mm: d,
                flute_length_mm: d * 6.0,
                flutes: 2,
                substrate: ToolSubstrate::Carbide,
                max_rpm: 18000,
                price_usd: 8.0 + d * 1.5,
                tool_life_minutes: 120.0,
            });
        }

        let end_mills = [2.0, 3.0, 4.0, 6.0, 8.0, 10.0, 12.0, 16.0, 20.0];
        for d in end_mills {
            catalog.add_tool(Tool {
                id: format!("endmill_{:.1}", d),
                tool_type: ToolType::EndMill,
                diameter_mm: d,
                flute_length_mm: d * 3.0,
                flutes: 4,
                substrate: ToolSubstrate::Carbide,
                max_rpm: 24000,
                price_usd: 15.0 + d * 3.0,
                tool_life_minutes: 90.0,
            });
            // Long-reach variant.
            catalog.add_tool(Tool {
                id: format!("endmill_{:.1}_long", d),
                tool_type: ToolType::EndMill,
                diameter_mm: d,
                flute_length_mm: d * 5.0,
                flutes: 4,
                substrate: ToolSubstrate::Carbide,
                max_rpm: 20000,
                price_usd: 22.0 + d * 3.5,
                tool_life_minutes: 75.0,
            });
        }

        for d in [3.0, 6.0, 10.0, 12.0] {
            catalog.add_tool(Tool {
                id: format!("slotdrill_{:.1}", d),
                tool_type: ToolType::SlotDrill,
                diameter_mm: d,
                flute_length_mm: d * 4.0,
                flutes: 2,
                substrate: ToolSubstrate::Carbide,
                max_rpm: 20000,
                price_usd: 18.0 + d * 2.5,
                tool_life_minutes: 80.0,
            });
        }

        for d in [3.0, 6.0, 8.0, 10.0, 12.0] {
            catalog.add_tool(Tool {
                id: format!("ballmill_{:.1}", d),
                tool_type: ToolType::BallMill,
                diameter_mm: d,
                flute_length_mm: d * 3.0,
                flutes: 2,
                substrate: ToolSubstrate::Carbide,
                max_rpm: 24000,
                price_usd: 20.0 + d * 3.0,
                tool_life_minutes: 70.0,
            });
        }

        for d in [40.0, 63.0, 80.0] {
            catalog.add_tool(Tool {
                id: format!("facemill_{:.0}", d),
                tool_type: ToolType::FaceMill,
                diameter_mm: d,
                flute_length_mm: 8.0,
                flutes: 5,
                substrate: ToolSubstrate::CoatedCarbide,
                max_rpm: 8000,
                price_usd: 120.0 + d,
                tool_life_minutes: 240.0,
            });
        }

        for d in [6.0, 10.0, 12.0] {
            catalog.add_tool(Tool {
                id: format!("chamfer_{:.1}", d),
                tool_type: ToolType::ChamferMill,
                diameter_mm: d,
                flute_length_mm: d,
                flutes: 4,
                substrate: ToolSubstrate::Carbide,
                max_rpm: 20000,
                price_usd: 25.0 + d * 2.0,
                tool_life_minutes: 150.0,
            });
        }

        for d in [4.0, 6.0, 8.0] {
            catalog.add_tool(Tool {
                id: format!("threadmill_{:.1}", d),
                tool_type: ToolType::ThreadMill,
                diameter_mm: d,
                flute_length_mm: d * 2.5,
                flutes: 3,
                substrate: ToolSubstrate::Carbide,
                max_rpm: 16000,
                price_usd: 60.0 + d * 4.0,
                tool_life_minutes: 60.0,
            });
        }

        for d in [12.0, 18.0] {
            catalog.add_tool(Tool {
                id: format!("tslot_{:.0}", d),
                tool_type: ToolType::TSlotCutter,
                diameter_mm: d,
                flute_length_mm: d * 0.5,
                flutes: 6,
                substrate: ToolSubstrate::Hss,
                max_rpm: 6000,
                price_usd: 70.0 + d * 2.0,
                tool_life_minutes: 100.0,
            });
        }

        catalog.add_tool(Tool {
            id: "dovetail_16_45".to_string(),
            tool_type: ToolType::DovetailCutter,
            diameter_mm: 16.0,
            flute_length_mm: 8.0,
            flutes: 6,
            substrate: ToolSubstrate::Hss,
            max_rpm: 5000,
            price_usd: 85.0,
            tool_life_minutes: 90.0,
        });

        catalog
    }
}
