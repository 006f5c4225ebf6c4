//! Machine and labor rate catalog.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CatalogError, CatalogResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineClass {
    ThreeAxisManual,
    ThreeAxisCnc,
    FourAxisCnc,
    FiveAxisCnc,
}

impl std::fmt::Display for MachineClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ThreeAxisManual => write!(f, "3-Axis Manual Mill"),
            Self::ThreeAxisCnc => write!(f, "3-Axis CNC Mill"),
            Self::FourAxisCnc => write!(f, "4-Axis CNC Mill"),
            Self::FiveAxisCnc => write!(f, "5-Axis CNC Mill"),
        }
    }
}

/// Hourly rate and setup characteristics of one machine class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineRate {
    pub hourly_rate_usd: f64,
    pub base_setup_hours: f64,
    pub tool_change_minutes: f64,
}

/// Shop labor rates, USD/hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaborRates {
    pub machinist_hourly: f64,
    pub programmer_hourly: f64,
    pub setup_hourly: f64,
}

impl Default for LaborRates {
    fn default() -> Self {
        Self {
            machinist_hourly: 65.0,
            programmer_hourly: 85.0,
            setup_hourly: 75.0,
        }
    }
}

/// Read-only machine rate catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MachineCatalog {
    rates: HashMap<MachineClass, MachineRate>,
}

impl MachineCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rate(&mut self, class: MachineClass, rate: MachineRate) {
        self.rates.insert(class, rate);
    }

    pub fn rate(&self, class: MachineClass) -> CatalogResult<&MachineRate> {
        self.rates
            .get(&class)
            .ok_or_else(|| CatalogError::UnknownMachine(class.to_string()))
    }

    pub fn standard() -> Self {
        let mut catalog = Self::new();
        catalog.add_rate(
            MachineClass::ThreeAxisManual,
            MachineRate {
                hourly_rate_usd: 45.0,
                base_setup_hours: 0.5,
                tool_change_minutes: 3.0,
            },
        );
        catalog.add_rate(
            MachineClass::ThreeAxisCnc,
            MachineRate {
                hourly_rate_usd: 75.0,
                base_setup_hours: 1.0,
                tool_change_minutes: 1.5,
            },
        );
        catalog.add_rate(
            MachineClass::FourAxisCnc,
            MachineRate {
                hourly_rate_usd: 125.0,
                base_setup_hours: 1.5,
                tool_change_minutes: 2.0,
            },
        );
        catalog.add_rate(
            MachineClass::FiveAxisCnc,
            MachineRate {
                hourly_rate_usd: 200.0,
                base_setup_hours: 2.0,
                tool_change_minutes: 2.5,
            },
        );
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_rates_present() {
        let catalog = MachineCatalog::standard();
        let rate = catalog.rate(MachineClass::ThreeAxisCnc).unwrap();
        assert_eq!(rate.hourly_rate_usd, 75.0);
        assert_eq!(rate.base_setup_hours, 1.0);
    }

    #[test]
    fn test_missing_class_is_an_error() {
        let catalog = MachineCatalog::new();
        assert!(catalog.rate(MachineClass::FiveAxisCnc).is_err());
    }
}
