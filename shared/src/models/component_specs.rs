//! Category-specific component attributes
//!
//! Stored as a JSON column next to the component row. The `category` tag on
//! the wire must agree with the owning component's category.

use serde::{Deserialize, Serialize};

use super::component::ComponentCategory;
use crate::error::{AppError, ErrorCode};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RamSpecs {
    pub capacity_gb: Option<u32>,
    pub speed_mhz: Option<u32>,
    /// DDR4, DDR5 ...
    pub memory_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorSpecs {
    pub cores: Option<u32>,
    pub threads: Option<u32>,
    pub base_clock_ghz: Option<f64>,
    pub socket: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotherboardSpecs {
    pub socket: Option<String>,
    pub form_factor: Option<String>,
    pub ram_slots: Option<u32>,
    pub max_ram_gb: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSpecs {
    pub capacity_gb: Option<u32>,
    /// HDD, SSD, NVMe ...
    pub storage_type: Option<String>,
    pub interface: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerSupplySpecs {
    pub wattage: Option<u32>,
    pub efficiency_rating: Option<String>,
    pub is_redundant: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChassisSpecs {
    pub form_factor: Option<String>,
    pub rack_units: Option<u32>,
    pub drive_bays: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoolingSpecs {
    pub cooling_type: Option<String>,
    pub max_tdp_w: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkCardSpecs {
    pub ports: Option<u32>,
    pub speed_gbps: Option<f64>,
    pub interface: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsCardSpecs {
    pub memory_gb: Option<u32>,
    pub interface: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionCardSpecs {
    pub card_type: Option<String>,
    pub interface: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiberCardSpecs {
    pub ports: Option<u32>,
    pub speed_gbps: Option<f64>,
    pub connector: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CableSpecs {
    pub cable_type: Option<String>,
    pub length_m: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatterySpecs {
    pub capacity_mah: Option<u32>,
    pub voltage: Option<f64>,
}

/// Typed specs, tagged by category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ComponentSpecs {
    Ram(RamSpecs),
    Processor(ProcessorSpecs),
    Motherboard(MotherboardSpecs),
    Storage(StorageSpecs),
    PowerSupply(PowerSupplySpecs),
    Chassis(ChassisSpecs),
    Cooling(CoolingSpecs),
    NetworkCard(NetworkCardSpecs),
    GraphicsCard(GraphicsCardSpecs),
    ExpansionCard(ExpansionCardSpecs),
    FiberCard(FiberCardSpecs),
    Cable(CableSpecs),
    Battery(BatterySpecs),
}

impl ComponentSpecs {
    /// Specs with every attribute unset
    pub fn empty(category: ComponentCategory) -> Self {
        match category {
            ComponentCategory::Ram => Self::Ram(Default::default()),
            ComponentCategory::Processor => Self::Processor(Default::default()),
            ComponentCategory::Motherboard => Self::Motherboard(Default::default()),
            ComponentCategory::Storage => Self::Storage(Default::default()),
            ComponentCategory::PowerSupply => Self::PowerSupply(Default::default()),
            ComponentCategory::Chassis => Self::Chassis(Default::default()),
            ComponentCategory::Cooling => Self::Cooling(Default::default()),
            ComponentCategory::NetworkCard => Self::NetworkCard(Default::default()),
            ComponentCategory::GraphicsCard => Self::GraphicsCard(Default::default()),
            ComponentCategory::ExpansionCard => Self::ExpansionCard(Default::default()),
            ComponentCategory::FiberCard => Self::FiberCard(Default::default()),
            ComponentCategory::Cable => Self::Cable(Default::default()),
            ComponentCategory::Battery => Self::Battery(Default::default()),
        }
    }

    pub fn category(&self) -> ComponentCategory {
        match self {
            Self::Ram(_) => ComponentCategory::Ram,
            Self::Processor(_) => ComponentCategory::Processor,
            Self::Motherboard(_) => ComponentCategory::Motherboard,
            Self::Storage(_) => ComponentCategory::Storage,
            Self::PowerSupply(_) => ComponentCategory::PowerSupply,
            Self::Chassis(_) => ComponentCategory::Chassis,
            Self::Cooling(_) => ComponentCategory::Cooling,
            Self::NetworkCard(_) => ComponentCategory::NetworkCard,
            Self::GraphicsCard(_) => ComponentCategory::GraphicsCard,
            Self::ExpansionCard(_) => ComponentCategory::ExpansionCard,
            Self::FiberCard(_) => ComponentCategory::FiberCard,
            Self::Cable(_) => ComponentCategory::Cable,
            Self::Battery(_) => ComponentCategory::Battery,
        }
    }

    /// Fractional attributes; integer ones are unsigned by construction
    fn decimal_fields(&self) -> Vec<(&'static str, Option<f64>)> {
        match self {
            Self::Processor(s) => vec![("base_clock_ghz", s.base_clock_ghz)],
            Self::NetworkCard(s) => vec![("speed_gbps", s.speed_gbps)],
            Self::FiberCard(s) => vec![("speed_gbps", s.speed_gbps)],
            Self::Cable(s) => vec![("length_m", s.length_m)],
            Self::Battery(s) => vec![("voltage", s.voltage)],
            _ => Vec::new(),
        }
    }

    /// Check the specs belong to `category` and hold no negative numbers
    pub fn validate_for(&self, category: ComponentCategory) -> Result<(), AppError> {
        if self.category() != category {
            return Err(AppError::invalid_field(
                ErrorCode::ComponentCategoryMismatch,
                "specs",
                format!(
                    "specs for '{}' cannot be attached to a '{}' component",
                    self.category(),
                    category
                ),
            ));
        }

        let mut err: Option<AppError> = None;
        for (field, value) in self.decimal_fields() {
            if let Some(v) = value
                && !(v.is_finite() && v >= 0.0)
            {
                let e = err.unwrap_or_else(|| {
                    AppError::new(ErrorCode::ComponentSpecsInvalid)
                });
                err = Some(e.with_field_error(
                    format!("specs.{field}"),
                    format!("{field} must not be negative"),
                ));
            }
        }
        match err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_matches_category() {
        for category in ComponentCategory::ALL {
            assert_eq!(ComponentSpecs::empty(category).category(), category);
        }
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{"category": "processor", "cores": 16, "socket": "SP5"}"#;
        let specs: ComponentSpecs = serde_json::from_str(json).unwrap();
        assert_eq!(
            specs,
            ComponentSpecs::Processor(ProcessorSpecs {
                cores: Some(16),
                socket: Some("SP5".into()),
                ..Default::default()
            })
        );

        let value = serde_json::to_value(&specs).unwrap();
        assert_eq!(value["category"], "processor");
        assert_eq!(value["cores"], 16);
    }

    #[test]
    fn test_category_mismatch() {
        let specs = ComponentSpecs::empty(ComponentCategory::Ram);
        let err = specs.validate_for(ComponentCategory::Storage).unwrap_err();
        assert_eq!(err.code, ErrorCode::ComponentCategoryMismatch);
        assert!(err.details.unwrap().contains_key("specs"));
    }

    #[test]
    fn test_negative_decimal_rejected() {
        let specs = ComponentSpecs::Cable(CableSpecs {
            cable_type: Some("DAC".into()),
            length_m: Some(-1.5),
        });
        let err = specs.validate_for(ComponentCategory::Cable).unwrap_err();
        assert_eq!(err.code, ErrorCode::ComponentSpecsInvalid);
        assert!(err.details.unwrap().contains_key("specs.length_m"));
    }

    #[test]
    fn test_negative_integer_rejected_by_serde() {
        let json = r#"{"category": "ram", "capacity_gb": -8}"#;
        assert!(serde_json::from_str::<ComponentSpecs>(json).is_err());
    }

    #[test]
    fn test_valid_specs() {
        let specs = ComponentSpecs::Battery(BatterySpecs {
            capacity_mah: Some(5000),
            voltage: Some(3.7),
        });
        assert!(specs.validate_for(ComponentCategory::Battery).is_ok());
    }
}
