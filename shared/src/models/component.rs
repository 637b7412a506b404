//! Component Model
//!
//! Hardware parts tracked in the catalog. Every part belongs to exactly one
//! [`ComponentCategory`]; anything that points at a part from elsewhere
//! (stock movements, discounts, server composition) does so through a
//! [`ComponentRef`], never a bare id or a loose string key.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::component_specs::ComponentSpecs;
use super::discount::PriceQuote;

/// Closed set of hardware categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum ComponentCategory {
    Ram,
    Processor,
    Motherboard,
    Storage,
    PowerSupply,
    Chassis,
    Cooling,
    NetworkCard,
    GraphicsCard,
    ExpansionCard,
    FiberCard,
    Cable,
    Battery,
}

impl ComponentCategory {
    pub const ALL: [ComponentCategory; 13] = [
        Self::Ram,
        Self::Processor,
        Self::Motherboard,
        Self::Storage,
        Self::PowerSupply,
        Self::Chassis,
        Self::Cooling,
        Self::NetworkCard,
        Self::GraphicsCard,
        Self::ExpansionCard,
        Self::FiberCard,
        Self::Cable,
        Self::Battery,
    ];

    /// Wire key, identical to the serde representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ram => "ram",
            Self::Processor => "processor",
            Self::Motherboard => "motherboard",
            Self::Storage => "storage",
            Self::PowerSupply => "power_supply",
            Self::Chassis => "chassis",
            Self::Cooling => "cooling",
            Self::NetworkCard => "network_card",
            Self::GraphicsCard => "graphics_card",
            Self::ExpansionCard => "expansion_card",
            Self::FiberCard => "fiber_card",
            Self::Cable => "cable",
            Self::Battery => "battery",
        }
    }

    /// Type identifier forms use to pick the right spec editor
    pub const fn model_type(&self) -> &'static str {
        match self {
            Self::Ram => "Ram",
            Self::Processor => "Processor",
            Self::Motherboard => "Motherboard",
            Self::Storage => "Storage",
            Self::PowerSupply => "PowerSupply",
            Self::Chassis => "Chassis",
            Self::Cooling => "Cooling",
            Self::NetworkCard => "NetworkCard",
            Self::GraphicsCard => "GraphicsCard",
            Self::ExpansionCard => "ExpansionCard",
            Self::FiberCard => "FiberCard",
            Self::Cable => "Cable",
            Self::Battery => "Battery",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ram => "RAM",
            Self::Processor => "Processor",
            Self::Motherboard => "Motherboard",
            Self::Storage => "Storage",
            Self::PowerSupply => "Power Supply",
            Self::Chassis => "Chassis",
            Self::Cooling => "Cooling",
            Self::NetworkCard => "Network Card",
            Self::GraphicsCard => "Graphics Card",
            Self::ExpansionCard => "Expansion Card",
            Self::FiberCard => "Fiber Card",
            Self::Cable => "Cable",
            Self::Battery => "Battery",
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown component category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for ComponentCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Entry of the category lookup table served to forms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComponentType {
    pub key: ComponentCategory,
    pub model: String,
    pub label: String,
}

impl From<ComponentCategory> for ComponentType {
    fn from(category: ComponentCategory) -> Self {
        Self {
            key: category,
            model: category.model_type().to_string(),
            label: category.label().to_string(),
        }
    }
}

/// Tagged reference to a component: category + id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentRef {
    pub category: ComponentCategory,
    pub id: i64,
}

impl ComponentRef {
    pub fn new(category: ComponentCategory, id: i64) -> Self {
        Self { category, id }
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.id)
    }
}

/// Set-valued selection of components, grouped by category.
///
/// Serialized as `{"ram": [1, 2], "processor": [7]}`. Categories with no
/// selected ids are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentSelection(BTreeMap<ComponentCategory, BTreeSet<i64>>);

impl ComponentSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the component was already selected
    pub fn insert(&mut self, component: ComponentRef) -> bool {
        self.0.entry(component.category).or_default().insert(component.id)
    }

    pub fn remove(&mut self, component: &ComponentRef) -> bool {
        let Some(ids) = self.0.get_mut(&component.category) else {
            return false;
        };
        let removed = ids.remove(&component.id);
        if ids.is_empty() {
            self.0.remove(&component.category);
        }
        removed
    }

    pub fn contains(&self, component: &ComponentRef) -> bool {
        self.0
            .get(&component.category)
            .is_some_and(|ids| ids.contains(&component.id))
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }

    pub fn len(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }

    /// Selected ids for one category
    pub fn ids(&self, category: ComponentCategory) -> impl Iterator<Item = i64> + '_ {
        self.0.get(&category).into_iter().flatten().copied()
    }

    /// Every selected component, ordered by category then id
    pub fn refs(&self) -> impl Iterator<Item = ComponentRef> + '_ {
        self.0
            .iter()
            .flat_map(|(category, ids)| ids.iter().map(|id| ComponentRef::new(*category, *id)))
    }
}

impl FromIterator<ComponentRef> for ComponentSelection {
    fn from_iter<I: IntoIterator<Item = ComponentRef>>(iter: I) -> Self {
        let mut selection = Self::new();
        for component in iter {
            selection.insert(component);
        }
        selection
    }
}

/// Component entity (硬件组件)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Component {
    pub id: i64,
    pub category: ComponentCategory,
    pub name: String,
    pub brand_id: i64,
    pub model: Option<String>,
    /// Catalog price (original price before discounts)
    pub price: f64,
    /// Uploaded image file name
    pub image: Option<String>,
    pub description: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub specs: ComponentSpecs,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Component {
    pub fn reference(&self) -> ComponentRef {
        ComponentRef::new(self.category, self.id)
    }
}

/// Component with its price computed for today
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDetail {
    #[serde(flatten)]
    pub component: Component,
    /// Ids of the servers built with this component
    #[serde(default)]
    pub servers: Vec<i64>,
    pub pricing: PriceQuote,
}

/// Create component payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ComponentCreate {
    pub category: ComponentCategory,
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "brand is required"))]
    pub brand_id: i64,
    #[validate(length(max = 200))]
    pub model: Option<String>,
    #[validate(range(
        min = 0.0,
        max = 1_000_000_000.0,
        message = "price must be between 0 and 1000000000"
    ))]
    pub price: f64,
    pub image: Option<String>,
    pub description: Option<String>,
    /// Defaults to empty specs of `category`
    pub specs: Option<ComponentSpecs>,
}

/// Update component payload (category is fixed after creation)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ComponentUpdate {
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "brand is required"))]
    pub brand_id: Option<i64>,
    #[validate(length(max = 200))]
    pub model: Option<String>,
    #[validate(range(
        min = 0.0,
        max = 1_000_000_000.0,
        message = "price must be between 0 and 1000000000"
    ))]
    pub price: Option<f64>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub specs: Option<ComponentSpecs>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_key_matches_serde() {
        for category in ComponentCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            assert_eq!(category.as_str().parse::<ComponentCategory>(), Ok(category));
        }
    }

    #[test]
    fn test_unknown_category() {
        assert_eq!(
            "gpu".parse::<ComponentCategory>(),
            Err(UnknownCategory("gpu".to_string()))
        );
    }

    #[test]
    fn test_component_type_lookup_entry() {
        let entry = ComponentType::from(ComponentCategory::PowerSupply);
        assert_eq!(entry.model, "PowerSupply");
        assert_eq!(entry.label, "Power Supply");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["key"], "power_supply");
    }

    #[test]
    fn test_selection_wire_format() {
        let json = r#"{"ram": [2, 1, 2], "processor": [7]}"#;
        let selection: ComponentSelection = serde_json::from_str(json).unwrap();

        assert_eq!(selection.len(), 3);
        assert!(selection.contains(&ComponentRef::new(ComponentCategory::Ram, 1)));
        assert!(!selection.contains(&ComponentRef::new(ComponentCategory::Processor, 1)));
        assert_eq!(selection.ids(ComponentCategory::Ram).collect::<Vec<_>>(), vec![1, 2]);

        let back = serde_json::to_value(&selection).unwrap();
        assert_eq!(back, serde_json::json!({"ram": [1, 2], "processor": [7]}));
    }

    #[test]
    fn test_selection_toggle() {
        let ram = ComponentRef::new(ComponentCategory::Ram, 4);
        let mut selection = ComponentSelection::new();

        assert!(selection.insert(ram));
        assert!(!selection.insert(ram));
        assert!(selection.remove(&ram));
        assert!(!selection.remove(&ram));
        assert!(selection.is_empty());
        // Emptied categories do not linger on the wire
        assert_eq!(serde_json::to_string(&selection).unwrap(), "{}");
    }

    #[test]
    fn test_selection_refs_ordered() {
        let selection: ComponentSelection = [
            ComponentRef::new(ComponentCategory::Cable, 9),
            ComponentRef::new(ComponentCategory::Ram, 3),
            ComponentRef::new(ComponentCategory::Ram, 1),
        ]
        .into_iter()
        .collect();

        let refs: Vec<_> = selection.refs().collect();
        assert_eq!(
            refs,
            vec![
                ComponentRef::new(ComponentCategory::Ram, 1),
                ComponentRef::new(ComponentCategory::Ram, 3),
                ComponentRef::new(ComponentCategory::Cable, 9),
            ]
        );
    }

    #[test]
    fn test_create_validation() {
        let payload = ComponentCreate {
            category: ComponentCategory::Ram,
            name: String::new(),
            brand_id: 0,
            model: None,
            price: -5.0,
            image: None,
            description: None,
            specs: None,
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("brand_id"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn test_price_upper_bound() {
        let update = |price: f64| ComponentUpdate {
            price: Some(price),
            ..Default::default()
        };
        assert!(update(crate::models::MAX_AMOUNT).validate().is_ok());
        assert!(update(1e29).validate().is_err());
        assert!(update(crate::models::MAX_AMOUNT + 0.01).validate().is_err());
    }
}
