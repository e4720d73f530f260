//! Input and output placeholders.
//!
//! A placeholder stands for one resolved model data item. Within a control
//! group there is at most one placeholder per `(feature, parameter)` pair.

use serde::{Deserialize, Serialize};

use crate::quantity::{ElementSet, QuantityType};

/// A model value that can be read (inputs) or written (outputs).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataItem {
    /// Name of the model feature (structure, observation point, ...).
    pub feature: String,
    /// Parameter name as exposed by the model.
    pub parameter_name: String,
    pub quantity: QuantityType,
    pub element_set: ElementSet,
}

impl DataItem {
    pub fn new(
        feature: impl Into<String>,
        parameter_name: impl Into<String>,
        quantity: QuantityType,
        element_set: ElementSet,
    ) -> Self {
        Self {
            feature: feature.into(),
            parameter_name: parameter_name.into(),
            quantity,
            element_set,
        }
    }

    /// Deduplication key of placeholders linked to this item.
    pub fn key(&self) -> (&str, &str) {
        (&self.feature, &self.parameter_name)
    }

    /// Placeholder name, `<feature>_<parameter>`.
    pub fn placeholder_name(&self) -> String {
        format!("{}_{}", self.feature, self.parameter_name)
    }
}

/// Measured value feeding rules and conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Input {
    pub name: String,
    pub data_item: DataItem,
}

impl Input {
    pub fn new(data_item: DataItem) -> Self {
        Self {
            name: data_item.placeholder_name(),
            data_item,
        }
    }

    pub fn parameter_name(&self) -> &str {
        &self.data_item.parameter_name
    }
}

/// Controllable value a rule writes its setpoint to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    pub name: String,
    pub data_item: DataItem,
}

impl Output {
    pub fn new(data_item: DataItem) -> Self {
        Self {
            name: data_item.placeholder_name(),
            data_item,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_named_after_feature_and_parameter() {
        let item = DataItem::new(
            "weir1",
            "Crest level",
            QuantityType::CrestLevel,
            ElementSet::Structures,
        );
        let output = Output::new(item.clone());
        assert_eq!(output.name, "weir1_Crest level");
        assert_eq!(item.key(), ("weir1", "Crest level"));
    }
}
