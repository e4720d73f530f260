//! Data item lookup.

use rtc_controls::{DataItem, ElementSet, QuantityType};

use crate::schema::CatalogueEntry;

/// Lookup of model data items by location, quantity and element set.
pub trait DataItemResolver {
    /// Whether the model knows a structure (or pump) by this name.
    fn has_structure(&self, name: &str) -> bool;

    /// Readable item feeding rule and condition inputs.
    fn find_input(&self, location: &str, quantity: QuantityType, element_set: ElementSet)
    -> Option<DataItem>;

    /// Controllable item rules write to.
    fn find_output(
        &self,
        location: &str,
        quantity: QuantityType,
        element_set: ElementSet,
    ) -> Option<DataItem>;
}

/// In-memory catalogue; location names match case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct DataItemCatalogue {
    entries: Vec<CatalogueEntry>,
}

impl DataItemCatalogue {
    pub fn new(entries: Vec<CatalogueEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogueEntry] {
        &self.entries
    }

    fn find(
        &self,
        location: &str,
        quantity: QuantityType,
        element_set: ElementSet,
        accept: impl Fn(&CatalogueEntry) -> bool,
    ) -> Option<DataItem> {
        self.entries
            .iter()
            .find(|e| {
                e.quantity == quantity
                    && e.element_set == element_set
                    && e.feature.eq_ignore_ascii_case(location)
                    && accept(e)
            })
            .map(|e| DataItem::new(&e.feature, &e.parameter_name, e.quantity, e.element_set))
    }
}

impl DataItemResolver for DataItemCatalogue {
    fn has_structure(&self, name: &str) -> bool {
        self.entries.iter().any(|e| {
            matches!(e.element_set, ElementSet::Structures | ElementSet::Pumps)
                && e.feature.eq_ignore_ascii_case(name)
        })
    }

    fn find_input(
        &self,
        location: &str,
        quantity: QuantityType,
        element_set: ElementSet,
    ) -> Option<DataItem> {
        self.find(location, quantity, element_set, |e| e.readable)
    }

    fn find_output(
        &self,
        location: &str,
        quantity: QuantityType,
        element_set: ElementSet,
    ) -> Option<DataItem> {
        self.find(location, quantity, element_set, |e| e.controllable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(feature: &str, quantity: QuantityType, set: ElementSet, controllable: bool) -> CatalogueEntry {
        CatalogueEntry {
            feature: feature.to_string(),
            parameter_name: quantity.as_str().to_string(),
            quantity,
            element_set: set,
            readable: true,
            controllable,
        }
    }

    #[test]
    fn lookup_ignores_location_case() {
        let catalogue = DataItemCatalogue::new(vec![
            entry("Weir1", QuantityType::CrestLevel, ElementSet::Structures, true),
            entry("obs1", QuantityType::WaterLevel, ElementSet::Observations, false),
        ]);

        assert!(catalogue.has_structure("WEIR1"));
        assert!(!catalogue.has_structure("obs1"));

        let item = catalogue
            .find_output("weir1", QuantityType::CrestLevel, ElementSet::Structures)
            .unwrap();
        assert_eq!(item.feature, "Weir1");

        assert!(catalogue
            .find_input("OBS1", QuantityType::WaterLevel, ElementSet::Observations)
            .is_some());
    }

    #[test]
    fn outputs_must_be_controllable() {
        let catalogue = DataItemCatalogue::new(vec![entry(
            "obs1",
            QuantityType::WaterLevel,
            ElementSet::Observations,
            false,
        )]);
        assert!(catalogue
            .find_output("obs1", QuantityType::WaterLevel, ElementSet::Observations)
            .is_none());
    }
}
