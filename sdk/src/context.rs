use crate::{
    bundles::Objectives,
    catalog::Catalog,
    consts::{BASE_CAPACITIES, RUCKSACK_CAPACITIES, RUCKSACK_SLOTS},
    items::Items,
    size::{ContainerSizeTier, SizeTable},
};
use serde::{Deserialize, Serialize};

/// User tunables read from the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub capacity_multiplier: f64,
    pub price_multiplier: f64,
    pub base_capacities: SizeTable<u32>,
    pub rucksack_slots: SizeTable<u32>,
    pub rucksack_capacities: SizeTable<u32>,
    /// Whether autofill looks into bags held by omni bags.
    pub include_nested: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            capacity_multiplier: 1.0,
            price_multiplier: 1.0,
            base_capacities: BASE_CAPACITIES.into(),
            rucksack_slots: RUCKSACK_SLOTS.into(),
            rucksack_capacities: RUCKSACK_CAPACITIES.into(),
            include_nested: true,
        }
    }
}

impl Settings {
    /// Units one stack of a bounded bag holds.
    pub fn bounded_capacity(&self, size: ContainerSizeTier, type_multiplier: f64) -> u32 {
        let capacity =
            self.base_capacities.get(size) as f64 * type_multiplier * self.capacity_multiplier;
        (capacity.round() as u32).max(1)
    }

    pub fn rucksack_slots(&self, size: ContainerSizeTier) -> usize {
        self.rucksack_slots.get(size) as usize
    }

    pub fn rucksack_capacity(&self, size: ContainerSizeTier) -> u32 {
        let capacity = self.rucksack_capacities.get(size) as f64 * self.capacity_multiplier;
        (capacity.round() as u32).max(1)
    }

    pub fn price(&self, base: i32) -> i32 {
        (base as f64 * self.price_multiplier).round() as i32
    }
}

/// Everything the engine reads while moving items around. Built once at
/// startup and passed by reference.
#[derive(Debug, Clone, Default)]
pub struct EngineContext {
    items: Items,
    catalog: Catalog,
    settings: Settings,
    objectives: Objectives,
}

impl EngineContext {
    pub fn new(items: Items, catalog: Catalog, settings: Settings, objectives: Objectives) -> Self {
        Self {
            items,
            catalog,
            settings,
            objectives,
        }
    }

    pub fn builtin() -> Self {
        Self::new(
            Items::builtin(),
            Catalog::builtin(),
            Settings::default(),
            Objectives::default(),
        )
    }

    pub fn items(&self) -> &Items {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Items {
        &mut self.items
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn objectives(&self) -> &Objectives {
        &self.objectives
    }

    pub fn objectives_mut(&mut self) -> &mut Objectives {
        &mut self.objectives
    }
}
