use crate::{
    consts::*,
    item::{ItemDescriptor, ItemId},
};
use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};

/// Static description of an item type, as known by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInfo {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub crafted: bool,
    #[serde(default)]
    pub category: i32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    #[serde(default)]
    pub price: i32,
}

fn default_max_stack() -> u32 {
    DEFAULT_MAX_STACK
}

impl ItemInfo {
    pub fn is_stackable(&self) -> bool {
        self.max_stack > 1
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Default, Clone)]
pub struct Items {
    data: HashMap<(ItemId, bool), Arc<ItemInfo>>,
}

impl Items {
    /// Registry holding the base game items the built-in bags refer to.
    pub fn builtin() -> Self {
        let mut items = Self::default();
        for (code, name, category, price, tags) in OBJECTS {
            let Ok(id) = ItemId::try_new(*code) else {
                continue;
            };
            items.register(ItemInfo {
                id,
                name: name.to_string(),
                crafted: false,
                category: *category,
                tags: tags.iter().map(|t| t.to_string()).collect_vec(),
                max_stack: DEFAULT_MAX_STACK,
                price: *price,
            });
        }
        for (code, name, price) in BIG_CRAFTABLES {
            let Ok(id) = ItemId::try_new(*code) else {
                continue;
            };
            items.register(ItemInfo {
                id,
                name: name.to_string(),
                crafted: true,
                category: BIG_CRAFTABLE_CATEGORY,
                tags: vec![],
                max_stack: DEFAULT_MAX_STACK,
                price: *price,
            });
        }
        if let Ok(id) = ItemId::try_new(RUSTY_SWORD) {
            items.register(ItemInfo {
                id,
                name: "Rusty Sword".to_string(),
                crafted: false,
                category: WEAPON_CATEGORY,
                tags: vec![],
                max_stack: 1,
                price: 50,
            });
        }
        items
    }

    /// Adds or replaces an item definition. Returns `false` when an existing
    /// definition was replaced.
    pub fn register(&mut self, info: ItemInfo) -> bool {
        let key = (info.id.clone(), info.crafted);
        match self.data.insert(key, Arc::new(info)) {
            Some(previous) => {
                warn!("items: replaced definition of '{}'", previous.name);
                false
            }
            None => true,
        }
    }

    pub fn get(&self, id: &ItemId, crafted: bool) -> Option<Arc<ItemInfo>> {
        self.data.get(&(id.clone(), crafted)).cloned()
    }

    /// Takes an item stack and returns the definition of its item type.
    pub fn info(&self, item: &ItemDescriptor) -> Option<Arc<ItemInfo>> {
        self.get(&item.id, item.crafted)
    }

    pub fn all(&self) -> Vec<Arc<ItemInfo>> {
        self.data
            .values()
            .cloned()
            .sorted_by(|a, b| a.name.cmp(&b.name))
            .collect_vec()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Looks an item up by display name first, then by id.
    pub fn find(&self, token: &str) -> Option<Arc<ItemInfo>> {
        let token = token.trim();
        self.data
            .values()
            .find(|i| i.name.eq_ignore_ascii_case(token))
            .or_else(|| self.data.values().find(|i| i.id.as_str() == token))
            .cloned()
    }

    pub fn name_of(&self, item: &ItemDescriptor) -> String {
        self.info(item)
            .map(|i| i.name.clone())
            .unwrap_or_else(|| item.id.to_string())
    }

    /// Maximum quantity a stack of this item holds outside of bags.
    pub fn max_stack_of(&self, item: &ItemDescriptor) -> u32 {
        self.info(item)
            .map_or(DEFAULT_MAX_STACK, |i| i.max_stack.max(1))
    }

    pub fn is_stackable(&self, item: &ItemDescriptor) -> bool {
        self.info(item).is_none_or(|i| i.is_stackable())
    }

    /// Builds a stack of `quantity` units priced from the registry.
    pub fn descriptor(&self, info: &ItemInfo, quantity: u32) -> ItemDescriptor {
        let mut item = ItemDescriptor::new(info.id.clone(), quantity).with_price(info.price);
        item.crafted = info.crafted;
        debug!("items: created {item}");
        item
    }
}

const OBJECTS: &[(&str, &str, i32, i32, &[&str])] = &[
    (WILD_HORSERADISH, "Wild Horseradish", GREENS_CATEGORY, 50, &["forage_item", "season_spring"]),
    (DAFFODIL, "Daffodil", GREENS_CATEGORY, 30, &["forage_item", "season_spring", "flower_item"]),
    (LEEK, "Leek", GREENS_CATEGORY, 60, &["forage_item", "season_spring"]),
    (DANDELION, "Dandelion", GREENS_CATEGORY, 40, &["forage_item", "season_spring", "flower_item"]),
    (SPICE_BERRY, "Spice Berry", GREENS_CATEGORY, 80, &["forage_item", "season_summer"]),
    (SWEET_PEA, "Sweet Pea", GREENS_CATEGORY, 50, &["forage_item", "season_summer", "flower_item"]),
    (COMMON_MUSHROOM, "Common Mushroom", GREENS_CATEGORY, 40, &["forage_item", "season_fall"]),
    (WILD_PLUM, "Wild Plum", GREENS_CATEGORY, 80, &["forage_item", "season_fall"]),
    (HAZELNUT, "Hazelnut", GREENS_CATEGORY, 90, &["forage_item", "season_fall"]),
    (BLACKBERRY, "Blackberry", GREENS_CATEGORY, 20, &["forage_item", "season_fall"]),
    (WINTER_ROOT, "Winter Root", GREENS_CATEGORY, 70, &["forage_item", "season_winter"]),
    (CRYSTAL_FRUIT, "Crystal Fruit", GREENS_CATEGORY, 150, &["forage_item", "season_winter"]),
    (SNOW_YAM, "Snow Yam", GREENS_CATEGORY, 100, &["forage_item", "season_winter"]),
    (EMERALD, "Emerald", GEM_CATEGORY, 250, &["gem"]),
    (AQUAMARINE, "Aquamarine", GEM_CATEGORY, 180, &["gem"]),
    (RUBY, "Ruby", GEM_CATEGORY, 250, &["gem"]),
    (AMETHYST, "Amethyst", GEM_CATEGORY, 100, &["gem"]),
    (TOPAZ, "Topaz", GEM_CATEGORY, 80, &["gem"]),
    (JADE, "Jade", GEM_CATEGORY, 200, &["gem"]),
    (DIAMOND, "Diamond", GEM_CATEGORY, 750, &["gem"]),
    (PRISMATIC_SHARD, "Prismatic Shard", GEM_CATEGORY, 2000, &["gem"]),
    (QUARTZ, "Quartz", GEM_CATEGORY, 25, &["forage_mineral"]),
    (FIRE_QUARTZ, "Fire Quartz", GEM_CATEGORY, 100, &["forage_mineral"]),
    (FROZEN_TEAR, "Frozen Tear", GEM_CATEGORY, 75, &["forage_mineral"]),
    (EARTH_CRYSTAL, "Earth Crystal", GEM_CATEGORY, 50, &["forage_mineral"]),
    (ALAMITE, "Alamite", MINERAL_CATEGORY, 150, &["geode_mineral"]),
    (BIXITE, "Bixite", MINERAL_CATEGORY, 300, &["geode_mineral"]),
    (SAP, "Sap", BUILDING_RESOURCE_CATEGORY, 2, &[]),
    (CLAY, "Clay", BUILDING_RESOURCE_CATEGORY, 20, &[]),
    (WOOD, "Wood", BUILDING_RESOURCE_CATEGORY, 2, &[]),
    (STONE, "Stone", BUILDING_RESOURCE_CATEGORY, 2, &[]),
    (HARDWOOD, "Hardwood", BUILDING_RESOURCE_CATEGORY, 15, &[]),
    (FIBER, "Fiber", BUILDING_RESOURCE_CATEGORY, 1, &[]),
    (COPPER_ORE, "Copper Ore", METAL_RESOURCE_CATEGORY, 5, &["ore_item"]),
    (IRON_ORE, "Iron Ore", METAL_RESOURCE_CATEGORY, 10, &["ore_item"]),
    (GOLD_ORE, "Gold Ore", METAL_RESOURCE_CATEGORY, 25, &["ore_item"]),
    (IRIDIUM_ORE, "Iridium Ore", METAL_RESOURCE_CATEGORY, 100, &["ore_item"]),
    (RADIOACTIVE_ORE, "Radioactive Ore", METAL_RESOURCE_CATEGORY, 300, &["ore_item"]),
    (COAL, "Coal", METAL_RESOURCE_CATEGORY, 15, &[]),
    (COPPER_BAR, "Copper Bar", METAL_RESOURCE_CATEGORY, 60, &["bar_item"]),
    (IRON_BAR, "Iron Bar", METAL_RESOURCE_CATEGORY, 120, &["bar_item"]),
    (GOLD_BAR, "Gold Bar", METAL_RESOURCE_CATEGORY, 250, &["bar_item"]),
    (IRIDIUM_BAR, "Iridium Bar", METAL_RESOURCE_CATEGORY, 1000, &["bar_item"]),
    (PARSNIP_SEEDS, "Parsnip Seeds", SEED_CATEGORY, 10, &["season_spring"]),
    (BEAN_STARTER, "Bean Starter", SEED_CATEGORY, 30, &["season_spring"]),
    (CAULIFLOWER_SEEDS, "Cauliflower Seeds", SEED_CATEGORY, 40, &["season_spring"]),
    (POTATO_SEEDS, "Potato Seeds", SEED_CATEGORY, 25, &["season_spring"]),
    (MELON_SEEDS, "Melon Seeds", SEED_CATEGORY, 40, &["season_summer"]),
    (PUMPKIN_SEEDS, "Pumpkin Seeds", SEED_CATEGORY, 50, &["season_fall"]),
    (PUFFERFISH, "Pufferfish", FISH_CATEGORY, 200, &["fish_ocean"]),
    (ANCHOVY, "Anchovy", FISH_CATEGORY, 30, &["fish_ocean"]),
    (TUNA, "Tuna", FISH_CATEGORY, 100, &["fish_ocean"]),
    (SARDINE, "Sardine", FISH_CATEGORY, 40, &["fish_ocean"]),
    (BREAM, "Bream", FISH_CATEGORY, 45, &["fish_river"]),
    (SMALLMOUTH_BASS, "Smallmouth Bass", FISH_CATEGORY, 50, &["fish_river"]),
    (SUNFISH, "Sunfish", FISH_CATEGORY, 30, &["fish_river"]),
    (CATFISH, "Catfish", FISH_CATEGORY, 200, &["fish_river"]),
    (LARGEMOUTH_BASS, "Largemouth Bass", FISH_CATEGORY, 100, &["fish_lake"]),
    (CARP, "Carp", FISH_CATEGORY, 30, &["fish_lake"]),
    (BUG_MEAT, "Bug Meat", MONSTER_LOOT_CATEGORY, 8, &[]),
    (SLIME, "Slime", MONSTER_LOOT_CATEGORY, 5, &[]),
    (BAT_WING, "Bat Wing", MONSTER_LOOT_CATEGORY, 15, &[]),
    (SOLAR_ESSENCE, "Solar Essence", MONSTER_LOOT_CATEGORY, 40, &[]),
    (VOID_ESSENCE, "Void Essence", MONSTER_LOOT_CATEGORY, 50, &[]),
];

const BIG_CRAFTABLES: &[(&str, &str, i32)] = &[
    (BEE_HOUSE, "Bee House", 0),
    (FURNACE, "Furnace", 0),
    (CHEST, "Chest", 0),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{id, item};

    #[test]
    fn builtin_registry_knows_base_items() {
        let items = Items::builtin();
        let copper = items.get(&id(COPPER_ORE), false).unwrap();
        assert_eq!(copper.name, "Copper Ore");
        assert_eq!(copper.category, METAL_RESOURCE_CATEGORY);
        assert!(items.get(&id(COPPER_ORE), true).is_none());
    }

    #[test]
    fn crafted_objects_live_in_their_own_id_space() {
        let items = Items::builtin();
        assert_eq!(items.get(&id(CHEST), true).unwrap().name, "Chest");
        assert_eq!(items.get(&id(CHEST), false).unwrap().name, "Tuna");
    }

    #[test]
    fn find_by_name_or_id() {
        let items = Items::builtin();
        assert_eq!(items.find("copper ore").unwrap().id, id(COPPER_ORE));
        assert_eq!(items.find("390").unwrap().name, "Stone");
        assert!(items.find("mystery").is_none());
    }

    #[test]
    fn unknown_items_fall_back_to_defaults() {
        let items = Items::builtin();
        let unknown = item("Mod.Cheese", 3);
        assert_eq!(items.name_of(&unknown), "Mod.Cheese");
        assert_eq!(items.max_stack_of(&unknown), DEFAULT_MAX_STACK);
        assert!(items.is_stackable(&unknown));
        assert!(!items.is_stackable(&item(RUSTY_SWORD, 1)));
    }

    #[test]
    fn register_replaces_existing_definition() {
        let mut items = Items::builtin();
        let mut stone = (*items.get(&id(STONE), false).unwrap()).clone();
        stone.price = 4;
        assert!(!items.register(stone));
        assert_eq!(items.get(&id(STONE), false).unwrap().price, 4);
    }
}
