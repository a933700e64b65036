pub const DEFAULT_MAX_STACK: u32 = 999;

/// Rank added to candidates living inside an omni bag.
pub const NESTED_PENALTY: u32 = 10;

pub const BASE_CAPACITIES: [u32; 5] = [30, 99, 300, 999, 9999];
pub const RUCKSACK_SLOTS: [u32; 5] = [6, 12, 24, 36, 48];
pub const RUCKSACK_CAPACITIES: [u32; 5] = [30, 99, 300, 999, 9999];
pub const BAG_PRICES: [i32; 5] = [2000, 5000, 15000, 60000, 150000];
pub const RUCKSACK_PRICES: [i32; 5] = [1000, 4000, 12000, 40000, 100000];
pub const OMNI_PRICES: [i32; 5] = [5000, 20000, 60000, 200000, 500000];

pub const GEM_CATEGORY: i32 = -2;
pub const FISH_CATEGORY: i32 = -4;
pub const BIG_CRAFTABLE_CATEGORY: i32 = -9;
pub const MINERAL_CATEGORY: i32 = -12;
pub const METAL_RESOURCE_CATEGORY: i32 = -15;
pub const BUILDING_RESOURCE_CATEGORY: i32 = -16;
pub const MONSTER_LOOT_CATEGORY: i32 = -28;
pub const SEED_CATEGORY: i32 = -74;
pub const GREENS_CATEGORY: i32 = -81;
pub const WEAPON_CATEGORY: i32 = -98;

pub const WILD_HORSERADISH: &str = "16";
pub const DAFFODIL: &str = "18";
pub const LEEK: &str = "20";
pub const DANDELION: &str = "22";
pub const EMERALD: &str = "60";
pub const AQUAMARINE: &str = "62";
pub const RUBY: &str = "64";
pub const AMETHYST: &str = "66";
pub const TOPAZ: &str = "68";
pub const JADE: &str = "70";
pub const DIAMOND: &str = "72";
pub const PRISMATIC_SHARD: &str = "74";
pub const QUARTZ: &str = "80";
pub const FIRE_QUARTZ: &str = "82";
pub const FROZEN_TEAR: &str = "84";
pub const EARTH_CRYSTAL: &str = "86";
pub const SAP: &str = "92";
pub const PUFFERFISH: &str = "128";
pub const ANCHOVY: &str = "129";
pub const TUNA: &str = "130";
pub const SARDINE: &str = "131";
pub const BREAM: &str = "132";
pub const LARGEMOUTH_BASS: &str = "136";
pub const SMALLMOUTH_BASS: &str = "137";
pub const CARP: &str = "142";
pub const CATFISH: &str = "143";
pub const SUNFISH: &str = "145";
pub const CLAY: &str = "330";
pub const COPPER_BAR: &str = "334";
pub const IRON_BAR: &str = "335";
pub const GOLD_BAR: &str = "336";
pub const IRIDIUM_BAR: &str = "337";
pub const COPPER_ORE: &str = "378";
pub const IRON_ORE: &str = "380";
pub const COAL: &str = "382";
pub const GOLD_ORE: &str = "384";
pub const IRIDIUM_ORE: &str = "386";
pub const WOOD: &str = "388";
pub const STONE: &str = "390";
pub const SPICE_BERRY: &str = "396";
pub const SWEET_PEA: &str = "402";
pub const COMMON_MUSHROOM: &str = "404";
pub const WILD_PLUM: &str = "406";
pub const HAZELNUT: &str = "408";
pub const BLACKBERRY: &str = "410";
pub const WINTER_ROOT: &str = "412";
pub const CRYSTAL_FRUIT: &str = "414";
pub const SNOW_YAM: &str = "416";
pub const PARSNIP_SEEDS: &str = "472";
pub const BEAN_STARTER: &str = "473";
pub const CAULIFLOWER_SEEDS: &str = "474";
pub const POTATO_SEEDS: &str = "475";
pub const MELON_SEEDS: &str = "479";
pub const PUMPKIN_SEEDS: &str = "490";
pub const ALAMITE: &str = "538";
pub const BIXITE: &str = "539";
pub const BUG_MEAT: &str = "684";
pub const HARDWOOD: &str = "709";
pub const SLIME: &str = "766";
pub const BAT_WING: &str = "767";
pub const SOLAR_ESSENCE: &str = "768";
pub const VOID_ESSENCE: &str = "769";
pub const FIBER: &str = "771";
pub const RADIOACTIVE_ORE: &str = "909";

/// Big craftables live in their own id space, flagged as crafted objects.
pub const BEE_HOUSE: &str = "10";
pub const CHEST: &str = "130";
pub const FURNACE: &str = "13";

pub const RUSTY_SWORD: &str = "rusty_sword";
