use crate::{
    consts::BAG_PRICES,
    item::Equivalence,
    rule::{Probe, Rule},
    size::ContainerSizeTier,
};
use itertools::Itertools;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;
use uuid::Uuid;

#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Shop {
    Pierre,
    Clint,
    Willy,
    Marnie,
    Robin,
    Krobus,
    Sandy,
    Dwarf,
    AdventureGuild,
    TravelingCart,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizeConfig {
    pub capacity_multiplier: f64,
    pub price: i32,
    pub sellers: BTreeSet<Shop>,
    pub eligibility: Rule,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BagTypeDefinition {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub equivalence: Equivalence,
    pub sizes: BTreeMap<ContainerSizeTier, SizeConfig>,
}

impl BagTypeDefinition {
    pub fn size(&self, size: ContainerSizeTier) -> Option<&SizeConfig> {
        self.sizes.get(&size)
    }

    pub fn supports(&self, size: ContainerSizeTier) -> bool {
        self.sizes.contains_key(&size)
    }

    pub fn smallest(&self) -> Option<ContainerSizeTier> {
        self.sizes.keys().next().copied()
    }

    /// An item is eligible when the rule of the probed size matches it. Sizes
    /// the type does not define accept nothing.
    pub fn accepts(&self, probe: &Probe) -> bool {
        self.size(probe.size)
            .is_some_and(|config| config.eligibility.is_match(probe))
    }

    pub fn display_name(&self, size: ContainerSizeTier) -> String {
        format!("{} {}", size.label(), self.name)
    }
}

/// Deterministic id for a bag type, so that saved bags keep resolving.
pub fn type_id(name: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.trim().to_lowercase().as_bytes())
}

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("bag type '{0}' is already defined")]
    DuplicateName(String),
    #[error("bag type id '{0}' is already in use")]
    DuplicateId(Uuid),
    #[error("bag type '{0}' has no usable size")]
    NoUsableSizes(String),
    #[error("unknown bag type '{0}'")]
    UnknownType(String),
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    types: Vec<BagTypeDefinition>,
}

impl Catalog {
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        for source in builtin_sources() {
            if let Err(e) = catalog.load(source) {
                warn!("catalog: failed to load built-in bag type: {e}");
            }
        }
        catalog
    }

    pub fn get(&self, id: &Uuid) -> Option<&BagTypeDefinition> {
        self.types.iter().find(|t| t.id == *id)
    }

    pub fn by_name(&self, name: &str) -> Option<&BagTypeDefinition> {
        let name = name.trim();
        self.types.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Finds a type either by name or by id written as text.
    pub fn find(&self, token: &str) -> Option<&BagTypeDefinition> {
        self.by_name(token).or_else(|| {
            Uuid::parse_str(token.trim())
                .ok()
                .and_then(|id| self.get(&id))
        })
    }

    pub fn all(&self) -> &[BagTypeDefinition] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn add(&mut self, definition: BagTypeDefinition) -> Result<Uuid, CatalogError> {
        if self.get(&definition.id).is_some() {
            return Err(CatalogError::DuplicateId(definition.id));
        }
        if self.by_name(&definition.name).is_some() {
            return Err(CatalogError::DuplicateName(definition.name));
        }
        let id = definition.id;
        info!(
            "catalog: added '{}' ({})",
            definition.name,
            definition.sizes.keys().join(", ")
        );
        self.types.push(definition);
        Ok(id)
    }

    pub fn load(&mut self, source: BagTypeSource) -> Result<Uuid, CatalogError> {
        self.add(source.build()?)
    }

    /// Widens the eligibility of an existing type. Returns the number of size
    /// tiers that received new rules.
    pub fn merge(&mut self, merge: &RuleMerge) -> Result<usize, CatalogError> {
        let token = merge.bag.trim();
        let Some(definition) = self
            .types
            .iter_mut()
            .find(|t| t.name.eq_ignore_ascii_case(token) || t.id.to_string() == token)
        else {
            return Err(CatalogError::UnknownType(merge.bag.clone()));
        };
        let rules = parse_rules(&definition.name, &merge.items, &merge.rules);
        if rules.is_empty() {
            return Ok(0);
        }
        let mut widened = 0;
        for (size, config) in definition.sizes.iter_mut() {
            if !merge.sizes.is_empty() && !merge.sizes.contains(size) {
                continue;
            }
            config.eligibility.extend_any(rules.clone());
            widened += 1;
        }
        info!(
            "catalog: merged {} rule(s) into '{}' ({widened} size(s))",
            rules.len(),
            definition.name
        );
        Ok(widened)
    }

    /// Bag types and sizes a given shop sells, with their base price.
    pub fn sold_by(&self, shop: Shop) -> Vec<(&BagTypeDefinition, ContainerSizeTier, i32)> {
        self.types
            .iter()
            .flat_map(|t| {
                t.sizes
                    .iter()
                    .filter(|(_, c)| c.sellers.contains(&shop))
                    .map(move |(size, c)| (t, *size, c.price))
            })
            .collect_vec()
    }
}

/// Bag type as written in a catalog file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BagTypeSource {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub equivalence: Equivalence,
    #[serde(default)]
    pub sizes: BTreeMap<ContainerSizeTier, SizeSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeSource {
    #[serde(default = "default_multiplier")]
    pub capacity_multiplier: f64,
    #[serde(default)]
    pub price: Option<i32>,
    #[serde(default)]
    pub sellers: BTreeSet<Shop>,
    /// Plain item ids, each accepted regardless of quality.
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub rules: Vec<String>,
}

impl Default for SizeSource {
    fn default() -> Self {
        Self {
            capacity_multiplier: default_multiplier(),
            price: None,
            sellers: BTreeSet::new(),
            items: vec![],
            rules: vec![],
        }
    }
}

fn default_multiplier() -> f64 {
    1.0
}

/// Rules added to an existing bag type once late content is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleMerge {
    pub bag: String,
    #[serde(default)]
    pub sizes: Vec<ContainerSizeTier>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub rules: Vec<String>,
}

impl BagTypeSource {
    pub fn build(self) -> Result<BagTypeDefinition, CatalogError> {
        let mut sizes = BTreeMap::new();
        for (size, source) in self.sizes {
            let mut rules = parse_rules(&self.name, &source.items, &source.rules);
            if rules.is_empty() {
                warn!("catalog: '{}' {size} has no valid rule, dropping size", self.name);
                continue;
            }
            let eligibility = if rules.len() == 1 {
                rules.remove(0)
            } else {
                Rule::any(rules)
            };
            sizes.insert(
                size,
                SizeConfig {
                    capacity_multiplier: source.capacity_multiplier,
                    price: source.price.unwrap_or(BAG_PRICES[size.index()]),
                    sellers: source.sellers,
                    eligibility,
                },
            );
        }
        if sizes.is_empty() {
            warn!("catalog: '{}' has no usable size, dropping type", self.name);
            return Err(CatalogError::NoUsableSizes(self.name));
        }
        Ok(BagTypeDefinition {
            id: self.id.unwrap_or_else(|| type_id(&self.name)),
            name: self.name,
            description: self.description,
            equivalence: self.equivalence,
            sizes,
        })
    }
}

fn parse_rules(bag: &str, items: &[String], rules: &[String]) -> Vec<Rule> {
    let ids = items
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .map(Rule::id);
    let parsed = rules.iter().filter_map(|text| match text.parse::<Rule>() {
        Ok(rule) => Some(rule),
        Err(e) => {
            warn!("catalog: dropped rule '{text}' of '{bag}': {e}");
            None
        }
    });
    ids.chain(parsed).collect_vec()
}

fn builtin_type(
    name: &str,
    description: &str,
    equivalence: Equivalence,
    sellers: &[Shop],
    rules: &[&str],
) -> BagTypeSource {
    let size = SizeSource {
        sellers: sellers.iter().copied().collect(),
        rules: rules.iter().map(|r| r.to_string()).collect_vec(),
        ..Default::default()
    };
    BagTypeSource {
        id: None,
        name: name.to_owned(),
        description: description.to_owned(),
        equivalence,
        sizes: [
            ContainerSizeTier::Small,
            ContainerSizeTier::Medium,
            ContainerSizeTier::Large,
            ContainerSizeTier::Giant,
            ContainerSizeTier::Massive,
        ]
        .into_iter()
        .map(|s| (s, size.clone()))
        .collect(),
    }
}

fn builtin_sources() -> Vec<BagTypeSource> {
    use Equivalence::*;
    use Shop::*;
    vec![
        builtin_type(
            "Gem Bag",
            "Holds gems and minerals found while foraging.",
            ByQuality,
            &[Clint, Dwarf],
            &["category:-2 & !id:74", "id:74 & size:large.."],
        ),
        builtin_type(
            "Mining Bag",
            "Holds ores, bars and coal.",
            ByQuality,
            &[Clint],
            &[
                "category:-15 & !(id:386 | id:909 | id:337)",
                "(id:386 | id:337) & size:large..",
                "id:909 & size:giant..",
            ],
        ),
        builtin_type(
            "Resource Bag",
            "Holds basic building resources.",
            IgnoreQuality,
            &[Robin],
            &[
                "id:388 | id:390 | id:771 | id:330 | id:92",
                "id:709 & size:medium..",
            ],
        ),
        builtin_type("Seed Bag", "Holds seeds and starters.", ByQuality, &[Pierre], &["category:-74"]),
        builtin_type("Fish Bag", "Holds any fish.", ByQuality, &[Willy], &["category:-4"]),
        builtin_type(
            "Ocean Fish Bag",
            "Holds fish caught in the ocean.",
            ByQuality,
            &[Willy],
            &["tag:fish_ocean"],
        ),
        builtin_type(
            "Forage Bag",
            "Holds forageables. Small bags only keep regular and silver ones.",
            ByQuality,
            &[Pierre, TravelingCart],
            &[
                "tag:forage_item & size:medium..",
                "tag:forage_item & size:small & quality:regular,silver",
            ],
        ),
        builtin_type(
            "Monster Loot Bag",
            "Holds monster drops.",
            ByQuality,
            &[AdventureGuild],
            &["category:-28"],
        ),
        builtin_type(
            "Crafting Bag",
            "Holds placeable crafted objects.",
            ByQuality,
            &[Robin],
            &["crafted:true"],
        ),
    ]
}
