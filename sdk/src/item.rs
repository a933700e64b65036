use derive_more::TryFrom;
use nutype::nutype;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Formatter};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        PartialOrd,
        Ord,
        Display,
        Deref,
        Serialize,
        Deserialize
    )
)]
pub struct ItemId(String);

#[derive(
    Debug,
    Default,
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
    TryFrom,
)]
#[try_from(repr)]
#[repr(u8)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    #[default]
    Regular = 0,
    Silver = 1,
    Gold = 2,
    Iridium = 4,
}

impl QualityTier {
    pub fn price_multiplier(&self) -> f64 {
        match self {
            QualityTier::Regular => 1.0,
            QualityTier::Silver => 1.25,
            QualityTier::Gold => 1.5,
            QualityTier::Iridium => 2.0,
        }
    }
}

/// How two stacks of the same item are told apart.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equivalence {
    #[default]
    ByQuality,
    IgnoreQuality,
}

impl Equivalence {
    pub fn matches(&self, a: &ItemDescriptor, b: &ItemDescriptor) -> bool {
        a.id == b.id
            && a.crafted == b.crafted
            && (*self == Equivalence::IgnoreQuality || a.quality == b.quality)
    }
}

/// A stack of items: identity, quality, quantity and unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDescriptor {
    pub id: ItemId,
    #[serde(default)]
    pub crafted: bool,
    #[serde(default)]
    pub quality: QualityTier,
    pub quantity: u32,
    #[serde(default)]
    pub price: i32,
}

impl ItemDescriptor {
    pub fn new(id: ItemId, quantity: u32) -> Self {
        Self {
            id,
            crafted: false,
            quality: QualityTier::Regular,
            quantity,
            price: 0,
        }
    }

    pub fn with_quality(mut self, quality: QualityTier) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_price(mut self, price: i32) -> Self {
        self.price = price;
        self
    }

    pub fn as_crafted(mut self) -> Self {
        self.crafted = true;
        self
    }

    /// Returns a copy of this stack holding `quantity` units.
    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    pub fn is_equivalent(&self, other: &ItemDescriptor, equivalence: Equivalence) -> bool {
        equivalence.matches(self, other)
    }

    /// Sell value of one unit, quality included.
    pub fn unit_value(&self) -> f64 {
        self.price as f64 * self.quality.price_multiplier()
    }

    pub fn stack_value(&self) -> f64 {
        self.unit_value() * self.quantity as f64
    }
}

impl fmt::Display for ItemDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'x{}", self.id, self.quantity)?;
        if self.quality != QualityTier::Regular {
            write!(f, " ({})", self.quality)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::item;

    #[test]
    fn item_id_is_trimmed_and_not_empty() {
        assert_eq!(ItemId::try_new("  378 ").unwrap().as_str(), "378");
        assert!(ItemId::try_new("   ").is_err());
    }

    #[test]
    fn quality_decodes_game_encoding() {
        assert_eq!(QualityTier::try_from(4u8).unwrap(), QualityTier::Iridium);
        assert_eq!(QualityTier::try_from(2u8).unwrap(), QualityTier::Gold);
        assert!(QualityTier::try_from(3u8).is_err());
        assert!(QualityTier::Silver < QualityTier::Gold);
    }

    #[test]
    fn equivalence_can_ignore_quality() {
        let regular = item("378", 5);
        let gold = item("378", 5).with_quality(QualityTier::Gold);
        assert!(!regular.is_equivalent(&gold, Equivalence::ByQuality));
        assert!(regular.is_equivalent(&gold, Equivalence::IgnoreQuality));
        assert!(!regular.is_equivalent(&item("380", 5), Equivalence::IgnoreQuality));
        assert!(!regular.is_equivalent(&item("378", 5).as_crafted(), Equivalence::IgnoreQuality));
    }

    #[test]
    fn price_does_not_affect_equivalence() {
        let cheap = item("378", 1).with_price(5);
        let dear = item("378", 1).with_price(50);
        assert!(cheap.is_equivalent(&dear, Equivalence::ByQuality));
    }
}
