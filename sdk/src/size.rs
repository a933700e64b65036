use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Capacity class of a bag. Ordering matters: upgrades only go up and
/// omni bags only nest bags of their own size or smaller.
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
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ContainerSizeTier {
    #[default]
    Small,
    Medium,
    Large,
    Giant,
    Massive,
}

impl ContainerSizeTier {
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContainerSizeTier::Small => "Small",
            ContainerSizeTier::Medium => "Medium",
            ContainerSizeTier::Large => "Large",
            ContainerSizeTier::Giant => "Giant",
            ContainerSizeTier::Massive => "Massive",
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::iter().find(|s| s > self)
    }
}

/// One value per size tier, as found in the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeTable<T> {
    pub small: T,
    pub medium: T,
    pub large: T,
    pub giant: T,
    pub massive: T,
}

impl<T: Copy> SizeTable<T> {
    pub fn get(&self, size: ContainerSizeTier) -> T {
        match size {
            ContainerSizeTier::Small => self.small,
            ContainerSizeTier::Medium => self.medium,
            ContainerSizeTier::Large => self.large,
            ContainerSizeTier::Giant => self.giant,
            ContainerSizeTier::Massive => self.massive,
        }
    }
}

impl<T: Copy> From<[T; 5]> for SizeTable<T> {
    fn from(value: [T; 5]) -> Self {
        Self {
            small: value[0],
            medium: value[1],
            large: value[2],
            giant: value[3],
            massive: value[4],
        }
    }
}
