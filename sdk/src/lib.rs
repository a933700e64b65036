pub use autofill::{Autofill, BagPath, Placement};
pub use catalog::{BagTypeDefinition, Catalog};
pub use container::{Container, ContainerId, ContainerKind};
pub use context::{EngineContext, Settings};
pub use item::{Equivalence, ItemDescriptor, ItemId, QualityTier};
pub use items::{ItemInfo, Items};
pub use list::{Inventory, ItemList, ItemPile};
pub use record::ContainerRecord;
pub use rule::Rule;
pub use size::ContainerSizeTier;
pub use transfer::{ContentsObserver, TransferError, TransferRequest};

pub mod autofill;
pub mod bundles;
pub mod catalog;
pub mod consts;
pub mod container;
pub mod context;
pub mod item;
pub mod items;
pub mod list;
pub mod record;
pub mod rule;
pub mod size;
pub mod transfer;

#[cfg(test)]
pub(crate) mod test_utils;
