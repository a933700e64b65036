use crate::{
    container::{
        AutofillPriority, BagState, BoundedBag, BundleBag, Container, ContainerId, OmniBag,
        OmniError, Rucksack, SortOrder, SortProperty,
    },
    context::EngineContext,
    item::{ItemDescriptor, ItemId},
    size::ContainerSizeTier,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum_macros::{Display, EnumString};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Bounded,
    Bundle,
    Rucksack,
    Omni,
}

/// Flat, serializable form of a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub id: ContainerId,
    pub kind: RecordKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<Uuid>,
    pub size: ContainerSizeTier,
    #[serde(default = "enabled")]
    pub autofill: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<AutofillPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub excluded: BTreeSet<ItemId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<ItemDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<ContainerRecord>,
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("bounded bag record {0} has no type id")]
    MissingType(ContainerId),
    #[error("unknown bag type {0}")]
    UnknownType(Uuid),
    #[error("failed to restore nested bag: {0}")]
    Nested(#[from] OmniError),
}

impl From<&Container> for ContainerRecord {
    fn from(container: &Container) -> Self {
        let mut record = ContainerRecord {
            id: container.id(),
            kind: RecordKind::Omni,
            type_id: None,
            size: container.size(),
            autofill: container.autofill(),
            priority: None,
            sort: None,
            order: None,
            excluded: BTreeSet::new(),
            contents: vec![],
            nested: vec![],
        };
        if let Some(state) = container.state() {
            record.excluded = state.excluded.clone();
            record.contents = state.contents.clone();
        }
        match container {
            Container::Bounded(b) => {
                record.kind = RecordKind::Bounded;
                record.type_id = Some(b.type_id());
            }
            Container::Bundle(_) => record.kind = RecordKind::Bundle,
            Container::Rucksack(r) => {
                record.kind = RecordKind::Rucksack;
                record.priority = Some(r.priority);
                record.sort = Some(r.sort);
                record.order = Some(r.order);
            }
            Container::Omni(o) => {
                record.nested = o.nested().iter().map(ContainerRecord::from).collect();
            }
        }
        record
    }
}

impl ContainerRecord {
    /// Rebuilds the container. Bundle bags take their needs from the context
    /// objectives, not from the record.
    pub fn restore(self, ctx: &EngineContext) -> Result<Container, RecordError> {
        let state = BagState {
            id: self.id,
            size: self.size,
            contents: self.contents,
            autofill: self.autofill,
            excluded: self.excluded,
            owner: None,
        };
        let container = match self.kind {
            RecordKind::Bounded => {
                let type_id = self.type_id.ok_or(RecordError::MissingType(self.id))?;
                if ctx.catalog().get(&type_id).is_none() {
                    return Err(RecordError::UnknownType(type_id));
                }
                let mut bag = BoundedBag::new(type_id, self.size);
                bag.state = state;
                Container::Bounded(bag)
            }
            RecordKind::Bundle => {
                let mut bag = BundleBag::new(self.size, ctx.objectives());
                bag.state = state;
                Container::Bundle(bag)
            }
            RecordKind::Rucksack => {
                let mut bag = Rucksack::new(self.size);
                bag.state = state;
                bag.priority = self.priority.unwrap_or_default();
                bag.sort = self.sort.unwrap_or_default();
                bag.order = self.order.unwrap_or_default();
                Container::Rucksack(bag)
            }
            RecordKind::Omni => {
                let mut omni = OmniBag::new(self.size).with_id(self.id);
                for nested in self.nested {
                    omni.insert(nested.restore(ctx)?)?;
                }
                Container::Omni(omni)
            }
        };
        Ok(container)
    }
}
