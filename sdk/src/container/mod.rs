use crate::{
    consts::{BAG_PRICES, OMNI_PRICES, RUCKSACK_PRICES},
    context::EngineContext,
    item::{Equivalence, ItemDescriptor, ItemId},
    list::ItemList,
    size::ContainerSizeTier,
    transfer::{check_indices, ContentsObserver, TransferError, TransferRequest},
};
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeSet,
    fmt::{self, Formatter},
};
use strum_macros::EnumIs;
use thiserror::Error;
use uuid::Uuid;

pub use bounded::BoundedBag;
pub use bundle::BundleBag;
pub use omni::{OmniBag, OmniError};
pub use rucksack::{AutofillPriority, Rucksack, SortOrder, SortProperty};

pub mod bounded;
pub mod bundle;
pub mod omni;
pub mod rucksack;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(Uuid);

impl ContainerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ContainerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What an omni bag keys its nested bags by.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIs)]
pub enum ContainerKind {
    Bounded(Uuid),
    Bundle,
    Rucksack,
    Omni,
}

/// State every item-holding bag carries.
#[derive(Debug, Clone, PartialEq)]
pub struct BagState {
    pub id: ContainerId,
    pub size: ContainerSizeTier,
    pub contents: Vec<ItemDescriptor>,
    pub autofill: bool,
    /// Items autofill must leave alone.
    pub excluded: BTreeSet<ItemId>,
    /// Omni bag holding this bag, if any.
    pub owner: Option<ContainerId>,
}

impl BagState {
    pub fn new(size: ContainerSizeTier) -> Self {
        Self {
            id: ContainerId::new(),
            size,
            contents: vec![],
            autofill: true,
            excluded: BTreeSet::new(),
            owner: None,
        }
    }

    pub fn stack_of(
        &self,
        item: &ItemDescriptor,
        equivalence: Equivalence,
    ) -> Option<&ItemDescriptor> {
        self.contents
            .iter()
            .find(|s| s.is_equivalent(item, equivalence))
    }
}

pub trait ItemContainer {
    fn content(&self) -> &[ItemDescriptor];

    fn total_items(&self) -> u32 {
        self.content().iter().map(|i| i.quantity).sum()
    }

    fn total_of(&self, id: &ItemId) -> u32 {
        self.content()
            .iter()
            .filter(|i| i.id == *id)
            .map(|i| i.quantity)
            .sum()
    }
}

pub trait Eligibility {
    fn accepts(&self, item: &ItemDescriptor, ctx: &EngineContext) -> bool;
}

pub trait LimitedContainer: ItemContainer + Eligibility {
    /// Units of `item` the container can still take, eligibility aside.
    fn room_for(&self, item: &ItemDescriptor, ctx: &EngineContext) -> u32;

    fn is_full_for(&self, item: &ItemDescriptor, ctx: &EngineContext) -> bool {
        self.room_for(item, ctx) == 0
    }
}

pub trait SlotLimited: ItemContainer + LimitedContainer {
    fn slots(&self, ctx: &EngineContext) -> usize;

    fn free_slots(&self, ctx: &EngineContext) -> usize {
        self.slots(ctx).saturating_sub(self.content().len())
    }
}

pub trait SpaceLimited: ItemContainer + LimitedContainer {
    /// Most units a single stack of `item` may reach.
    fn stack_limit(&self, item: &ItemDescriptor, ctx: &EngineContext) -> u32;
}

/// Containers that hold items themselves and exchange them with item lists.
pub trait Transferable: LimitedContainer {
    fn id(&self) -> ContainerId;
    fn equivalence(&self, ctx: &EngineContext) -> Equivalence;
    fn content_mut(&mut self) -> &mut Vec<ItemDescriptor>;

    /// Runs once after a transfer changed the contents.
    fn after_change(&mut self, _ctx: &EngineContext) {}

    fn has_stack_of(&self, item: &ItemDescriptor, ctx: &EngineContext) -> bool {
        let equivalence = self.equivalence(ctx);
        self.content()
            .iter()
            .any(|s| s.quantity > 0 && s.is_equivalent(item, equivalence))
    }

    /// Stores as much of `item` as eligibility and room allow. Returns the
    /// quantity stored.
    fn store(&mut self, item: &ItemDescriptor, ctx: &EngineContext) -> u32 {
        if item.quantity == 0 || !self.accepts(item, ctx) {
            return 0;
        }
        let amount = self.room_for(item, ctx).min(item.quantity);
        if amount == 0 {
            return 0;
        }
        let equivalence = self.equivalence(ctx);
        match self
            .content_mut()
            .iter_mut()
            .find(|s| s.is_equivalent(item, equivalence))
        {
            Some(stack) => stack.quantity += amount,
            None => self.content_mut().push(item.with_quantity(amount)),
        }
        amount
    }

    /// Moves the requested entries without compacting `source` nor notifying
    /// anyone. Returns the quantity moved per request.
    fn pull_from<L: ItemList + ?Sized>(
        &mut self,
        requests: &[TransferRequest],
        source: &mut L,
        ctx: &EngineContext,
    ) -> Vec<u32> {
        requests
            .iter()
            .map(|request| {
                let Some(entry) = source.get(request.index) else {
                    return 0;
                };
                let wanted = entry.with_quantity(request.quantity.min(entry.quantity));
                let stored = self.store(&wanted, ctx);
                if stored > 0 {
                    source.take(request.index, stored);
                    debug!("{}: stored {}", self.id(), wanted.with_quantity(stored));
                }
                stored
            })
            .collect_vec()
    }

    fn move_into<L: ItemList + ?Sized, O: ContentsObserver + ?Sized>(
        &mut self,
        requests: &[TransferRequest],
        source: &mut L,
        ctx: &EngineContext,
        observer: &mut O,
    ) -> Result<u32, TransferError> {
        check_indices(requests, source.len())?;
        let moved: u32 = self.pull_from(requests, source, ctx).into_iter().sum();
        source.compact();
        if moved > 0 {
            self.after_change(ctx);
            observer.contents_changed(self.id());
        }
        Ok(moved)
    }

    /// Moves stacks out to `target`, opening at most `target_capacity` new
    /// stacks there.
    fn move_out_of<L: ItemList + ?Sized, O: ContentsObserver + ?Sized>(
        &mut self,
        requests: &[TransferRequest],
        target: &mut L,
        target_capacity: usize,
        ctx: &EngineContext,
        observer: &mut O,
    ) -> Result<u32, TransferError> {
        check_indices(requests, self.content().len())?;
        let mut moved = 0;
        let mut budget = target_capacity;
        for request in requests {
            let stack = &self.content()[request.index];
            let wanted = stack.with_quantity(request.quantity.min(stack.quantity));
            if wanted.quantity == 0 {
                continue;
            }
            let before = target.occupied();
            let placed = target.deposit(&wanted, ctx.items().max_stack_of(&wanted), budget);
            budget = budget.saturating_sub(target.occupied().saturating_sub(before));
            if placed > 0 {
                self.content_mut()[request.index].quantity -= placed;
                moved += placed;
                debug!("{}: released {}", self.id(), wanted.with_quantity(placed));
            }
        }
        self.content_mut().retain(|s| s.quantity > 0);
        if moved > 0 {
            self.after_change(ctx);
            observer.contents_changed(self.id());
        }
        Ok(moved)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpgradeError {
    #[error("cannot go from {from} to {to}")]
    NotAnUpgrade {
        from: ContainerSizeTier,
        to: ContainerSizeTier,
    },
    #[error("this bag type does not come in {0}")]
    UnsupportedSize(ContainerSizeTier),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Container {
    Bounded(BoundedBag),
    Bundle(BundleBag),
    Rucksack(Rucksack),
    Omni(OmniBag),
}

impl Container {
    pub fn id(&self) -> ContainerId {
        match self {
            Container::Bounded(b) => b.state.id,
            Container::Bundle(b) => b.state.id,
            Container::Rucksack(r) => r.state.id,
            Container::Omni(o) => o.id(),
        }
    }

    pub fn kind(&self) -> ContainerKind {
        match self {
            Container::Bounded(b) => ContainerKind::Bounded(b.type_id()),
            Container::Bundle(_) => ContainerKind::Bundle,
            Container::Rucksack(_) => ContainerKind::Rucksack,
            Container::Omni(_) => ContainerKind::Omni,
        }
    }

    pub fn size(&self) -> ContainerSizeTier {
        match self {
            Container::Bounded(b) => b.state.size,
            Container::Bundle(b) => b.state.size,
            Container::Rucksack(r) => r.state.size,
            Container::Omni(o) => o.size(),
        }
    }

    pub fn state(&self) -> Option<&BagState> {
        match self {
            Container::Bounded(b) => Some(&b.state),
            Container::Bundle(b) => Some(&b.state),
            Container::Rucksack(r) => Some(&r.state),
            Container::Omni(_) => None,
        }
    }

    pub fn state_mut(&mut self) -> Option<&mut BagState> {
        match self {
            Container::Bounded(b) => Some(&mut b.state),
            Container::Bundle(b) => Some(&mut b.state),
            Container::Rucksack(r) => Some(&mut r.state),
            Container::Omni(_) => None,
        }
    }

    pub fn name(&self, ctx: &EngineContext) -> String {
        match self {
            Container::Bounded(b) => b.name(ctx),
            Container::Bundle(b) => format!("{} Bundle Bag", b.state.size.label()),
            Container::Rucksack(r) => format!("{} Rucksack", r.state.size.label()),
            Container::Omni(o) => format!("{} Omni Bag", o.size().label()),
        }
    }

    pub fn price(&self, ctx: &EngineContext) -> i32 {
        match self {
            Container::Bounded(b) => b.price(ctx),
            Container::Bundle(b) => ctx.settings().price(BAG_PRICES[b.state.size.index()]),
            Container::Rucksack(r) => ctx.settings().price(RUCKSACK_PRICES[r.state.size.index()]),
            Container::Omni(o) => ctx.settings().price(OMNI_PRICES[o.size().index()]),
        }
    }

    pub fn owner(&self) -> Option<ContainerId> {
        self.state().and_then(|s| s.owner)
    }

    pub fn autofill(&self) -> bool {
        match self {
            Container::Omni(o) => o.nested().iter().any(|c| c.autofill()),
            _ => self.state().is_some_and(|s| s.autofill),
        }
    }

    /// Omni bags pass the flag down to every nested bag.
    pub fn set_autofill(&mut self, enabled: bool) {
        match self {
            Container::Omni(o) => o.nested_mut().iter_mut().for_each(|c| c.set_autofill(enabled)),
            _ => {
                if let Some(state) = self.state_mut() {
                    state.autofill = enabled;
                }
            }
        }
    }

    pub fn accepts(&self, item: &ItemDescriptor, ctx: &EngineContext) -> bool {
        match self {
            Container::Bounded(b) => b.accepts(item, ctx),
            Container::Bundle(b) => b.accepts(item, ctx),
            Container::Rucksack(r) => r.accepts(item, ctx),
            Container::Omni(o) => o.nested().iter().any(|c| c.accepts(item, ctx)),
        }
    }

    pub fn room_for(&self, item: &ItemDescriptor, ctx: &EngineContext) -> u32 {
        match self {
            Container::Bounded(b) => b.room_for(item, ctx),
            Container::Bundle(b) => b.room_for(item, ctx),
            Container::Rucksack(r) => r.room_for(item, ctx),
            Container::Omni(o) => o
                .nested()
                .iter()
                .filter(|c| c.accepts(item, ctx))
                .map(|c| c.room_for(item, ctx))
                .sum(),
        }
    }

    pub fn has_stack_of(&self, item: &ItemDescriptor, ctx: &EngineContext) -> bool {
        match self {
            Container::Bounded(b) => b.has_stack_of(item, ctx),
            Container::Bundle(b) => b.has_stack_of(item, ctx),
            Container::Rucksack(r) => r.has_stack_of(item, ctx),
            Container::Omni(o) => o.nested().iter().any(|c| c.has_stack_of(item, ctx)),
        }
    }

    /// Allocation order among bags: lower goes first.
    pub fn base_rank(&self, item: &ItemDescriptor, ctx: &EngineContext) -> u32 {
        match self {
            Container::Bundle(_) => 0,
            Container::Rucksack(r) => match r.priority {
                AutofillPriority::High => 1,
                AutofillPriority::Low => 4,
            },
            Container::Bounded(b) if b.has_stack_of(item, ctx) => 2,
            Container::Bounded(_) => 3,
            Container::Omni(_) => u32::MAX,
        }
    }

    pub(crate) fn pull_from<L: ItemList + ?Sized>(
        &mut self,
        requests: &[TransferRequest],
        source: &mut L,
        ctx: &EngineContext,
    ) -> Vec<u32> {
        match self {
            Container::Bounded(b) => b.pull_from(requests, source, ctx),
            Container::Bundle(b) => b.pull_from(requests, source, ctx),
            Container::Rucksack(r) => r.pull_from(requests, source, ctx),
            Container::Omni(o) => o.pull_from(requests, source, ctx),
        }
    }

    pub(crate) fn after_change(&mut self, ctx: &EngineContext) {
        match self {
            Container::Bounded(b) => b.after_change(ctx),
            Container::Bundle(b) => b.after_change(ctx),
            Container::Rucksack(r) => r.after_change(ctx),
            Container::Omni(o) => o.nested_mut().iter_mut().for_each(|c| c.after_change(ctx)),
        }
    }

    pub fn move_into<L: ItemList + ?Sized, O: ContentsObserver + ?Sized>(
        &mut self,
        requests: &[TransferRequest],
        source: &mut L,
        ctx: &EngineContext,
        observer: &mut O,
    ) -> Result<u32, TransferError> {
        check_indices(requests, source.len())?;
        if let Container::Omni(o) = self {
            let (moved, touched) = o.pull_tracked(requests, source, ctx);
            source.compact();
            for index in touched {
                if let Some(bag) = o.nested_mut().get_mut(index) {
                    bag.after_change(ctx);
                    observer.contents_changed(bag.id());
                }
            }
            return Ok(moved.into_iter().sum());
        }
        let moved: u32 = self.pull_from(requests, source, ctx).into_iter().sum();
        source.compact();
        if moved > 0 {
            self.after_change(ctx);
            observer.contents_changed(self.id());
        }
        Ok(moved)
    }

    pub fn move_out_of<L: ItemList + ?Sized, O: ContentsObserver + ?Sized>(
        &mut self,
        requests: &[TransferRequest],
        target: &mut L,
        target_capacity: usize,
        ctx: &EngineContext,
        observer: &mut O,
    ) -> Result<u32, TransferError> {
        match self {
            Container::Bounded(b) => b.move_out_of(requests, target, target_capacity, ctx, observer),
            Container::Bundle(b) => b.move_out_of(requests, target, target_capacity, ctx, observer),
            Container::Rucksack(r) => r.move_out_of(requests, target, target_capacity, ctx, observer),
            Container::Omni(_) => Err(TransferError::OmniHoldsNoItems),
        }
    }

    /// Grows the bag to `size`, keeping its contents.
    pub fn upgrade(&mut self, size: ContainerSizeTier, ctx: &EngineContext) -> Result<(), UpgradeError> {
        let from = self.size();
        if size <= from {
            return Err(UpgradeError::NotAnUpgrade { from, to: size });
        }
        if let Container::Bounded(b) = self {
            if !ctx.catalog().get(&b.type_id()).is_some_and(|t| t.supports(size)) {
                return Err(UpgradeError::UnsupportedSize(size));
            }
        }
        match self {
            Container::Omni(o) => o.set_size(size),
            _ => {
                if let Some(state) = self.state_mut() {
                    state.size = size;
                }
            }
        }
        debug!("{}: upgraded from {from} to {size}", self.id());
        Ok(())
    }
}

impl ItemContainer for Container {
    /// Omni bags hold no items of their own.
    fn content(&self) -> &[ItemDescriptor] {
        self.state().map_or(&[], |s| &s.contents)
    }
}

impl From<BoundedBag> for Container {
    fn from(value: BoundedBag) -> Self {
        Container::Bounded(value)
    }
}

impl From<BundleBag> for Container {
    fn from(value: BundleBag) -> Self {
        Container::Bundle(value)
    }
}

impl From<Rucksack> for Container {
    fn from(value: Rucksack) -> Self {
        Container::Rucksack(value)
    }
}

impl From<OmniBag> for Container {
    fn from(value: OmniBag) -> Self {
        Container::Omni(value)
    }
}
