//! Routes newly acquired items into the best bags the player carries.
//!
//! Candidates are ranked Bundle, high priority Rucksack, bag already holding
//! the item, bag that would open a new stack, low priority Rucksack. Bags
//! held by an omni bag come after every top level bag. Equal ranks keep the
//! order in which the bags were found.

use crate::{
    consts::NESTED_PENALTY,
    container::{Container, ContainerId},
    context::EngineContext,
    item::ItemDescriptor,
    list::ItemList,
    transfer::{ContentsObserver, TransferError, TransferRequest},
};
use itertools::Itertools;
use log::{debug, info};
use std::{
    cell::Cell,
    fmt::{self, Display, Formatter},
    str::FromStr,
};
use thiserror::Error;

/// One bag receiving part of an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub container: ContainerId,
    pub container_name: String,
    pub item_name: String,
    pub moved: u32,
}

impl Display for Placement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Moved {} {} to {}",
            self.moved, self.item_name, self.container_name
        )
    }
}

/// Where a candidate bag sits in the player's bag list.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BagPath {
    Top(usize),
    Nested(usize, usize),
}

impl BagPath {
    pub fn resolve<'a>(&self, bags: &'a [Container]) -> Option<&'a Container> {
        match *self {
            BagPath::Top(i) => bags.get(i),
            BagPath::Nested(i, j) => match bags.get(i)? {
                Container::Omni(omni) => omni.nested().get(j),
                _ => None,
            },
        }
    }

    pub fn resolve_mut<'a>(&self, bags: &'a mut [Container]) -> Option<&'a mut Container> {
        match *self {
            BagPath::Top(i) => bags.get_mut(i),
            BagPath::Nested(i, j) => match bags.get_mut(i)? {
                Container::Omni(omni) => omni.nested_mut().get_mut(j),
                _ => None,
            },
        }
    }

    pub fn top(&self) -> usize {
        match *self {
            BagPath::Top(i) | BagPath::Nested(i, _) => i,
        }
    }
}

impl Display for BagPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BagPath::Top(i) => write!(f, "{i}"),
            BagPath::Nested(i, j) => write!(f, "{i}.{j}"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid bag path '{0}', expected `<bag>` or `<omni>.<bag>`")]
pub struct BagPathError(String);

impl FromStr for BagPath {
    type Err = BagPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || BagPathError(s.to_owned());
        match s.trim().split_once('.') {
            None => s.trim().parse().map(BagPath::Top).map_err(|_| error()),
            Some((i, j)) => {
                let i = i.parse().map_err(|_| error())?;
                let j = j.parse().map_err(|_| error())?;
                Ok(BagPath::Nested(i, j))
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct Autofill {
    running: Cell<bool>,
}

/// Holds the running flag for the duration of one pass.
struct PassGuard<'a>(&'a Cell<bool>);

impl<'a> PassGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self(flag))
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl Autofill {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Places up to `request.quantity` units of the entry at `request.index`.
    /// Calls made while a pass is already running do nothing.
    pub fn place<L: ItemList + ?Sized, O: ContentsObserver + ?Sized>(
        &self,
        ctx: &EngineContext,
        bags: &mut [Container],
        source: &mut L,
        request: TransferRequest,
        observer: &mut O,
    ) -> Result<Vec<Placement>, TransferError> {
        let Some(_guard) = PassGuard::acquire(&self.running) else {
            debug!("autofill: pass already running, ignoring request");
            return Ok(vec![]);
        };
        if request.index >= source.len() {
            return Err(TransferError::IndexOutOfRange {
                index: request.index,
                len: source.len(),
            });
        }
        let Some(item) = source.get(request.index).cloned() else {
            return Ok(vec![]);
        };
        let mut remaining = request.quantity.min(item.quantity);
        if remaining == 0 {
            return Ok(vec![]);
        }
        let item_name = ctx.items().name_of(&item);
        let mut placements = vec![];
        for (path, rank) in candidates(ctx, bags, &item) {
            let Some(bag) = path.resolve_mut(bags) else {
                continue;
            };
            let single = [TransferRequest::new(request.index, remaining)];
            let moved = bag.move_into(&single, source, ctx, observer)?;
            if moved == 0 {
                continue;
            }
            remaining -= moved;
            let placement = Placement {
                container: bag.id(),
                container_name: bag.name(ctx),
                item_name: item_name.clone(),
                moved,
            };
            info!("autofill: {placement} (rank {rank})");
            placements.push(placement);
            if remaining == 0 {
                break;
            }
        }
        Ok(placements)
    }

    /// Runs [`Autofill::place`] over every entry of `source`, last entry
    /// first so that compacting lists keep the pending indices valid.
    pub fn place_all<L: ItemList + ?Sized, O: ContentsObserver + ?Sized>(
        &self,
        ctx: &EngineContext,
        bags: &mut [Container],
        source: &mut L,
        observer: &mut O,
    ) -> Result<Vec<Placement>, TransferError> {
        let mut placements = vec![];
        for index in (0..source.len()).rev() {
            let Some(quantity) = source.get(index).map(|i| i.quantity) else {
                continue;
            };
            let request = TransferRequest::new(index, quantity);
            placements.extend(self.place(ctx, bags, source, request, observer)?);
        }
        Ok(placements)
    }
}

/// Rank of a bag for `item` once the autofill gates pass.
fn rank_of(bag: &Container, item: &ItemDescriptor, ctx: &EngineContext) -> Option<u32> {
    if !bag.autofill() || !bag.accepts(item, ctx) || bag.room_for(item, ctx) == 0 {
        return None;
    }
    if bag.state().is_some_and(|s| s.excluded.contains(&item.id)) {
        return None;
    }
    match bag {
        Container::Rucksack(_) if !bag.has_stack_of(item, ctx) => None,
        Container::Omni(_) => None,
        _ => Some(bag.base_rank(item, ctx)),
    }
}

/// Eligible bags in allocation order.
pub fn candidates(
    ctx: &EngineContext,
    bags: &[Container],
    item: &ItemDescriptor,
) -> Vec<(BagPath, u32)> {
    let mut found = vec![];
    for (i, bag) in bags.iter().enumerate() {
        match bag {
            Container::Omni(omni) => {
                if !ctx.settings().include_nested {
                    continue;
                }
                for (j, nested) in omni.nested().iter().enumerate() {
                    if let Some(rank) = rank_of(nested, item, ctx) {
                        found.push((BagPath::Nested(i, j), rank + NESTED_PENALTY));
                    }
                }
            }
            _ => {
                if let Some(rank) = rank_of(bag, item, ctx) {
                    found.push((BagPath::Top(i), rank));
                }
            }
        }
    }
    let found = found.into_iter().sorted_by_key(|(_, rank)| *rank).collect_vec();
    debug!("autofill: {} candidate(s) for {item}", found.len());
    found
}
