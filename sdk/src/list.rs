use crate::item::{Equivalence, ItemDescriptor, ItemId};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// An item list living outside of bags: the player inventory, a chest, a
/// shop stock.
///
/// Entries emptied by a transfer keep their index until [`ItemList::compact`]
/// is called, so a batch of requests can refer to indices taken before it
/// started.
pub trait ItemList {
    /// Number of addressable entries, empty slots included.
    fn len(&self) -> usize;
    /// Maximum number of distinct stacks the list holds.
    fn capacity(&self) -> usize;
    fn get(&self, index: usize) -> Option<&ItemDescriptor>;
    fn get_mut(&mut self, index: usize) -> Option<&mut ItemDescriptor>;
    /// Puts a new stack into the first free place, handing it back when the
    /// list is full.
    fn insert(&mut self, item: ItemDescriptor) -> Result<usize, ItemDescriptor>;
    /// Drops the entries whose quantity reached zero.
    fn compact(&mut self);

    fn occupied(&self) -> usize {
        (0..self.len()).filter(|i| self.get(*i).is_some()).count()
    }

    fn is_empty(&self) -> bool {
        self.occupied() == 0
    }

    fn is_full(&self) -> bool {
        self.occupied() >= self.capacity()
    }

    fn items(&self) -> Vec<&ItemDescriptor> {
        (0..self.len()).filter_map(|i| self.get(i)).collect_vec()
    }

    fn total_of(&self, id: &ItemId) -> u32 {
        self.items()
            .iter()
            .filter(|i| i.id == *id)
            .map(|i| i.quantity)
            .sum()
    }

    /// Removes up to `quantity` units from an entry and returns them.
    fn take(&mut self, index: usize, quantity: u32) -> Option<ItemDescriptor> {
        let entry = self.get_mut(index)?;
        let taken = quantity.min(entry.quantity);
        entry.quantity -= taken;
        Some(entry.with_quantity(taken))
    }

    /// Adds `item` by topping up equivalent stacks first, then opening at
    /// most `stack_budget` new stacks. Returns the quantity added.
    fn deposit(&mut self, item: &ItemDescriptor, max_stack: u32, stack_budget: usize) -> u32 {
        let max_stack = max_stack.max(1);
        let mut remaining = item.quantity;
        for index in 0..self.len() {
            if remaining == 0 {
                break;
            }
            let Some(entry) = self.get_mut(index) else {
                continue;
            };
            if entry.quantity >= max_stack || !entry.is_equivalent(item, Equivalence::ByQuality) {
                continue;
            }
            let added = remaining.min(max_stack - entry.quantity);
            entry.quantity += added;
            remaining -= added;
        }
        let mut opened = 0;
        while remaining > 0 && opened < stack_budget {
            let added = remaining.min(max_stack);
            if self.insert(item.with_quantity(added)).is_err() {
                break;
            }
            remaining -= added;
            opened += 1;
        }
        item.quantity - remaining
    }
}

/// Fixed number of slots; emptied slots become holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<ItemDescriptor>>,
}

impl Inventory {
    pub fn new(slots: usize) -> Self {
        Self {
            slots: vec![None; slots],
        }
    }

    pub fn with_items(slots: usize, items: Vec<ItemDescriptor>) -> Self {
        let mut inventory = Self::new(slots.max(items.len()));
        for (slot, item) in inventory.slots.iter_mut().zip(items) {
            *slot = Some(item);
        }
        inventory
    }

    pub fn slots(&self) -> &[Option<ItemDescriptor>] {
        &self.slots
    }

    /// Grows the inventory, as when the player buys a backpack upgrade.
    pub fn resize(&mut self, slots: usize) {
        if slots > self.slots.len() {
            self.slots.resize(slots, None);
        }
    }
}

impl ItemList for Inventory {
    fn len(&self) -> usize {
        self.slots.len()
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn get(&self, index: usize) -> Option<&ItemDescriptor> {
        self.slots.get(index)?.as_ref()
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut ItemDescriptor> {
        self.slots.get_mut(index)?.as_mut()
    }

    fn insert(&mut self, item: ItemDescriptor) -> Result<usize, ItemDescriptor> {
        let Some(index) = self.slots.iter().position(Option::is_none) else {
            return Err(item);
        };
        self.slots[index] = Some(item);
        Ok(index)
    }

    fn compact(&mut self) {
        for slot in self.slots.iter_mut() {
            if slot.as_ref().is_some_and(|i| i.quantity == 0) {
                *slot = None;
            }
        }
    }
}

/// Loose list of stacks; emptied entries are removed and later entries shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPile {
    items: Vec<ItemDescriptor>,
    capacity: usize,
}

impl ItemPile {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: vec![],
            capacity,
        }
    }

    pub fn with_items(capacity: usize, items: Vec<ItemDescriptor>) -> Self {
        Self {
            capacity: capacity.max(items.len()),
            items,
        }
    }

    pub fn into_items(self) -> Vec<ItemDescriptor> {
        self.items
    }
}

impl ItemList for ItemPile {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn get(&self, index: usize) -> Option<&ItemDescriptor> {
        self.items.get(index)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut ItemDescriptor> {
        self.items.get_mut(index)
    }

    fn insert(&mut self, item: ItemDescriptor) -> Result<usize, ItemDescriptor> {
        if self.items.len() >= self.capacity {
            return Err(item);
        }
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    fn compact(&mut self) {
        self.items.retain(|i| i.quantity > 0);
    }
}
