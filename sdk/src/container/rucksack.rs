use super::{
    BagState, ContainerId, Eligibility, ItemContainer, LimitedContainer, SlotLimited,
    SpaceLimited, Transferable,
};
use crate::{
    context::EngineContext,
    item::{Equivalence, ItemDescriptor},
    size::ContainerSizeTier,
};
use log::debug;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum AutofillPriority {
    Low,
    #[default]
    High,
}

#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SortProperty {
    Id,
    #[default]
    Name,
    Category,
    Quantity,
    Quality,
    SingleValue,
    StackValue,
}

#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// General purpose bag: a few slots holding any stackable item.
#[derive(Debug, Clone, PartialEq)]
pub struct Rucksack {
    pub state: BagState,
    pub priority: AutofillPriority,
    pub sort: SortProperty,
    pub order: SortOrder,
}

impl Rucksack {
    pub fn new(size: ContainerSizeTier) -> Self {
        Self {
            state: BagState::new(size),
            priority: AutofillPriority::default(),
            sort: SortProperty::default(),
            order: SortOrder::default(),
        }
    }

    pub fn with_priority(mut self, priority: AutofillPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn sort(&mut self, ctx: &EngineContext) {
        let items = ctx.items();
        let property = self.sort;
        let compare = |a: &ItemDescriptor, b: &ItemDescriptor| -> Ordering {
            match property {
                SortProperty::Id => a.id.cmp(&b.id),
                SortProperty::Name => items.name_of(a).cmp(&items.name_of(b)),
                SortProperty::Category => {
                    let category = |i: &ItemDescriptor| items.info(i).map_or(0, |i| i.category);
                    category(a).cmp(&category(b))
                }
                SortProperty::Quantity => a.quantity.cmp(&b.quantity),
                SortProperty::Quality => a.quality.cmp(&b.quality),
                SortProperty::SingleValue => {
                    OrderedFloat(a.unit_value()).cmp(&OrderedFloat(b.unit_value()))
                }
                SortProperty::StackValue => {
                    OrderedFloat(a.stack_value()).cmp(&OrderedFloat(b.stack_value()))
                }
            }
        };
        let descending = self.order == SortOrder::Descending;
        self.state.contents.sort_by(|a, b| {
            let ordering = compare(a, b);
            let ordering = if descending { ordering.reverse() } else { ordering };
            ordering
                .then_with(|| a.id.cmp(&b.id))
                .then_with(|| a.quality.cmp(&b.quality))
        });
        debug!("{}: sorted by {} ({})", self.state.id, self.sort, self.order);
    }
}

impl ItemContainer for Rucksack {
    fn content(&self) -> &[ItemDescriptor] {
        &self.state.contents
    }
}

impl Eligibility for Rucksack {
    fn accepts(&self, item: &ItemDescriptor, ctx: &EngineContext) -> bool {
        ctx.items().is_stackable(item)
    }
}

impl LimitedContainer for Rucksack {
    fn room_for(&self, item: &ItemDescriptor, ctx: &EngineContext) -> u32 {
        let limit = self.stack_limit(item, ctx);
        match self.state.stack_of(item, Equivalence::ByQuality) {
            Some(stack) => limit.saturating_sub(stack.quantity),
            None if self.free_slots(ctx) > 0 => limit,
            None => 0,
        }
    }
}

impl SlotLimited for Rucksack {
    fn slots(&self, ctx: &EngineContext) -> usize {
        ctx.settings().rucksack_slots(self.state.size)
    }
}

impl SpaceLimited for Rucksack {
    fn stack_limit(&self, _item: &ItemDescriptor, ctx: &EngineContext) -> u32 {
        ctx.settings().rucksack_capacity(self.state.size)
    }
}

impl Transferable for Rucksack {
    fn id(&self) -> ContainerId {
        self.state.id
    }

    fn equivalence(&self, _ctx: &EngineContext) -> Equivalence {
        Equivalence::ByQuality
    }

    fn content_mut(&mut self) -> &mut Vec<ItemDescriptor> {
        &mut self.state.contents
    }

    fn after_change(&mut self, ctx: &EngineContext) {
        self.sort(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        consts::*,
        item::QualityTier,
        list::{ItemList, ItemPile},
        test_utils::{ctx, id, item},
        transfer::TransferRequest,
    };

    #[test]
    fn slots_limit_distinct_stacks() {
        let ctx = ctx();
        let mut rucksack = Rucksack::new(ContainerSizeTier::Small);
        let codes = [COPPER_ORE, IRON_ORE, GOLD_ORE, COAL, STONE, WOOD, CLAY];
        let mut pile = ItemPile::with_items(7, codes.iter().map(|c| item(c, 5)).collect());
        let requests = (0..7).map(|i| TransferRequest::new(i, 5)).collect::<Vec<_>>();
        assert_eq!(rucksack.move_into(&requests, &mut pile, &ctx, &mut ()), Ok(30));
        assert_eq!(rucksack.free_slots(&ctx), 0);
        assert_eq!(pile.total_of(&id(CLAY)), 5);
        assert_eq!(rucksack.room_for(&item(CLAY, 1), &ctx), 0);
        assert_eq!(rucksack.room_for(&item(STONE, 1), &ctx), 25);
        assert_eq!(
            rucksack.room_for(&item(STONE, 1).with_quality(QualityTier::Gold), &ctx),
            0
        );
    }

    #[test]
    fn contents_are_sorted_after_changes() {
        let ctx = ctx();
        let mut rucksack = Rucksack::new(ContainerSizeTier::Small);
        let mut pile = ItemPile::with_items(
            3,
            vec![item(STONE, 1), item(COPPER_ORE, 9), item(WOOD, 4)],
        );
        let requests = [
            TransferRequest::new(0, 1),
            TransferRequest::new(1, 9),
            TransferRequest::new(2, 4),
        ];
        rucksack.move_into(&requests, &mut pile, &ctx, &mut ()).unwrap();
        let names = |r: &Rucksack| {
            r.content()
                .iter()
                .map(|i| ctx.items().name_of(i))
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&rucksack), vec!["Copper Ore", "Stone", "Wood"]);

        rucksack.sort = SortProperty::Quantity;
        rucksack.order = SortOrder::Descending;
        rucksack.after_change(&ctx);
        assert_eq!(names(&rucksack), vec!["Copper Ore", "Wood", "Stone"]);
    }

    #[test]
    fn value_sort_accounts_for_quality() {
        let ctx = ctx();
        let mut rucksack = Rucksack::new(ContainerSizeTier::Small);
        rucksack.sort = SortProperty::SingleValue;
        rucksack.state.contents = vec![
            item(COPPER_ORE, 1).with_price(5).with_quality(QualityTier::Iridium),
            item(IRON_ORE, 1).with_price(8),
        ];
        rucksack.sort(&ctx);
        assert_eq!(rucksack.content()[0].id, id(IRON_ORE));
    }
}
