use super::{
    BagState, ContainerId, Eligibility, ItemContainer, LimitedContainer, SpaceLimited,
    Transferable,
};
use crate::{
    catalog::BagTypeDefinition,
    context::EngineContext,
    item::{Equivalence, ItemDescriptor},
    rule::Probe,
    size::ContainerSizeTier,
};
use uuid::Uuid;

/// Bag of a catalog type: one stack per eligible item, each capped by the
/// type's capacity at the bag's size.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedBag {
    pub state: BagState,
    type_id: Uuid,
}

impl BoundedBag {
    pub fn new(type_id: Uuid, size: ContainerSizeTier) -> Self {
        Self {
            state: BagState::new(size),
            type_id,
        }
    }

    pub fn type_id(&self) -> Uuid {
        self.type_id
    }

    pub fn definition<'a>(&self, ctx: &'a EngineContext) -> Option<&'a BagTypeDefinition> {
        ctx.catalog().get(&self.type_id)
    }

    pub fn name(&self, ctx: &EngineContext) -> String {
        self.definition(ctx).map_or_else(
            || format!("{} Unknown Bag", self.state.size.label()),
            |t| t.display_name(self.state.size),
        )
    }

    pub fn price(&self, ctx: &EngineContext) -> i32 {
        self.definition(ctx)
            .and_then(|t| t.size(self.state.size))
            .map_or(0, |c| ctx.settings().price(c.price))
    }
}

impl ItemContainer for BoundedBag {
    fn content(&self) -> &[ItemDescriptor] {
        &self.state.contents
    }
}

impl Eligibility for BoundedBag {
    fn accepts(&self, item: &ItemDescriptor, ctx: &EngineContext) -> bool {
        let Some(definition) = self.definition(ctx) else {
            return false;
        };
        let info = ctx.items().info(item);
        info.as_ref().is_none_or(|i| i.is_stackable())
            && definition.accepts(&Probe::new(item, self.state.size, info.as_deref()))
    }
}

impl LimitedContainer for BoundedBag {
    fn room_for(&self, item: &ItemDescriptor, ctx: &EngineContext) -> u32 {
        let stored = self
            .state
            .stack_of(item, self.equivalence(ctx))
            .map_or(0, |s| s.quantity);
        self.stack_limit(item, ctx).saturating_sub(stored)
    }
}

impl SpaceLimited for BoundedBag {
    fn stack_limit(&self, _item: &ItemDescriptor, ctx: &EngineContext) -> u32 {
        let multiplier = self
            .definition(ctx)
            .and_then(|t| t.size(self.state.size))
            .map_or(1.0, |c| c.capacity_multiplier);
        ctx.settings().bounded_capacity(self.state.size, multiplier)
    }
}

impl Transferable for BoundedBag {
    fn id(&self) -> ContainerId {
        self.state.id
    }

    fn equivalence(&self, ctx: &EngineContext) -> Equivalence {
        self.definition(ctx)
            .map_or(Equivalence::ByQuality, |t| t.equivalence)
    }

    fn content_mut(&mut self) -> &mut Vec<ItemDescriptor> {
        &mut self.state.contents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::type_id,
        consts::*,
        item::QualityTier,
        list::{Inventory, ItemList},
        test_utils::{ctx, id, item},
        transfer::TransferRequest,
    };

    #[test]
    fn stack_limit_follows_size_and_settings() {
        let mut ctx = ctx();
        let bag = BoundedBag::new(type_id("Mining Bag"), ContainerSizeTier::Medium);
        assert_eq!(bag.stack_limit(&item(COPPER_ORE, 1), &ctx), 99);
        ctx.settings_mut().capacity_multiplier = 3.0;
        assert_eq!(bag.stack_limit(&item(COPPER_ORE, 1), &ctx), 297);
    }

    #[test]
    fn qualities_get_their_own_stack() {
        let ctx = ctx();
        let mut bag = BoundedBag::new(type_id("Forage Bag"), ContainerSizeTier::Medium);
        let mut inventory = Inventory::with_items(
            3,
            vec![
                item(LEEK, 60),
                item(LEEK, 60).with_quality(QualityTier::Gold),
            ],
        );
        let requests = [TransferRequest::new(0, 60), TransferRequest::new(1, 60)];
        assert_eq!(bag.move_into(&requests, &mut inventory, &ctx, &mut ()), Ok(120));
        assert_eq!(bag.content().len(), 2);
        assert_eq!(bag.room_for(&item(LEEK, 1), &ctx), 39);
    }

    #[test]
    fn quality_blind_types_share_one_stack() {
        let ctx = ctx();
        let mut bag = BoundedBag::new(type_id("Resource Bag"), ContainerSizeTier::Small);
        let mut inventory = Inventory::with_items(
            3,
            vec![item(WOOD, 20), item(WOOD, 20).with_quality(QualityTier::Silver)],
        );
        let requests = [TransferRequest::new(0, 20), TransferRequest::new(1, 20)];
        assert_eq!(bag.move_into(&requests, &mut inventory, &ctx, &mut ()), Ok(30));
        assert_eq!(bag.content(), &[item(WOOD, 30)]);
        assert_eq!(inventory.total_of(&id(WOOD)), 10);
    }

    #[test]
    fn unknown_types_accept_nothing() {
        let ctx = ctx();
        let bag = BoundedBag::new(Uuid::new_v4(), ContainerSizeTier::Small);
        assert!(!bag.accepts(&item(COPPER_ORE, 1), &ctx));
        assert_eq!(bag.name(&ctx), "Small Unknown Bag");
        assert_eq!(bag.price(&ctx), 0);
    }

    #[test]
    fn price_comes_from_the_catalog() {
        let mut ctx = ctx();
        let bag = BoundedBag::new(type_id("Gem Bag"), ContainerSizeTier::Large);
        assert_eq!(bag.price(&ctx), BAG_PRICES[2]);
        ctx.settings_mut().price_multiplier = 0.5;
        assert_eq!(bag.price(&ctx), BAG_PRICES[2] / 2);
    }
}
