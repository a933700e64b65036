use super::{
    BagState, ContainerId, Eligibility, ItemContainer, LimitedContainer, SpaceLimited,
    Transferable,
};
use crate::{
    bundles::{BundleNeed, ObjectiveSource},
    context::EngineContext,
    item::{Equivalence, ItemDescriptor},
    size::ContainerSizeTier,
};
use itertools::Itertools;
use log::debug;
use std::cmp::Reverse;

/// Bag that only takes what incomplete objectives still need.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleBag {
    pub state: BagState,
    needs: Vec<BundleNeed>,
}

impl BundleBag {
    pub fn new(size: ContainerSizeTier, source: &impl ObjectiveSource) -> Self {
        Self {
            state: BagState::new(size),
            needs: source.incomplete_needs(),
        }
    }

    pub fn needs(&self) -> &[BundleNeed] {
        &self.needs
    }

    /// Re-reads the needs, as when an objective got completed.
    pub fn refresh(&mut self, source: &impl ObjectiveSource) {
        self.needs = source.incomplete_needs();
        debug!("{}: {} outstanding need(s)", self.state.id, self.needs.len());
    }

    /// Units set aside for each need. Stricter needs pick first so that a
    /// stored unit never counts twice.
    fn allocated(&self) -> Vec<u32> {
        let mut left = self.state.contents.iter().map(|s| s.quantity).collect_vec();
        let mut allocated = vec![0; self.needs.len()];
        let order = (0..self.needs.len())
            .sorted_by_key(|&i| Reverse(self.needs[i].min_quality))
            .collect_vec();
        for i in order {
            let need = &self.needs[i];
            for (stack, units) in self.state.contents.iter().zip(left.iter_mut()) {
                if !need.is_met_by(stack) {
                    continue;
                }
                let taken = (*units).min(need.quantity - allocated[i]);
                *units -= taken;
                allocated[i] += taken;
            }
        }
        allocated
    }
}

impl ItemContainer for BundleBag {
    fn content(&self) -> &[ItemDescriptor] {
        &self.state.contents
    }
}

impl Eligibility for BundleBag {
    fn accepts(&self, item: &ItemDescriptor, ctx: &EngineContext) -> bool {
        ctx.items().is_stackable(item) && self.needs.iter().any(|n| n.is_met_by(item))
    }
}

impl LimitedContainer for BundleBag {
    fn room_for(&self, item: &ItemDescriptor, _ctx: &EngineContext) -> u32 {
        self.needs
            .iter()
            .zip(self.allocated())
            .filter(|(n, _)| n.is_met_by(item))
            .map(|(n, stored)| n.quantity - stored)
            .sum()
    }
}

impl SpaceLimited for BundleBag {
    fn stack_limit(&self, item: &ItemDescriptor, _ctx: &EngineContext) -> u32 {
        self.needs
            .iter()
            .filter(|n| n.is_met_by(item))
            .map(|n| n.quantity)
            .sum()
    }
}

impl Transferable for BundleBag {
    fn id(&self) -> ContainerId {
        self.state.id
    }

    fn equivalence(&self, _ctx: &EngineContext) -> Equivalence {
        Equivalence::ByQuality
    }

    fn content_mut(&mut self) -> &mut Vec<ItemDescriptor> {
        &mut self.state.contents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bundles::{Objective, Objectives},
        consts::*,
        item::QualityTier,
        list::ItemPile,
        test_utils::{ctx, id, item},
        transfer::TransferRequest,
    };

    fn gold_ore_objective() -> Objectives {
        Objectives::new(vec![Objective {
            name: "Quality Ore".to_owned(),
            needs: vec![BundleNeed {
                id: id(COPPER_ORE),
                crafted: false,
                min_quality: QualityTier::Gold,
                quantity: 5,
            }],
            completed: false,
        }])
    }

    #[test]
    fn room_is_the_outstanding_need() {
        let ctx = ctx();
        let mut bag = BundleBag::new(ContainerSizeTier::Small, ctx.objectives());
        assert_eq!(bag.room_for(&item(COPPER_ORE, 1), &ctx), 20);
        let mut pile = ItemPile::with_items(1, vec![item(COPPER_ORE, 64)]);
        assert_eq!(
            bag.move_into(&[TransferRequest::new(0, 64)], &mut pile, &ctx, &mut ()),
            Ok(20)
        );
        assert_eq!(bag.room_for(&item(COPPER_ORE, 1), &ctx), 0);
        assert!(!bag.accepts(&item(STONE, 1), &ctx));
    }

    #[test]
    fn quality_floor_applies() {
        let ctx = ctx();
        let bag = BundleBag::new(ContainerSizeTier::Small, &gold_ore_objective());
        assert!(!bag.accepts(&item(COPPER_ORE, 1), &ctx));
        let iridium = item(COPPER_ORE, 1).with_quality(QualityTier::Iridium);
        assert!(bag.accepts(&iridium, &ctx));
        assert_eq!(bag.room_for(&iridium, &ctx), 5);
    }

    #[test]
    fn overlapping_needs_count_each_unit_once() {
        let ctx = ctx();
        let needs = Objectives::new(vec![Objective {
            name: "Ore Collector".to_owned(),
            needs: vec![
                BundleNeed {
                    id: id(COPPER_ORE),
                    crafted: false,
                    min_quality: QualityTier::Regular,
                    quantity: 5,
                },
                BundleNeed {
                    id: id(COPPER_ORE),
                    crafted: false,
                    min_quality: QualityTier::Gold,
                    quantity: 5,
                },
            ],
            completed: false,
        }]);
        let mut bag = BundleBag::new(ContainerSizeTier::Small, &needs);
        let gold = item(COPPER_ORE, 5).with_quality(QualityTier::Gold);
        let mut pile = ItemPile::with_items(1, vec![gold.clone()]);
        assert_eq!(
            bag.move_into(&[TransferRequest::new(0, 5)], &mut pile, &ctx, &mut ()),
            Ok(5)
        );
        assert_eq!(bag.room_for(&item(COPPER_ORE, 1), &ctx), 5);
        assert_eq!(bag.room_for(&gold, &ctx), 5);
        let mut pile = ItemPile::with_items(1, vec![item(COPPER_ORE, 8)]);
        assert_eq!(
            bag.move_into(&[TransferRequest::new(0, 8)], &mut pile, &ctx, &mut ()),
            Ok(5)
        );
        assert_eq!(bag.room_for(&item(COPPER_ORE, 1), &ctx), 0);
        assert_eq!(bag.room_for(&gold, &ctx), 0);
    }

    #[test]
    fn refresh_drops_completed_needs() {
        let ctx = ctx();
        let mut objectives = gold_ore_objective();
        let mut bag = BundleBag::new(ContainerSizeTier::Small, &objectives);
        assert_eq!(bag.needs().len(), 1);
        objectives.complete("Quality Ore");
        bag.refresh(&objectives);
        assert!(bag.needs().is_empty());
        let gold = item(COPPER_ORE, 1).with_quality(QualityTier::Gold);
        assert!(!bag.accepts(&gold, &ctx));
    }
}
