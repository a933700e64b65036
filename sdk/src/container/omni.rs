use super::{Container, ContainerId, ContainerKind};
use crate::{
    context::EngineContext, list::ItemList, size::ContainerSizeTier, transfer::TransferRequest,
};
use itertools::Itertools;
use log::debug;
use thiserror::Error;

/// Bag holding other bags, at most one of each kind, none bigger than itself.
#[derive(Debug, Clone, PartialEq)]
pub struct OmniBag {
    id: ContainerId,
    size: ContainerSizeTier,
    nested: Vec<Container>,
}

/// Refused insertions hand the bag back.
#[derive(Debug, Error, PartialEq)]
pub enum OmniError {
    #[error("omni bags cannot hold other omni bags")]
    NestedOmni(Box<Container>),
    #[error("the omni bag already holds a bag of this kind")]
    DuplicateKind(Box<Container>),
    #[error("the bag is bigger than the omni bag")]
    TooBig(Box<Container>),
}

impl OmniError {
    pub fn into_container(self) -> Container {
        match self {
            OmniError::NestedOmni(c) | OmniError::DuplicateKind(c) | OmniError::TooBig(c) => *c,
        }
    }
}

impl OmniBag {
    pub fn new(size: ContainerSizeTier) -> Self {
        Self {
            id: ContainerId::new(),
            size,
            nested: vec![],
        }
    }

    pub(crate) fn with_id(mut self, id: ContainerId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn size(&self) -> ContainerSizeTier {
        self.size
    }

    pub(crate) fn set_size(&mut self, size: ContainerSizeTier) {
        self.size = size;
    }

    pub fn nested(&self) -> &[Container] {
        &self.nested
    }

    pub fn nested_mut(&mut self) -> &mut [Container] {
        &mut self.nested
    }

    pub fn get(&self, kind: ContainerKind) -> Option<&Container> {
        self.nested.iter().find(|c| c.kind() == kind)
    }

    pub fn insert(&mut self, mut container: Container) -> Result<(), OmniError> {
        if matches!(container, Container::Omni(_)) {
            return Err(OmniError::NestedOmni(Box::new(container)));
        }
        if self.get(container.kind()).is_some() {
            return Err(OmniError::DuplicateKind(Box::new(container)));
        }
        if container.size() > self.size {
            return Err(OmniError::TooBig(Box::new(container)));
        }
        if let Some(state) = container.state_mut() {
            state.owner = Some(self.id);
        }
        debug!("{}: now holds {}", self.id, container.id());
        self.nested.push(container);
        Ok(())
    }

    pub fn remove(&mut self, kind: ContainerKind) -> Option<Container> {
        let index = self.nested.iter().position(|c| c.kind() == kind)?;
        let mut container = self.nested.remove(index);
        if let Some(state) = container.state_mut() {
            state.owner = None;
        }
        debug!("{}: released {}", self.id, container.id());
        Some(container)
    }

    /// Hands each request to the nested bags, best ranked first, until it is
    /// fully placed.
    pub(crate) fn pull_from<L: ItemList + ?Sized>(
        &mut self,
        requests: &[TransferRequest],
        source: &mut L,
        ctx: &EngineContext,
    ) -> Vec<u32> {
        self.pull_tracked(requests, source, ctx).0
    }

    /// Same as `pull_from`, also returning the indices of the nested bags
    /// that took something, in the order they first did.
    pub(crate) fn pull_tracked<L: ItemList + ?Sized>(
        &mut self,
        requests: &[TransferRequest],
        source: &mut L,
        ctx: &EngineContext,
    ) -> (Vec<u32>, Vec<usize>) {
        let mut touched = vec![];
        let moved = requests
            .iter()
            .map(|request| {
                let Some(item) = source.get(request.index).cloned() else {
                    return 0;
                };
                let order = self
                    .nested
                    .iter()
                    .enumerate()
                    .sorted_by_key(|(_, c)| c.base_rank(&item, ctx))
                    .map(|(i, _)| i)
                    .collect_vec();
                let mut remaining = request.quantity.min(item.quantity);
                for index in order {
                    if remaining == 0 {
                        break;
                    }
                    let single = [TransferRequest::new(request.index, remaining)];
                    let moved = self.nested[index].pull_from(&single, source, ctx)[0];
                    if moved > 0 && !touched.contains(&index) {
                        touched.push(index);
                    }
                    remaining -= moved;
                }
                request.quantity.min(item.quantity) - remaining
            })
            .collect_vec();
        (moved, touched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::type_id,
        consts::*,
        container::{ItemContainer, Transferable},
        list::Inventory,
        test_utils::{bounded, bundle, ctx, id, item, rucksack},
    };

    #[test]
    fn one_bag_per_kind() {
        let ctx = ctx();
        let mut omni = OmniBag::new(ContainerSizeTier::Large);
        omni.insert(bounded(&ctx, "Gem Bag", ContainerSizeTier::Small)).unwrap();
        omni.insert(bounded(&ctx, "Mining Bag", ContainerSizeTier::Large)).unwrap();
        omni.insert(rucksack(ContainerSizeTier::Medium)).unwrap();
        let duplicate = omni.insert(bounded(&ctx, "Gem Bag", ContainerSizeTier::Medium));
        let Err(OmniError::DuplicateKind(bag)) = duplicate else {
            panic!("duplicate kind accepted");
        };
        assert_eq!(bag.size(), ContainerSizeTier::Medium);
        assert_eq!(omni.nested().len(), 3);
    }

    #[test]
    fn bigger_bags_and_omni_bags_are_refused() {
        let ctx = ctx();
        let mut omni = OmniBag::new(ContainerSizeTier::Small);
        let too_big = omni
            .insert(bundle(&ctx, ContainerSizeTier::Medium))
            .unwrap_err();
        assert!(matches!(too_big, OmniError::TooBig(_)));
        assert_eq!(too_big.into_container().kind(), ContainerKind::Bundle);
        let nested_omni = omni
            .insert(OmniBag::new(ContainerSizeTier::Small).into())
            .unwrap_err();
        assert!(matches!(nested_omni, OmniError::NestedOmni(_)));
        assert!(omni.nested().is_empty());
    }

    #[test]
    fn nested_bags_know_their_owner() {
        let ctx = ctx();
        let mut omni = OmniBag::new(ContainerSizeTier::Small);
        omni.insert(bounded(&ctx, "Gem Bag", ContainerSizeTier::Small)).unwrap();
        let kind = ContainerKind::Bounded(type_id("Gem Bag"));
        assert_eq!(omni.get(kind).unwrap().owner(), Some(omni.id()));
        let removed = omni.remove(kind).unwrap();
        assert_eq!(removed.owner(), None);
        assert!(omni.remove(kind).is_none());
    }

    #[test]
    fn move_into_forwards_by_rank() {
        let ctx = ctx();
        let mining = bounded(&ctx, "Mining Bag", ContainerSizeTier::Small);
        let gems = bounded(&ctx, "Gem Bag", ContainerSizeTier::Small);
        let sack = bundle(&ctx, ContainerSizeTier::Small);
        let (mining_id, sack_id) = (mining.id(), sack.id());
        let mut omni = OmniBag::new(ContainerSizeTier::Small);
        omni.insert(mining).unwrap();
        omni.insert(gems).unwrap();
        omni.insert(sack).unwrap();
        let mut omni = Container::from(omni);
        let mut inventory = Inventory::with_items(2, vec![item(COPPER_ORE, 64)]);
        let mut seen: Vec<ContainerId> = vec![];
        let moved = omni
            .move_into(&[TransferRequest::new(0, 64)], &mut inventory, &ctx, &mut seen)
            .unwrap();
        assert_eq!(moved, 50);
        assert_eq!(inventory.total_of(&id(COPPER_ORE)), 14);
        assert_eq!(seen, vec![sack_id, mining_id]);
        let Container::Omni(omni) = omni else {
            unreachable!()
        };
        let Some(Container::Bundle(bundle)) = omni.get(ContainerKind::Bundle) else {
            panic!("bundle bag missing");
        };
        assert_eq!(bundle.total_of(&id(COPPER_ORE)), 20);
        assert!(bundle.has_stack_of(&item(COPPER_ORE, 1), &ctx));
    }
}
