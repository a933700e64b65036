use crate::{
    bundles::{BundleNeed, Objective},
    catalog::type_id,
    consts::COPPER_ORE,
    container::{BoundedBag, BundleBag, Container, OmniBag, Rucksack},
    context::EngineContext,
    item::{ItemDescriptor, ItemId, QualityTier},
    size::ContainerSizeTier,
};

pub fn id(code: &str) -> ItemId {
    ItemId::try_new(code).unwrap()
}

pub fn item(code: &str, quantity: u32) -> ItemDescriptor {
    ItemDescriptor::new(id(code), quantity)
}

/// Built-in content plus a "Blacksmith" objective wanting 20 copper ore.
pub fn ctx() -> EngineContext {
    let mut ctx = EngineContext::builtin();
    ctx.objectives_mut().add(Objective {
        name: "Blacksmith".to_owned(),
        needs: vec![BundleNeed {
            id: id(COPPER_ORE),
            crafted: false,
            min_quality: QualityTier::Regular,
            quantity: 20,
        }],
        completed: false,
    });
    ctx
}

pub fn bounded(ctx: &EngineContext, name: &str, size: ContainerSizeTier) -> Container {
    assert!(ctx.catalog().by_name(name).is_some(), "unknown bag type {name}");
    BoundedBag::new(type_id(name), size).into()
}

pub fn bundle(ctx: &EngineContext, size: ContainerSizeTier) -> Container {
    BundleBag::new(size, ctx.objectives()).into()
}

pub fn rucksack(size: ContainerSizeTier) -> Container {
    Rucksack::new(size).into()
}

pub fn omni(size: ContainerSizeTier, nested: Vec<Container>) -> Container {
    let mut omni = OmniBag::new(size);
    for container in nested {
        omni.insert(container).unwrap();
    }
    omni.into()
}
