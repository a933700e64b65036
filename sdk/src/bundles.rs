use crate::item::{ItemDescriptor, ItemId, QualityTier};
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

/// One item requirement of an objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleNeed {
    pub id: ItemId,
    #[serde(default)]
    pub crafted: bool,
    #[serde(default)]
    pub min_quality: QualityTier,
    pub quantity: u32,
}

impl BundleNeed {
    pub fn is_met_by(&self, item: &ItemDescriptor) -> bool {
        self.id == item.id && self.crafted == item.crafted && item.quality >= self.min_quality
    }

    fn same_slot(&self, other: &BundleNeed) -> bool {
        self.id == other.id && self.crafted == other.crafted && self.min_quality == other.min_quality
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub name: String,
    pub needs: Vec<BundleNeed>,
    #[serde(default)]
    pub completed: bool,
}

/// Anything able to tell which items are still wanted.
pub trait ObjectiveSource {
    fn incomplete_needs(&self) -> Vec<BundleNeed>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Objectives {
    objectives: Vec<Objective>,
}

impl Objectives {
    pub fn new(objectives: Vec<Objective>) -> Self {
        Self { objectives }
    }

    pub fn all(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn add(&mut self, objective: Objective) {
        self.objectives.push(objective);
    }

    /// Marks an objective as done. Returns `false` if no incomplete objective
    /// has this name.
    pub fn complete(&mut self, name: &str) -> bool {
        let Some(objective) = self
            .objectives
            .iter_mut()
            .find(|o| !o.completed && o.name.eq_ignore_ascii_case(name))
        else {
            return false;
        };
        objective.completed = true;
        debug!("objectives: '{}' completed", objective.name);
        true
    }
}

impl ObjectiveSource for Objectives {
    /// Needs of every incomplete objective, identical needs merged.
    fn incomplete_needs(&self) -> Vec<BundleNeed> {
        let mut needs: Vec<BundleNeed> = vec![];
        for need in self
            .objectives
            .iter()
            .filter(|o| !o.completed)
            .flat_map(|o| o.needs.iter())
            .filter(|n| n.quantity > 0)
        {
            match needs.iter_mut().find(|n| n.same_slot(need)) {
                Some(existing) => existing.quantity += need.quantity,
                None => needs.push(need.clone()),
            }
        }
        needs
    }
}

impl ObjectiveSource for Vec<BundleNeed> {
    fn incomplete_needs(&self) -> Vec<BundleNeed> {
        self.iter().filter(|n| n.quantity > 0).cloned().collect_vec()
    }
}
