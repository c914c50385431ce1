//! Forageable resource items (trees, stones, bushes)
//!
//! Each item yields exactly one unit and disappears when harvested. The
//! whole field is replaced at daybreak rather than regrowing item by item.

use ordered_float::OrderedFloat;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::{ResourceConfig, WorldConfig};
use crate::core::types::Vec2;

/// Type of resource item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Yields wood
    Tree,
    /// Yields stone (needs a pickaxe)
    Stone,
    /// Yields food
    Bush,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [ResourceKind::Tree, ResourceKind::Stone, ResourceKind::Bush];
}

/// A single harvestable item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceItem {
    pub kind: ResourceKind,
    pub position: Vec2,
}

/// All resource items in the world, one list per kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceField {
    trees: Vec<ResourceItem>,
    stones: Vec<ResourceItem>,
    bushes: Vec<ResourceItem>,
}

impl ResourceField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uniform-random field sized by the config
    pub fn generate(counts: &ResourceConfig, world: &WorldConfig, rng: &mut impl Rng) -> Self {
        let mut field = Self::new();
        field.regenerate(counts, world, rng);
        field
    }

    /// Replace every item with a fresh uniform-random spawn
    pub fn regenerate(&mut self, counts: &ResourceConfig, world: &WorldConfig, rng: &mut impl Rng) {
        for kind in ResourceKind::ALL {
            let count = match kind {
                ResourceKind::Tree => counts.trees,
                ResourceKind::Stone => counts.stones,
                ResourceKind::Bush => counts.bushes,
            };
            self.items_mut(kind).clear();
            for _ in 0..count {
                let position = Vec2::new(rng.gen_range(0.0..=world.width), rng.gen_range(0.0..=world.height));
                self.place(kind, position);
            }
        }
    }

    pub fn items(&self, kind: ResourceKind) -> &[ResourceItem] {
        match kind {
            ResourceKind::Tree => &self.trees,
            ResourceKind::Stone => &self.stones,
            ResourceKind::Bush => &self.bushes,
        }
    }

    fn items_mut(&mut self, kind: ResourceKind) -> &mut Vec<ResourceItem> {
        match kind {
            ResourceKind::Tree => &mut self.trees,
            ResourceKind::Stone => &mut self.stones,
            ResourceKind::Bush => &mut self.bushes,
        }
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        self.items(kind).len()
    }

    /// Add one item
    pub fn place(&mut self, kind: ResourceKind, position: Vec2) {
        self.items_mut(kind).push(ResourceItem { kind, position });
    }

    /// Nearest item strictly inside `radius`, as (index, distance)
    pub fn nearest_visible(&self, kind: ResourceKind, from: Vec2, radius: f32) -> Option<(usize, f32)> {
        self.items(kind)
            .iter()
            .enumerate()
            .map(|(idx, item)| (idx, from.distance(&item.position)))
            .filter(|&(_, dist)| dist < radius)
            .min_by_key(|&(_, dist)| OrderedFloat(dist))
    }

    /// Remove and return an item. Order of the remaining items is not kept.
    pub fn harvest(&mut self, kind: ResourceKind, index: usize) -> Option<ResourceItem> {
        let items = self.items_mut(kind);
        if index < items.len() {
            Some(items.swap_remove(index))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generate_counts_and_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let world = WorldConfig::default();
        let field = ResourceField::generate(&ResourceConfig::default(), &world, &mut rng);

        assert_eq!(field.count(ResourceKind::Tree), 160);
        assert_eq!(field.count(ResourceKind::Stone), 120);
        assert_eq!(field.count(ResourceKind::Bush), 100);
        for kind in ResourceKind::ALL {
            for item in field.items(kind) {
                assert_eq!(item.kind, kind);
                assert!(item.position.x >= 0.0 && item.position.x <= world.width);
                assert!(item.position.y >= 0.0 && item.position.y <= world.height);
            }
        }
    }

    #[test]
    fn test_regenerate_replaces_everything() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let world = WorldConfig::default();
        let counts = ResourceConfig { trees: 3, stones: 2, bushes: 1 };
        let mut field = ResourceField::new();
        field.place(ResourceKind::Tree, Vec2::new(-50.0, -50.0));

        field.regenerate(&counts, &world, &mut rng);

        assert_eq!(field.count(ResourceKind::Tree), 3);
        assert!(field.items(ResourceKind::Tree).iter().all(|t| t.position.x >= 0.0));
    }

    #[test]
    fn test_nearest_visible() {
        let mut field = ResourceField::new();
        field.place(ResourceKind::Bush, Vec2::new(50.0, 0.0));
        field.place(ResourceKind::Bush, Vec2::new(20.0, 0.0));
        field.place(ResourceKind::Bush, Vec2::new(150.0, 0.0));
        field.place(ResourceKind::Tree, Vec2::new(1.0, 0.0));

        let (idx, dist) = field.nearest_visible(ResourceKind::Bush, Vec2::default(), 100.0).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(dist, 20.0);

        // Visibility is strict
        assert!(field.nearest_visible(ResourceKind::Bush, Vec2::default(), 20.0).is_none());
    }

    #[test]
    fn test_harvest_removes_item() {
        let mut field = ResourceField::new();
        field.place(ResourceKind::Stone, Vec2::new(1.0, 1.0));
        field.place(ResourceKind::Stone, Vec2::new(2.0, 2.0));

        let taken = field.harvest(ResourceKind::Stone, 0).unwrap();
        assert_eq!(taken.position, Vec2::new(1.0, 1.0));
        assert_eq!(field.count(ResourceKind::Stone), 1);
        assert!(field.harvest(ResourceKind::Stone, 5).is_none());
    }
}
