use log::{debug, warn};

use crate::{
    config::engine_config::EngineConfig,
    limits::DEFAULT_GROWTH_STEP,
    memory::free_list::FreeList,
    sprites::{
        pool_stats::PoolStats,
        sprite::{Sprite, SpriteId},
    },
};

/// A growable arena of sprites with stable indices and FIFO recycling.
///
/// Every slot is either allocated or its id sits in the free list, never both. Allocation pops
/// the oldest free id, so reuse is spread over the whole slot range. When the free list runs
/// dry the pool appends `growth_step + 1` fresh slots.
///
/// Growth is linear: a pool of final size `n` pays for `n / (growth_step + 1)` growth events.
/// Pick a larger step for pools that are expected to get big.
#[derive(Debug)]
pub struct SpritePool {
    sprites: Vec<Sprite>,
    free_list: FreeList<SpriteId>,
    growth_step: usize,
    allocated_count: usize,
    growth_events: usize,
}

impl SpritePool {
    pub fn new(growth_step: usize) -> Self {
        assert!(growth_step >= 1, "growth_step must be at least 1");

        let mut pool = SpritePool {
            sprites: Vec::new(),
            free_list: FreeList::with_capacity(growth_step + 1),
            growth_step,
            allocated_count: 0,
            growth_events: 0,
        };
        pool.grow();
        pool
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.pool_growth_step)
    }

    /// Appends `growth_step + 1` unallocated sprites and queues their ids in ascending order.
    #[profiling::function]
    pub fn grow(&mut self) {
        let old_capacity = self.sprites.len();
        let new_capacity = old_capacity + self.growth_step + 1;

        self.sprites.reserve_exact(new_capacity - old_capacity);
        for index in old_capacity..new_capacity {
            let id = SpriteId::new(index);
            self.sprites.push(Sprite::new(id));
            self.free_list.append(id);
        }

        self.growth_events += 1;
        debug!(
            "Sprite pool grew from {} to {} slots",
            old_capacity, new_capacity
        );
    }

    /// Hands out the oldest free sprite, growing the pool first if nothing is free.
    ///
    /// The payload is not reset here. A recycled sprite was zeroed when it was freed, but
    /// callers should still set position and size before the next draw.
    pub fn get_free(&mut self) -> &mut Sprite {
        if self.free_list.is_empty() {
            self.grow();
        }

        let id = self
            .free_list
            .pop_front()
            .expect("grow appends growth_step + 1 >= 2 free slots");

        self.allocated_count += 1;
        let sprite = &mut self.sprites[id.index()];
        sprite.allocated = true;
        sprite
    }

    /// Returns a sprite to the pool. Freeing a sprite that is already free does nothing.
    pub fn free(&mut self, id: SpriteId) {
        let Some(sprite) = self.sprites.get_mut(id.index()) else {
            warn!(
                "Ignoring free of sprite {} outside of pool capacity {}",
                id.index(),
                self.sprites.len()
            );
            return;
        };

        if !sprite.allocated {
            return;
        }

        sprite.allocated = false;
        sprite.reset();
        self.allocated_count -= 1;
        self.free_list.append(id);
    }

    /// Frees every allocated sprite, in ascending id order. Capacity is kept.
    pub fn clear(&mut self) {
        for index in 0..self.sprites.len() {
            self.free(SpriteId::new(index));
        }
    }

    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(id.index())
    }

    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.get_mut(id.index())
    }

    /// The whole backing store, including free slots, in id order.
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn iter_allocated(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter().filter(|sprite| sprite.allocated)
    }

    pub fn iter_allocated_mut(&mut self) -> impl Iterator<Item = &mut Sprite> {
        self.sprites.iter_mut().filter(|sprite| sprite.allocated)
    }

    /// Free ids in the order they will be handed out.
    pub fn free_ids(&self) -> impl Iterator<Item = SpriteId> + '_ {
        self.free_list.iter().copied()
    }

    pub fn capacity(&self) -> usize {
        self.sprites.len()
    }

    pub fn allocated_count(&self) -> usize {
        self.allocated_count
    }

    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    pub fn growth_step(&self) -> usize {
        self.growth_step
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity(),
            allocated: self.allocated_count,
            free: self.free_count(),
            growth_events: self.growth_events,
        }
    }
}

impl Default for SpritePool {
    fn default() -> Self {
        Self::new(DEFAULT_GROWTH_STEP)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use glam::Vec2;

    use super::*;

    fn assert_partitioned(pool: &SpritePool) {
        let free: BTreeSet<usize> = pool.free_ids().map(|id| id.index()).collect();
        let allocated: BTreeSet<usize> = pool
            .iter_allocated()
            .map(|sprite| sprite.id().index())
            .collect();

        assert_eq!(
            free.len(),
            pool.free_count(),
            "Free list contains duplicates"
        );
        assert_eq!(allocated.len(), pool.allocated_count());
        assert_eq!(
            pool.free_count() + pool.allocated_count(),
            pool.capacity(),
            "Free and allocated counts must add up to capacity"
        );
        assert!(
            free.is_disjoint(&allocated),
            "Free and allocated sets overlap"
        );

        let union: BTreeSet<usize> = free.union(&allocated).copied().collect();
        let expected: BTreeSet<usize> = (0..pool.capacity()).collect();
        assert_eq!(union, expected, "Free and allocated sets must cover the pool");
    }

    #[test]
    fn test_initial_capacity() {
        assert_eq!(SpritePool::new(1).capacity(), 2);
        assert_eq!(SpritePool::new(10).capacity(), 11);
        assert_eq!(SpritePool::default().capacity(), DEFAULT_GROWTH_STEP + 1);

        let pool = SpritePool::new(4);
        assert_eq!(pool.allocated_count(), 0);
        assert_eq!(
            pool.free_ids().map(|id| id.index()).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4]
        );
        assert_partitioned(&pool);
    }

    #[test]
    #[should_panic(expected = "growth_step must be at least 1")]
    fn test_zero_growth_step() {
        let _ = SpritePool::new(0);
    }

    #[test]
    fn test_fifo_reuse() {
        let mut pool = SpritePool::new(2);
        let a = pool.get_free().id();
        let b = pool.get_free().id();
        let c = pool.get_free().id();
        assert_eq!(
            (a.index(), b.index(), c.index()),
            (0, 1, 2),
            "Fresh slots are handed out in ascending order"
        );

        pool.free(b);
        pool.free(a);

        // Pool was exhausted, so b is the oldest free id, then a
        assert_eq!(pool.get_free().id(), b);
        assert_eq!(pool.get_free().id(), a);
        assert_partitioned(&pool);
    }

    #[test]
    fn test_growth_only_when_exhausted() {
        let growth_step = 3;
        let mut pool = SpritePool::new(growth_step);
        let initial_capacity = pool.capacity();

        for _ in 0..initial_capacity {
            assert_eq!(pool.capacity(), initial_capacity, "Grew too early");
            pool.get_free();
        }
        assert_eq!(pool.free_count(), 0);
        assert_eq!(pool.capacity(), initial_capacity);

        // Free list is empty, so this call grows by exactly growth_step + 1
        let id = pool.get_free().id();
        assert_eq!(pool.capacity(), initial_capacity + growth_step + 1);
        assert_eq!(id.index(), initial_capacity);
        assert_eq!(pool.stats().growth_events, 2);
        assert_partitioned(&pool);
    }

    #[test]
    fn test_ids_stable_across_growth() {
        let mut pool = SpritePool::new(1);
        let ids: Vec<SpriteId> = (0..2).map(|_| pool.get_free().id()).collect();
        for &id in &ids {
            pool.get_mut(id).unwrap().initialize(id.index() as f32, 0.0, 1.0, 1.0);
        }

        for _ in 0..10 {
            pool.grow();
        }

        for &id in &ids {
            let sprite = pool.get(id).unwrap();
            assert_eq!(sprite.id(), id);
            assert_eq!(sprite.position.x, id.index() as f32);
            assert!(sprite.is_allocated());
        }

        for (index, sprite) in pool.sprites().iter().enumerate() {
            assert_eq!(sprite.id().index(), index);
        }
        assert_partitioned(&pool);
    }

    #[test]
    fn test_double_free_is_noop() {
        let mut pool = SpritePool::new(4);
        let a = pool.get_free().id();
        let _b = pool.get_free().id();

        pool.free(a);
        let after_first: Vec<SpriteId> = pool.free_ids().collect();
        let stats_first = pool.stats();

        pool.free(a);
        assert_eq!(pool.free_ids().collect::<Vec<_>>(), after_first);
        assert_eq!(pool.stats(), stats_first);
        assert_partitioned(&pool);
    }

    #[test]
    fn test_free_out_of_range_is_noop() {
        let mut pool = SpritePool::new(1);
        let stats = pool.stats();
        pool.free(SpriteId::new(100));
        assert_eq!(pool.stats(), stats);
    }

    #[test]
    fn test_recycled_sprite_is_zeroed() {
        let mut pool = SpritePool::new(1);
        let id = {
            let sprite = pool.get_free();
            sprite
                .initialize(1.0, 2.0, 3.0, 4.0)
                .set_velocity(5.0, 6.0)
                .set_life(7.0);
            sprite.acceleration = Vec2::new(8.0, 9.0);
            sprite.id()
        };
        pool.free(id);

        // Drain until the recycled id comes back around
        let recycled = loop {
            let sprite = pool.get_free();
            if sprite.id() == id {
                break sprite.clone();
            }
        };
        assert!(recycled.is_allocated());
        assert!(recycled.has_default_payload());
    }

    #[test]
    fn test_clear() {
        let mut pool = SpritePool::new(2);
        for _ in 0..7 {
            pool.get_free().initialize(1.0, 1.0, 1.0, 1.0);
        }
        let capacity = pool.capacity();

        pool.clear();
        assert_eq!(pool.allocated_count(), 0);
        assert_eq!(pool.capacity(), capacity);
        assert!(pool.sprites().iter().all(Sprite::has_default_payload));
        assert_partitioned(&pool);
    }

    #[test]
    fn test_partition_under_churn() {
        let mut pool = SpritePool::new(3);
        let mut live: Vec<SpriteId> = Vec::new();
        // Small LCG so the sequence is deterministic
        let mut state: u32 = 12345;

        for step in 0..500 {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            let roll = (state >> 16) % 10;

            if roll < 6 || live.is_empty() {
                live.push(pool.get_free().id());
            } else {
                let victim = live.swap_remove((state as usize >> 4) % live.len());
                pool.free(victim);
                if roll == 9 {
                    // Double free must not disturb anything
                    pool.free(victim);
                }
            }

            if step % 25 == 0 {
                assert_partitioned(&pool);
            }
        }

        assert_eq!(pool.allocated_count(), live.len());
        assert_partitioned(&pool);
    }
}
