pub mod pool_stats;
pub mod sprite;
pub mod sprite_pool;
