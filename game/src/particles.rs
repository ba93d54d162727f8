use glam::Vec2;
use rand::Rng;
use sprite_engine::sprites::{sprite::SpriteId, sprite_pool::SpritePool};

/// Random launch velocity for a fountain particle: mostly upwards (negative y), with some
/// sideways spread.
pub fn launch_velocity(rng: &mut impl Rng, max_speed: f32) -> Vec2 {
    if max_speed <= 0.0 {
        return Vec2::ZERO;
    }

    let spread = max_speed / 3.0;
    Vec2::new(
        rng.gen_range(-spread..=spread),
        -rng.gen_range(max_speed * 0.5..=max_speed),
    )
}

/// Integrates every live sprite by `dt_s` and frees the ones whose life ran out.
///
/// `expired` is scratch space reused between calls. Returns the number of sprites freed.
#[profiling::function]
pub fn step_sprites(pool: &mut SpritePool, dt_s: f32, expired: &mut Vec<SpriteId>) -> usize {
    expired.clear();

    for sprite in pool.iter_allocated_mut() {
        sprite.velocity += sprite.acceleration * dt_s;
        sprite.position += sprite.velocity * dt_s;
        sprite.life -= dt_s;

        if sprite.life <= 0.0 {
            expired.push(sprite.id());
        }
    }

    for id in expired.iter() {
        pool.free(*id);
    }

    expired.len()
}
