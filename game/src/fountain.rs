use std::sync::Arc;

use anyhow::Context;
use glam::Vec2;
use log::{info, warn};
use rand::{SeedableRng, rngs::StdRng};
use sprite_engine::{
    EngineContext,
    config::config_manager::ConfigManager,
    frame_loop::{FrameHandler, FrameTime},
    math::rectangle::Rect,
    sprites::sprite::SpriteId,
};
use sprite_renderer::{
    renderer_config::RendererConfig,
    rendering::{
        batch_renderer::BatchRenderer,
        resolution::{PhysicalSizeExt, Resolution},
        surface::GpuSurface,
        wgpu_surface::WgpuSurface,
    },
};
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    config::ClientConfig,
    fps_counter::FpsCounter,
    particles::{launch_velocity, step_sprites},
};

const STATS_INTERVAL_S: f64 = 5.0;

/// Particle fountain: spawns sprites at the bottom of the window and lets them fall back
/// down under gravity until their life runs out.
pub struct SpriteFountain {
    should_exit: bool,
    paused: bool,
    renderer: Option<BatchRenderer<WgpuSurface>>,
    engine_context: EngineContext,
    renderer_config: RendererConfig,
    client_config: ConfigManager<ClientConfig>,
    settings: ClientConfig,
    rng: StdRng,
    expired: Vec<SpriteId>,
    fps_counter: FpsCounter,
    last_stats_s: f64,
}

impl FrameHandler for SpriteFountain {
    #[profiling::function]
    fn update(&mut self, time: &FrameTime) -> anyhow::Result<()> {
        if self.paused {
            return Ok(());
        }

        let Some(renderer) = &mut self.renderer else {
            return Ok(());
        };

        let dt_s = time.delta_time_s as f32;
        step_sprites(renderer.sprites_mut(), dt_s, &mut self.expired);

        let emitter = emitter_position(renderer.surface().resolution());
        let size = self.settings.sprite_size;
        let gravity = Vec2::new(0.0, self.settings.gravity);

        for _ in 0..self.settings.sprites_per_tick {
            let velocity = launch_velocity(&mut self.rng, self.settings.max_speed);
            let sprite = renderer
                .add_sprite(Rect::new(emitter - Vec2::splat(size / 2.0), Vec2::splat(size)))
                .set_velocity(velocity.x, velocity.y)
                .set_life(self.settings.sprite_life_s);
            sprite.acceleration = gravity;
        }

        Ok(())
    }

    #[profiling::function]
    fn render(&mut self, time: &FrameTime) -> anyhow::Result<()> {
        let Some(renderer) = &mut self.renderer else {
            return Ok(());
        };

        renderer.update_time(time);
        let batch = renderer.draw()?;
        self.fps_counter.tick();

        if time.elapsed_time_s - self.last_stats_s >= STATS_INTERVAL_S {
            self.last_stats_s = time.elapsed_time_s;
            let pool_stats = renderer.sprites().stats();
            info!(
                "{:.1} fps, {} quads, pool {} ({:.0}% in use)",
                self.fps_counter.fps(),
                batch.quad_count,
                pool_stats,
                pool_stats.occupancy() * 100.0
            );
        }

        Ok(())
    }
}

fn emitter_position(resolution: Resolution) -> Vec2 {
    let size = resolution.to_vec2();
    Vec2::new(size.x / 2.0, size.y)
}

impl SpriteFountain {
    pub fn new(
        engine_context: EngineContext,
        renderer_config: RendererConfig,
        client_config: ConfigManager<ClientConfig>,
    ) -> Self {
        let settings = client_config.snapshot();

        SpriteFountain {
            should_exit: false,
            paused: false,
            renderer: None,
            engine_context,
            renderer_config,
            client_config,
            settings,
            rng: StdRng::from_entropy(),
            expired: Vec::new(),
            fps_counter: FpsCounter::new(),
            last_stats_s: 0.0,
        }
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn on_resumed(&mut self, window: Arc<Window>) -> anyhow::Result<()> {
        if self.renderer.is_some() {
            return Ok(());
        }

        let surface = pollster::block_on(WgpuSurface::new(window, &self.renderer_config))
            .context("Failed to create the sprite surface")?;

        let mut renderer = BatchRenderer::new(
            surface,
            self.engine_context.create_sprite_pool(),
            &self.renderer_config,
        );

        if let Some(path) = &self.settings.texture_path {
            match renderer.load_texture(path) {
                Ok(texture) => {
                    info!(
                        "Loaded sprite texture {:?} ({}x{})",
                        path, texture.width, texture.height
                    );
                    renderer.set_texture(0);
                }
                Err(err) => warn!("Drawing untextured sprites: {}", err),
            }
        }

        self.renderer = Some(renderer);
        Ok(())
    }

    pub fn on_window_resized(&mut self, size: Resolution) {
        if !size.is_empty() {
            self.client_config.update_and_save(|config| {
                config.window_size = Some((size.width, size.height));
            });
        }

        if let Some(renderer) = &mut self.renderer {
            renderer.set_viewport(size);
        }
    }

    pub fn on_window_moved(&mut self, position: PhysicalPosition<i32>) {
        let minimized = self
            .renderer
            .as_ref()
            .is_some_and(|renderer| renderer.surface().is_minimized());
        if minimized {
            return;
        }

        self.client_config.update_and_save(|config| {
            config.window_position = Some((position.x, position.y));
        });
    }

    pub fn on_key_event(&mut self, key_event: &KeyEvent) {
        let KeyEvent {
            physical_key: PhysicalKey::Code(code),
            state: ElementState::Pressed,
            repeat: false,
            ..
        } = key_event
        else {
            return;
        };

        match code {
            KeyCode::Escape => {
                self.should_exit = true;
            }
            KeyCode::Space => {
                self.paused = !self.paused;
                info!("Fountain {}", if self.paused { "paused" } else { "resumed" });
            }
            KeyCode::KeyC => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.sprites_mut().clear();
                    info!("Cleared all sprites");
                }
            }
            _ => {}
        }
    }
}
