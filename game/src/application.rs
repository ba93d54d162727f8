use std::sync::{Arc, RwLock};

use log::error;
use winit::{
    application::ApplicationHandler, event::WindowEvent, event_loop::ActiveEventLoop,
    window::WindowId,
};

use sprite_engine::{
    EngineContext,
    config::config_manager::ConfigManager,
    frame_loop::{FrameLoop, FrameLoopConfig, FrameLoopResult},
};
use sprite_renderer::renderer_config::RendererConfig;

use crate::{config::ClientConfig, fountain::SpriteFountain};

pub struct Application {
    config: Arc<RwLock<ClientConfig>>,
    frame_loop: FrameLoop<SpriteFountain>,
}

impl Application {
    pub fn new(
        engine_context: EngineContext,
        renderer_config: RendererConfig,
        client_config: ConfigManager<ClientConfig>,
    ) -> Self {
        let config = client_config.get();
        let fountain = SpriteFountain::new(engine_context, renderer_config, client_config);
        Application {
            config,
            frame_loop: FrameLoop::new(fountain, FrameLoopConfig::default()),
        }
    }
}

impl ApplicationHandler for Application {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window_attributes = match self.config.read() {
            Ok(config) => config.create_window_attributes(),
            Err(poisoned) => poisoned.into_inner().create_window_attributes(),
        };

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!("Failed to create window: {}", err);
                event_loop.exit();
                return;
            }
        };

        if let Err(err) = self.frame_loop.handler.on_resumed(window) {
            error!("{:#}", err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.frame_loop.handler.on_window_resized(size);
            }
            WindowEvent::Moved(position) => {
                self.frame_loop.handler.on_window_moved(position);
            }
            WindowEvent::RedrawRequested => {
                if self.frame_loop.handler.should_exit() {
                    event_loop.exit();
                    return;
                }

                match self.frame_loop.next_frame() {
                    Ok(FrameLoopResult::Continue) => {}
                    Ok(FrameLoopResult::Exit) => event_loop.exit(),
                    Err(err) => {
                        error!("Frame failed: {:#}", err);
                        event_loop.exit();
                    }
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.frame_loop.handler.on_key_event(&event);
            }
            _ => {}
        }
    }
}
