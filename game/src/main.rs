use sprite_engine::{config::config_manager::Config, init_engine};
use sprite_renderer::renderer_config::RendererConfig;
use winit::event_loop::{ControlFlow, EventLoop};

use crate::{application::Application, config::ClientConfig};

mod application;
mod config;
mod fountain;
mod fps_counter;
mod particles;

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_timed();
    log::info!("Starting sprite fountain...");

    let context = init_engine()?;
    let renderer_config = RendererConfig::create_manager()?.snapshot();
    let client_config = ClientConfig::create_manager()?;
    let mut app = Application::new(context, renderer_config, client_config);

    let event_loop: EventLoop<()> = EventLoop::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut app)?;

    Ok(())
}
