use anyhow::Result;

mod animation;
mod camera;
mod config;
mod demo;
mod engine;
mod math;
mod rendering;
mod scene_graph;
mod scene_objects;
mod window;

fn main() -> Result<()> {
    pretty_env_logger::init();

    pollster::block_on(window::run())?;

    Ok(())
}
