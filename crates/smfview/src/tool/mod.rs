pub mod app_config;
pub mod frame_driver;
mod runners;
pub mod timer;

use anyhow::Result;

use crate::loader::mesh_builder::MeshData;
use crate::tool::app_config::AppConfig;
use crate::tool::runners::window_runner::WindowRunner;

pub fn run_app(config: AppConfig, mesh: MeshData) -> Result<()> {
    WindowRunner::run(config, mesh)
}
