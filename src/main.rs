mod app;
mod config;
mod input;
mod model;
mod presets;
mod render;
mod sim;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}
