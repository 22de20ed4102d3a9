use anyhow::Result;
use owo_colors::OwoColorize;
use schedule_core::config::ScheduleConfig;

use crate::context::Context;

pub fn run(ctx: &Context) -> Result<()> {
    let path = ScheduleConfig::config_path()?;

    println!("{} {}", "Config file:".dimmed(), path.display());
    println!("{} {}", "Data directory:".dimmed(), ctx.config.data_path().display());
    println!();
    print!("{}", ctx.config.to_toml()?);
    Ok(())
}
