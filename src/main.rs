mod commands;
mod context;
mod logging;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;

use context::Context;

#[derive(Parser)]
#[command(name = "schedule")]
#[command(about = "Keep a personal schedule: month calendar, tagged events and a stats dashboard")]
struct Cli {
    /// Use this data directory instead of the configured one
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        phone: Option<String>,
    },
    /// Sign in with phone number and password
    Login {
        #[arg(short, long)]
        phone: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Change your display name
    Rename { username: String },
    /// Show a month calendar
    Month {
        /// Month to show (YYYY-MM, defaults to the selected date's month)
        #[arg(short, long)]
        month: Option<String>,

        /// Selected date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List the events of a day
    Day {
        /// Day to list (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Add an event
    Add {
        /// Event name
        name: String,

        #[arg(short, long)]
        tag: String,

        /// Start time (HH:MM)
        #[arg(short, long)]
        start: String,

        /// End time (HH:MM)
        #[arg(short, long)]
        end: String,

        /// Day of the event (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Edit an event's name, tag or times
    Edit {
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        tag: Option<String>,

        #[arg(short, long)]
        start: Option<String>,

        #[arg(short, long)]
        end: Option<String>,
    },
    /// Delete an event
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// List tags, or add one
    Tags {
        #[command(subcommand)]
        action: Option<TagAction>,
    },
    /// Show the statistics dashboard
    Stats {
        /// Print raw numbers as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export all events to a CSV spreadsheet
    Export {
        /// Output file (defaults to schedule-YYYY-MM-DD.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the config file location and effective settings
    Config,
}

#[derive(Subcommand)]
enum TagAction {
    /// Add a custom tag
    Add { name: String },
}

fn main() {
    logging::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("{}", format!("Error: {e:#}").red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Context::load(cli.data_dir)?;

    match cli.command {
        Commands::Register { username, phone } => commands::account::register(&ctx, username, phone),
        Commands::Login { phone } => commands::account::login(&ctx, phone),
        Commands::Logout => commands::account::logout(&ctx),
        Commands::Whoami => commands::account::whoami(&ctx),
        Commands::Rename { username } => commands::account::rename(&ctx, &username),
        Commands::Month { month, date } => {
            commands::calendar::month(&ctx, month.as_deref(), date.as_deref())
        }
        Commands::Day { date } => commands::events::day(&ctx, date.as_deref()),
        Commands::Add {
            name,
            tag,
            start,
            end,
            date,
        } => commands::events::add(&ctx, &name, &tag, &start, &end, date.as_deref()),
        Commands::Edit {
            id,
            name,
            tag,
            start,
            end,
        } => commands::events::edit(&ctx, &id, name, tag, start, end),
        Commands::Delete { id, force } => commands::events::delete(&ctx, &id, force),
        Commands::Tags { action } => match action {
            None => commands::tags::list(&ctx),
            Some(TagAction::Add { name }) => commands::tags::add(&ctx, &name),
        },
        Commands::Stats { json } => commands::stats::run(&ctx, json),
        Commands::Export { output } => commands::export::run(&ctx, output),
        Commands::Config => commands::config::run(&ctx),
    }
}
