use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

/// Query availability and validate bookings for the home-services calendar.
#[derive(Parser, Debug)]
#[command(name = "bookings")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML scheduling configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// JSON file of already-booked intervals: [{"start", "end", "label"}]
    #[arg(short, long, global = true)]
    events: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every slot on a day and whether it can be booked
    Availability {
        /// Local calendar date, YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Override opening hour
        #[arg(long)]
        start_hour: Option<u32>,
        /// Override closing hour
        #[arg(long)]
        end_hour: Option<u32>,
        /// Service minutes per slot
        #[arg(long)]
        duration: Option<u32>,
        /// Travel minutes added after each job
        #[arg(long)]
        travel: Option<u32>,
        /// Print only available slots
        #[arg(long)]
        available_only: bool,
    },
    /// Check a requested start time without booking it
    Validate {
        /// Requested start, RFC 3339
        #[arg(long)]
        start: String,
        /// Job length in minutes
        #[arg(long)]
        duration: u32,
        /// Customer timezone for suggestion labels
        #[arg(long)]
        tz: Option<String>,
    },
    /// Validate and book a job on the calendar
    Book {
        #[arg(long)]
        start: String,
        #[arg(long)]
        duration: u32,
        #[arg(long)]
        tz: Option<String>,
        #[arg(long)]
        summary: Option<String>,
        /// Idempotency key; replays return the original event
        #[arg(long)]
        request_id: Option<String>,
    },
    /// List configured holidays
    Holidays {
        /// Also include generated US federal holidays for this year
        #[arg(long)]
        year: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let ctx = commands::Context::load(args.config.as_deref(), args.events.as_deref())?;

    match args.command {
        Command::Availability {
            date,
            start_hour,
            end_hour,
            duration,
            travel,
            available_only,
        } => {
            commands::availability(
                &ctx,
                &date,
                start_hour,
                end_hour,
                duration,
                travel,
                available_only,
            )
            .await
        }
        Command::Validate {
            start,
            duration,
            tz,
        } => commands::validate(&ctx, &start, duration, tz.as_deref()).await,
        Command::Book {
            start,
            duration,
            tz,
            summary,
            request_id,
        } => commands::book(&ctx, &start, duration, tz.as_deref(), summary, request_id).await,
        Command::Holidays { year } => commands::holidays(&ctx, year),
    }
}
