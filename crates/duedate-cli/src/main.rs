//! duedate CLI
//!
//! Pulls due dates out of free-form task text from the command line.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use duedate_engine::extract::LOCAL_MINUTE_FORMAT;
use duedate_engine::{
    due_label, due_status, extract_with_options, parse_due_local, ExtractOptions, TaskDraft,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// duedate CLI
#[derive(Parser)]
#[command(name = "duedate")]
#[command(author, version, about = "Extract due dates from free-form task text", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Reference instant as YYYY-MM-DDTHH:MM (defaults to the local clock)
    #[arg(long, env = "DUEDATE_NOW", global = true)]
    now: Option<String>,

    /// Time of day used when a date has no time phrase, as HH:MM
    #[arg(long, env = "DUEDATE_DEFAULT_TIME", default_value = "09:00", global = true)]
    default_time: String,

    /// Print JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the due date from task text
    ///
    /// Example: duedate extract "Team meeting Friday at 3pm"
    Extract {
        /// Task text (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Build a task draft the way the to-do list stores it
    ///
    /// Example: duedate add "Pay rent" --due 2026-03-01T09:00
    Add {
        /// Task text (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Explicit due date, used when the text has no date phrase
        #[arg(long)]
        due: Option<String>,
    },

    /// Show the time remaining until a due date
    ///
    /// Example: duedate countdown 2026-03-01T09:00
    Countdown {
        /// Due date as YYYY-MM-DDTHH:MM
        due: String,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Resolve the reference instant from `--now`, falling back to the local clock.
fn reference_instant(now: Option<&str>) -> Result<NaiveDateTime> {
    match now {
        Some(s) => parse_due_local(s).context("invalid --now"),
        None => Ok(Local::now().naive_local()),
    }
}

fn extract_options(default_time: &str) -> Result<ExtractOptions> {
    let default_time = NaiveTime::parse_from_str(default_time.trim(), "%H:%M")
        .with_context(|| format!("invalid --default-time '{default_time}', expected HH:MM"))?;
    Ok(ExtractOptions { default_time })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(cli.verbose)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let now = reference_instant(cli.now.as_deref())?;
    let options = extract_options(&cli.default_time)?;
    tracing::debug!(%now, default_time = %options.default_time, "resolved configuration");

    match cli.command {
        Commands::Extract { text } => {
            let text = text.join(" ");
            let result = extract_with_options(&text, now, &options);

            if cli.json {
                print_json(&result)?;
            } else if let Some(found) = result {
                println!("due: {}", found.due_local());
                println!("text: {}", found.cleaned_text);
            } else {
                println!("no match");
            }
        }

        Commands::Add { text, due } => {
            let explicit_due = due
                .as_deref()
                .map(parse_due_local)
                .transpose()
                .context("invalid --due")?;
            let draft = TaskDraft::from_input(&text.join(" "), explicit_due, now, &options)?;

            if cli.json {
                print_json(&draft)?;
            } else {
                println!("text: {}", draft.text);
                match draft.due_date {
                    Some(due) => {
                        println!("due: {}", due.format(LOCAL_MINUTE_FORMAT));
                        println!("label: {}", due_label(due, now));
                    }
                    None => println!("due: none"),
                }
            }
        }

        Commands::Countdown { due } => {
            let due = parse_due_local(&due).context("invalid due date")?;
            let status = due_status(due, now);

            if cli.json {
                print_json(&status)?;
            } else {
                println!("{status}");
            }
        }
    }

    Ok(())
}
