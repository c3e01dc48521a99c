mod client;
mod commands;
mod context;
mod render;
mod utils;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use daybook_core::{EventId, ViewSpan};
use tracing_subscriber::EnvFilter;

use crate::commands::browse::Step;
use crate::commands::events::EventFields;
use crate::context::Context;
use crate::utils::when::parse_date;

#[derive(Parser)]
#[command(name = "daybook", version)]
#[command(about = "Keep your calendar on a daybook server")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log into it
    Register { name: Option<String> },
    Login { name: Option<String> },
    Logout,
    /// Show the events of the current view
    List {
        /// Date to show instead of the saved one (YYYY-MM-DD or e.g. "next monday")
        #[arg(value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// week, month or upcoming
        #[arg(long)]
        view: Option<ViewSpan>,
    },
    /// Switch between week, month and upcoming views
    View { span: ViewSpan },
    Next,
    Previous,
    /// Back to today
    Current,
    Add {
        #[command(flatten)]
        fields: EventFields,
    },
    Show {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        id: EventId,
    },
    Edit {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        id: EventId,

        #[command(flatten)]
        fields: EventFields,
    },
    /// Copy an event, optionally to another start time
    Duplicate {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        id: EventId,

        #[arg(short, long)]
        start: Option<String>,
    },
    Delete {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        id: EventId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    ChangeName { name: Option<String> },
    ChangePassword,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut ctx = Context::load()?;

    match cli.command {
        Commands::Register { name } => commands::account::register(&mut ctx, name),
        Commands::Login { name } => commands::account::login(&mut ctx, name),
        Commands::Logout => commands::account::logout(&mut ctx),
        Commands::List { date, view } => commands::browse::list(&ctx, date, view),
        Commands::View { span } => commands::browse::set_view(&mut ctx, span),
        Commands::Next => commands::browse::step(&mut ctx, Step::Next),
        Commands::Previous => commands::browse::step(&mut ctx, Step::Previous),
        Commands::Current => commands::browse::step(&mut ctx, Step::Current),
        Commands::Add { fields } => commands::events::add(&ctx, fields),
        Commands::Show { date, id } => commands::events::show(&ctx, date, id),
        Commands::Edit { date, id, fields } => commands::events::edit(&ctx, date, id, fields),
        Commands::Duplicate { date, id, start } => {
            commands::events::duplicate(&ctx, date, id, start)
        }
        Commands::Delete { date, id, yes } => commands::events::delete(&ctx, date, id, yes),
        Commands::ChangeName { name } => commands::account::change_name(&mut ctx, name),
        Commands::ChangePassword => commands::account::change_password(&ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_event_reference() {
        let cli = Cli::try_parse_from(["daybook", "delete", "2024-03-05", "7", "--yes"]).unwrap();
        match cli.command {
            Commands::Delete { date, id, yes } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
                assert_eq!(id, 7);
                assert!(yes);
            }
            _ => panic!("expected delete"),
        }
    }

    #[test]
    fn parses_view_names() {
        let cli = Cli::try_parse_from(["daybook", "list", "--view", "month"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::List {
                date: None,
                view: Some(ViewSpan::Month)
            }
        ));
        assert!(Cli::try_parse_from(["daybook", "view", "fortnight"]).is_err());
    }
}
