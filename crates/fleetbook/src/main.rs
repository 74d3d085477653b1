//! `fleetctl` - CLI for fleetbook
//!
//! This binary manages the fleet inventory stored in the local database and
//! paints the filtered view after every change.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{Stderr, StdinLock};

use anyhow::Context;
use clap::Parser;

use fleetbook::cli::{Cli, Command, ConfigCommand, OutputFormat};
use fleetbook::{
    init_logging, Config, FleetManager, FleetRepository, HtmlSurface, JsonSurface, Outcome,
    Prompter, SqliteStore, Surface, TerminalPrompter, TextSurface,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match &cli.command {
        Command::Status(cmd) => handle_status(&load_config(&cli)?, cmd.json),
        Command::Config(cmd) => handle_config(&cli, cmd),
        Command::List => {
            let manager = open_manager(&cli)?;
            surface_for(cli.format).paint(&manager.render()?)?;
            Ok(())
        }
        Command::Add(cmd) => {
            let mut manager = open_manager(&cli)?;
            let mut form = cmd.to_form();
            let outcome = manager.create(&mut form, &mut FlagPrompter::new(false, None))?;
            report(&outcome, cli.format)
        }
        Command::Driver(cmd) => {
            let mut manager = open_manager(&cli)?;
            let mut prompter = FlagPrompter::new(false, cmd.name.clone());
            let outcome = manager.update_driver(&cmd.id, &mut prompter)?;
            report(&outcome, cli.format)
        }
        Command::Toggle(cmd) => {
            let mut manager = open_manager(&cli)?;
            let outcome = manager.toggle_availability(&cmd.id)?;
            report(&outcome, cli.format)
        }
        Command::Delete(cmd) => {
            let mut manager = open_manager(&cli)?;
            let outcome = manager.delete(&cmd.id, &mut FlagPrompter::new(cmd.yes, None))?;
            report(&outcome, cli.format)
        }
        Command::Clear(cmd) => {
            let mut manager = open_manager(&cli)?;
            let outcome = manager.clear_all(&mut FlagPrompter::new(cmd.yes, None))?;
            report(&outcome, cli.format)
        }
    }
}

/// Answers taken from command-line flags, falling back to the terminal.
#[derive(Debug)]
struct FlagPrompter {
    confirm: Option<bool>,
    input: Option<String>,
    terminal: TerminalPrompter<StdinLock<'static>, Stderr>,
}

impl FlagPrompter {
    fn new(yes: bool, input: Option<String>) -> Self {
        Self {
            confirm: yes.then_some(true),
            input,
            terminal: TerminalPrompter::stdio(),
        }
    }
}

impl Prompter for FlagPrompter {
    fn confirm(&mut self, message: &str) -> fleetbook::Result<bool> {
        match self.confirm.take() {
            Some(answer) => Ok(answer),
            None => self.terminal.confirm(message),
        }
    }

    fn input(&mut self, message: &str, initial: &str) -> fleetbook::Result<Option<String>> {
        match self.input.take() {
            Some(text) => Ok(Some(text)),
            None => self.terminal.input(message, initial),
        }
    }

    fn notify(&mut self, message: &str) -> fleetbook::Result<()> {
        self.terminal.notify(message)
    }
}

/// Load the configuration selected by `--config`.
///
/// Only commands that use the configuration call this, so `config path` and
/// `config validate` still work when the default file is broken.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    Config::load_from(cli.config.clone()).context("loading configuration")
}

fn open_manager(cli: &Cli) -> anyhow::Result<FleetManager<SqliteStore>> {
    let config = load_config(cli)?;
    let path = config.database_path();
    let store = SqliteStore::open(&path)
        .with_context(|| format!("opening fleet database {}", path.display()))?;

    Ok(FleetManager::new(FleetRepository::with_key(
        store,
        config.storage.storage_key.clone(),
    ))
    .with_default_image(config.fleet.default_image.clone())
    .with_filter(cli.filter()))
}

fn surface_for(format: OutputFormat) -> Box<dyn Surface> {
    match format {
        OutputFormat::Table => Box::new(TextSurface::new(std::io::stdout())),
        OutputFormat::Json => Box::new(JsonSurface::new(std::io::stdout())),
        OutputFormat::Html => Box::new(HtmlSurface::new(std::io::stdout())),
    }
}

fn report(outcome: &Outcome, format: OutputFormat) -> anyhow::Result<()> {
    match outcome {
        Outcome::Created { record, .. } => {
            eprintln!("Added {} as {}", record.reg_no, record.id);
        }
        Outcome::Updated { record, .. } => {
            eprintln!(
                "Updated {}: driver {}, {}",
                record.id,
                record.driver,
                record.availability_label()
            );
        }
        Outcome::Deleted { record, .. } => eprintln!("Deleted {} ({})", record.id, record.reg_no),
        Outcome::Cleared { .. } => eprintln!("Cleared all fleets."),
        // The prompter has already shown the notice.
        Outcome::Rejected { .. } => {}
        Outcome::Declined => eprintln!("Cancelled."),
        Outcome::NotFound { id } => eprintln!("No vehicle with id {id}."),
    }

    if let Some(view) = outcome.view() {
        surface_for(format).paint(view)?;
    }
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let path = config.database_path();
    let store = SqliteStore::open(&path)
        .with_context(|| format!("opening fleet database {}", path.display()))?;
    let repository = FleetRepository::with_key(store, config.storage.storage_key.clone());

    let records = repository.load()?;
    let available = records.iter().filter(|r| r.is_available).count();
    let updated_at = repository.store().updated_at(repository.key())?;
    let stats = repository.store().stats()?;

    if json {
        let status = serde_json::json!({
            "database_path": path,
            "storage_key": repository.key(),
            "total": records.len(),
            "available": available,
            "unavailable": records.len() - available,
            "updated_at": updated_at,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("fleetctl status");
        println!("---------------");
        println!("Database:      {}", path.display());
        println!("Storage key:   {}", repository.key());
        println!("Total fleets:  {}", records.len());
        println!("Available:     {available}");
        println!("Unavailable:   {}", records.len() - available);
        match updated_at {
            Some(at) => println!("Last change:   {}", at.to_rfc3339()),
            None => println!("Last change:   never"),
        }
        println!("Database size: {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(cli: &Cli, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(cli)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!("  Storage key:    {}", config.storage.storage_key);
                println!();
                println!("[Fleet]");
                println!("  Default image:  {}", config.fleet.default_image);
                println!("  Categories:     {}", config.fleet.categories.join(", "));
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .clone()
                .or_else(|| cli.config.clone())
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
