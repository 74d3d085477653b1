//! CLI command definitions.
//!
//! This module defines the structure of all `fleetctl` subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::record::FleetForm;

/// Arguments for adding a vehicle.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Registration number
    #[arg(short, long)]
    pub reg_no: String,

    /// Category tag (e.g. Truck, Bus)
    #[arg(short = 't', long)]
    pub category: String,

    /// Driver name
    #[arg(short, long)]
    pub driver: String,

    /// Register the vehicle as unavailable
    #[arg(long)]
    pub unavailable: bool,

    /// Thumbnail URL (defaults to the configured placeholder)
    #[arg(long, value_name = "URL")]
    pub image: Option<String>,
}

impl AddCommand {
    /// Fill a form from the arguments.
    #[must_use]
    pub fn to_form(&self) -> FleetForm {
        let form = FleetForm::new(
            self.reg_no.clone(),
            self.category.clone(),
            self.driver.clone(),
            !self.unavailable,
        );
        match &self.image {
            Some(image) => form.with_image(image.clone()),
            None => form,
        }
    }
}

/// Arguments for changing a driver.
#[derive(Debug, Args)]
pub struct DriverCommand {
    /// Id of the vehicle
    pub id: String,

    /// New driver name (prompted for when omitted)
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Arguments for a command that targets one vehicle.
#[derive(Debug, Args)]
pub struct TargetCommand {
    /// Id of the vehicle
    pub id: String,
}

/// Arguments for a destructive command.
#[derive(Debug, Args)]
pub struct ConfirmedCommand {
    /// Id of the vehicle
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for wiping all vehicles.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Print the configuration file path
    Path,

    /// Validate a configuration file
    Validate {
        /// Path to the file (defaults to the standard location)
        file: Option<PathBuf>,
    },
}

/// How views are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    #[default]
    Table,
    /// Pretty JSON
    Json,
    /// HTML card grid
    Html,
}
