//! Command-line interface for fleetbook.
//!
//! This module provides the CLI structure for the `fleetctl` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::view::{AvailabilityFilter, CategoryFilter, FleetFilter};

pub use commands::{
    AddCommand, ClearCommand, ConfigCommand, ConfirmedCommand, DriverCommand, OutputFormat,
    StatusCommand, TargetCommand,
};

/// fleetctl - Keep track of your vehicles
///
/// Add vehicles, assign drivers, mark them available or not, and list them
/// by category and availability.
#[derive(Debug, Parser)]
#[command(name = "fleetctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Only show this category ("All" for every category)
    #[arg(long, global = true, default_value = "All", value_name = "CATEGORY")]
    pub filter_category: String,

    /// Only show vehicles with this availability
    #[arg(
        long,
        global = true,
        default_value = "All",
        value_name = "All|Available|Unavailable"
    )]
    pub filter_availability: AvailabilityFilter,

    /// How to paint fleet views
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a vehicle
    Add(AddCommand),

    /// List vehicles using the active filters
    List,

    /// Change a vehicle's driver
    Driver(DriverCommand),

    /// Flip a vehicle's availability
    Toggle(TargetCommand),

    /// Delete a vehicle
    Delete(ConfirmedCommand),

    /// Delete every vehicle
    Clear(ClearCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }

    /// The filter selected by `--filter-category` and `--filter-availability`.
    #[must_use]
    pub fn filter(&self) -> FleetFilter {
        FleetFilter::new(
            CategoryFilter::from_value(&self.filter_category),
            self.filter_availability,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "fleetctl");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(
            parse(&["fleetctl", "-q", "list"]).verbosity(),
            crate::logging::Verbosity::Quiet
        );
        assert_eq!(
            parse(&["fleetctl", "list"]).verbosity(),
            crate::logging::Verbosity::Normal
        );
        assert_eq!(
            parse(&["fleetctl", "-v", "list"]).verbosity(),
            crate::logging::Verbosity::Verbose
        );
        assert_eq!(
            parse(&["fleetctl", "-vv", "list"]).verbosity(),
            crate::logging::Verbosity::Trace
        );
    }

    #[test]
    fn test_parse_add() {
        let cli = parse(&[
            "fleetctl", "add", "--reg-no", "KA01AB1234", "--category", "Truck", "--driver",
            "Asha",
        ]);
        let Command::Add(add) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(add.reg_no, "KA01AB1234");
        assert!(!add.unavailable);
    }

    #[test]
    fn test_parse_add_requires_fields() {
        assert!(Cli::try_parse_from(["fleetctl", "add", "--reg-no", "X"]).is_err());
    }

    #[test]
    fn test_default_filter_is_all() {
        assert!(parse(&["fleetctl", "list"]).filter().is_unfiltered());
    }

    #[test]
    fn test_parse_filters() {
        let cli = parse(&[
            "fleetctl",
            "list",
            "--filter-category",
            "Truck",
            "--filter-availability",
            "unavailable",
        ]);
        assert_eq!(
            cli.filter(),
            FleetFilter::new(
                CategoryFilter::Only("Truck".to_string()),
                AvailabilityFilter::Unavailable
            )
        );
    }

    #[test]
    fn test_parse_bad_availability() {
        let result = Cli::try_parse_from(["fleetctl", "list", "--filter-availability", "sometimes"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_delete_yes() {
        let cli = parse(&["fleetctl", "delete", "f_1", "--yes"]);
        assert!(matches!(cli.command, Command::Delete(ConfirmedCommand { yes: true, .. })));
    }

    #[test]
    fn test_parse_driver_with_name() {
        let cli = parse(&["fleetctl", "driver", "f_1", "--name", "Ravi"]);
        let Command::Driver(cmd) = cli.command else {
            panic!("expected driver");
        };
        assert_eq!(cmd.id, "f_1");
        assert_eq!(cmd.name.as_deref(), Some("Ravi"));
    }

    #[test]
    fn test_parse_format() {
        let cli = parse(&["fleetctl", "--format", "html", "list"]);
        assert_eq!(cli.format, OutputFormat::Html);
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["fleetctl", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }
}
