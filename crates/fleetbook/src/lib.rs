//! `fleetbook` - A small fleet inventory kept in a local key-value store
//!
//! Vehicles are stored as one JSON array under one key. The [`FleetManager`]
//! loads that array, applies a single change, writes it back and renders a
//! filtered [`FleetView`] for a [`Surface`] to paint.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod manager;
pub mod prompt;
pub mod record;
pub mod repository;
pub mod storage;
pub mod surface;
pub mod view;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use manager::{FleetManager, Outcome};
pub use prompt::{Prompter, ScriptedPrompter, TerminalPrompter};
pub use record::{FleetForm, FleetRecord, DEFAULT_IMAGE};
pub use repository::FleetRepository;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use surface::{HtmlSurface, JsonSurface, Surface, TextSurface};
pub use view::{AvailabilityFilter, CategoryFilter, FleetFilter, FleetView};
