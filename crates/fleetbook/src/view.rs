//! Filtered projection of the fleet collection.
//!
//! [`project`] is pure: it takes the full collection and a [`FleetFilter`] and
//! returns display-ready cards. Painting them is left to a
//! [`crate::surface::Surface`].

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::record::FleetRecord;

/// Text shown in place of cards when nothing matches.
pub const EMPTY_PLACEHOLDER: &str = "No fleets to show.";

/// Filter keyword meaning "do not narrow this dimension".
pub const ALL: &str = "All";

/// Category dimension of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Keep every category.
    #[default]
    All,
    /// Keep only this exact category.
    Only(String),
}

impl CategoryFilter {
    /// Build from a control value, where `"All"` or blank means all.
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        if value.is_empty() || value == ALL {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }

    /// Whether `record` passes this filter.
    #[must_use]
    pub fn matches(&self, record: &FleetRecord) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => record.category == *category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(category) => f.write_str(category),
        }
    }
}

/// Availability dimension of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvailabilityFilter {
    /// Keep every record.
    #[default]
    All,
    /// Keep records with `is_available == true`.
    Available,
    /// Keep records with `is_available == false`.
    Unavailable,
}

impl AvailabilityFilter {
    /// Whether `record` passes this filter.
    #[must_use]
    pub fn matches(self, record: &FleetRecord) -> bool {
        match self {
            Self::All => true,
            Self::Available => record.is_available,
            Self::Unavailable => !record.is_available,
        }
    }
}

impl fmt::Display for AvailabilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Available => f.write_str("Available"),
            Self::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// An availability value that is not `All`, `Available` or `Unavailable`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown availability filter '{0}' (expected All, Available or Unavailable)")]
pub struct UnknownAvailability(pub String);

impl FromStr for AvailabilityFilter {
    type Err = UnknownAvailability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "available" => Ok(Self::Available),
            "unavailable" => Ok(Self::Unavailable),
            _ => Err(UnknownAvailability(s.to_string())),
        }
    }
}

/// The pair of criteria narrowing the displayed records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FleetFilter {
    /// Category criterion.
    pub category: CategoryFilter,
    /// Availability criterion.
    pub availability: AvailabilityFilter,
}

impl FleetFilter {
    /// Filter that keeps everything.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Build from the two control values.
    #[must_use]
    pub fn new(category: CategoryFilter, availability: AvailabilityFilter) -> Self {
        Self {
            category,
            availability,
        }
    }

    /// Whether both dimensions are `All`.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.category == CategoryFilter::All && self.availability == AvailabilityFilter::All
    }

    /// Whether `record` passes both dimensions.
    #[must_use]
    pub fn matches(&self, record: &FleetRecord) -> bool {
        self.category.matches(record) && self.availability.matches(record)
    }
}

/// What a card's action control does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Prompt for a new driver name.
    UpdateDriver,
    /// Flip the availability flag.
    ToggleAvailability,
    /// Remove the record after confirmation.
    Delete,
}

impl ActionKind {
    /// Short action tag used by markup surfaces.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::UpdateDriver => "update",
            Self::ToggleAvailability => "toggle",
            Self::Delete => "delete",
        }
    }
}

/// An action control attached to a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardAction {
    /// What the control does.
    pub kind: ActionKind,
    /// Button caption.
    pub label: &'static str,
}

/// Display-ready form of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordCard {
    /// Record id the actions target.
    pub id: String,
    /// Registration number.
    pub reg_no: String,
    /// Category tag.
    pub category: String,
    /// `Available` or `Unavailable`.
    pub availability: &'static str,
    /// Raw availability flag.
    pub is_available: bool,
    /// Driver name.
    pub driver: String,
    /// Image URL, placeholder applied.
    pub image: String,
    /// Update driver, toggle availability, delete.
    pub actions: Vec<CardAction>,
}

impl RecordCard {
    fn from_record(record: &FleetRecord) -> Self {
        let toggle_label = if record.is_available {
            "Set Unavailable"
        } else {
            "Set Available"
        };
        Self {
            id: record.id.clone(),
            reg_no: record.reg_no.clone(),
            category: record.category.clone(),
            availability: record.availability_label(),
            is_available: record.is_available,
            driver: record.driver.clone(),
            image: record.image_or_default().to_string(),
            actions: vec![
                CardAction {
                    kind: ActionKind::UpdateDriver,
                    label: "Update Driver",
                },
                CardAction {
                    kind: ActionKind::ToggleAvailability,
                    label: toggle_label,
                },
                CardAction {
                    kind: ActionKind::Delete,
                    label: "Delete",
                },
            ],
        }
    }
}

/// A rendered view: the matching cards plus the unfiltered total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FleetView {
    /// Cards in collection order.
    pub cards: Vec<RecordCard>,
    /// Size of the whole collection, ignoring filters.
    pub total: usize,
}

impl FleetView {
    /// Whether no record matched; surfaces show [`EMPTY_PLACEHOLDER`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards shown.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Ids of the cards shown, in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(|c| c.id.as_str())
    }
}

/// Project `records` through `filter`, preserving order.
#[must_use]
pub fn project(records: &[FleetRecord], filter: &FleetFilter) -> FleetView {
    FleetView {
        cards: records
            .iter()
            .filter(|r| filter.matches(r))
            .map(RecordCard::from_record)
            .collect(),
        total: records.len(),
    }
}
