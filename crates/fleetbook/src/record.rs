//! Fleet record types.
//!
//! A [`FleetRecord`] is one vehicle entry. Records are only ever created from a
//! [`FleetForm`] draft by [`crate::manager::FleetManager::create`].

use serde::{Deserialize, Serialize};

/// Placeholder thumbnail used when a record carries no image.
pub const DEFAULT_IMAGE: &str = "https://images.unsplash.com/photo-1542362567-b07e54358753?q=80&w=800&auto=format&fit=crop&ixlib=rb-4.0.3&s=3c3d4085d9b3d7e5d1f8e02d8f5b3f2e";

/// Prefix of every generated record id.
const ID_PREFIX: &str = "f_";

/// Number of random characters following the prefix.
const ID_RANDOM_LEN: usize = 12;

/// One vehicle in the fleet.
///
/// Field names are persisted in camelCase so payloads stay compatible with
/// the `{id, regNo, category, driver, isAvailable, image}` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetRecord {
    /// Opaque unique identifier, immutable once assigned.
    pub id: String,

    /// Registration number.
    pub reg_no: String,

    /// Free-form category tag such as `Truck` or `Bus`.
    pub category: String,

    /// Name of the assigned driver. Never blank.
    pub driver: String,

    /// Whether the vehicle is available for dispatch.
    #[serde(default)]
    pub is_available: bool,

    /// Thumbnail URL. Empty means "use the placeholder".
    #[serde(default)]
    pub image: String,
}

impl FleetRecord {
    /// The image to display, falling back to [`DEFAULT_IMAGE`].
    #[must_use]
    pub fn image_or_default(&self) -> &str {
        if self.image.trim().is_empty() {
            DEFAULT_IMAGE
        } else {
            &self.image
        }
    }

    /// Human-readable availability label.
    #[must_use]
    pub fn availability_label(&self) -> &'static str {
        if self.is_available {
            "Available"
        } else {
            "Unavailable"
        }
    }

    /// Generate an id not used by any record in `existing`.
    #[must_use]
    pub fn generate_id(existing: &[FleetRecord]) -> String {
        loop {
            let candidate = random_id();
            if !existing.iter().any(|r| r.id == candidate) {
                return candidate;
            }
            tracing::debug!("Regenerating colliding fleet id {}", candidate);
        }
    }
}

fn random_id() -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string();
    format!("{ID_PREFIX}{}", &raw[..ID_RANDOM_LEN])
}

/// Input draft for a new fleet record.
///
/// The form is owned by the caller. A successful create resets it; a rejected
/// one leaves it as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetForm {
    /// Registration number as typed.
    pub reg_no: String,
    /// Selected category.
    pub category: String,
    /// Driver name as typed.
    pub driver: String,
    /// Availability checkbox.
    pub is_available: bool,
    /// Optional thumbnail URL.
    pub image: Option<String>,
}

impl Default for FleetForm {
    fn default() -> Self {
        Self {
            reg_no: String::new(),
            category: String::new(),
            driver: String::new(),
            is_available: true,
            image: None,
        }
    }
}

impl FleetForm {
    /// Create a filled-in form.
    #[must_use]
    pub fn new(
        reg_no: impl Into<String>,
        category: impl Into<String>,
        driver: impl Into<String>,
        is_available: bool,
    ) -> Self {
        Self {
            reg_no: reg_no.into(),
            category: category.into(),
            driver: driver.into(),
            is_available,
            image: None,
        }
    }

    /// Set the thumbnail URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Whether every required field is present once trimmed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.reg_no.trim().is_empty()
            && !self.category.trim().is_empty()
            && !self.driver.trim().is_empty()
    }

    /// Build a record from this form, or `None` if a required field is blank.
    ///
    /// Values are trimmed. A missing or blank image becomes `default_image`.
    #[must_use]
    pub fn to_record(&self, id: String, default_image: &str) -> Option<FleetRecord> {
        if !self.is_complete() {
            return None;
        }
        let image = self
            .image
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(default_image);
        Some(FleetRecord {
            id,
            reg_no: self.reg_no.trim().to_string(),
            category: self.category.trim().to_string(),
            driver: self.driver.trim().to_string(),
            is_available: self.is_available,
            image: image.to_string(),
        })
    }

    /// Return the form to its empty state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
