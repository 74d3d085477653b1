//! Fleet operations.
//!
//! Every mutation follows the same cycle: load the whole collection, locate
//! the target by id, apply the change, save the whole collection, and render
//! again with the active filter. A missing id is a no-op.

use tracing::{debug, info};

use crate::error::Result;
use crate::prompt::Prompter;
use crate::record::{FleetForm, FleetRecord, DEFAULT_IMAGE};
use crate::repository::FleetRepository;
use crate::storage::KeyValueStore;
use crate::view::{self, FleetFilter, FleetView};

/// Notice shown when a create is missing required fields.
pub const MISSING_FIELDS_NOTICE: &str = "Please fill Reg No, Category and Driver.";

/// Notice shown when a driver update is blank.
pub const EMPTY_DRIVER_NOTICE: &str = "Driver name cannot be empty.";

/// Question asked before deleting a record.
pub const DELETE_QUESTION: &str = "Delete this vehicle?";

/// Question asked before wiping the collection.
pub const CLEAR_ALL_QUESTION: &str = "Clear all fleets from storage?";

/// Prompt for a new driver name.
pub const DRIVER_PROMPT: &str = "Enter new driver name:";

/// Result of a fleet operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A record was appended.
    Created {
        /// The stored record.
        record: FleetRecord,
        /// The view rendered after the change.
        view: FleetView,
    },
    /// A record's driver or availability changed.
    Updated {
        /// The record after the change.
        record: FleetRecord,
        /// The view rendered after the change.
        view: FleetView,
    },
    /// A record was removed.
    Deleted {
        /// The removed record.
        record: FleetRecord,
        /// The view rendered after the change.
        view: FleetView,
    },
    /// The whole collection was erased.
    Cleared {
        /// The view rendered after the change.
        view: FleetView,
    },
    /// Input failed validation; the notice was shown and nothing was saved.
    Rejected {
        /// The notice shown to the user.
        notice: &'static str,
    },
    /// The user declined a confirmation or cancelled an input.
    Declined,
    /// No record has the requested id.
    NotFound {
        /// The id that was looked up.
        id: String,
    },
}

impl Outcome {
    /// The refreshed view, if the operation changed anything.
    #[must_use]
    pub fn view(&self) -> Option<&FleetView> {
        match self {
            Self::Created { view, .. }
            | Self::Updated { view, .. }
            | Self::Deleted { view, .. }
            | Self::Cleared { view } => Some(view),
            Self::Rejected { .. } | Self::Declined | Self::NotFound { .. } => None,
        }
    }

    /// Whether the collection was changed and persisted.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.view().is_some()
    }
}

/// Owns the fleet repository and the active filter.
#[derive(Debug)]
pub struct FleetManager<S> {
    repository: FleetRepository<S>,
    filter: FleetFilter,
    default_image: String,
}

impl<S: KeyValueStore> FleetManager<S> {
    /// Create a manager with no active filter and the built-in placeholder image.
    #[must_use]
    pub fn new(repository: FleetRepository<S>) -> Self {
        Self {
            repository,
            filter: FleetFilter::all(),
            default_image: DEFAULT_IMAGE.to_string(),
        }
    }

    /// Use a different placeholder for records created without an image.
    #[must_use]
    pub fn with_default_image(mut self, image: impl Into<String>) -> Self {
        self.default_image = image.into();
        self
    }

    /// Start with the given filter active.
    #[must_use]
    pub fn with_filter(mut self, filter: FleetFilter) -> Self {
        self.filter = filter;
        self
    }

    /// The active filter.
    #[must_use]
    pub fn filter(&self) -> &FleetFilter {
        &self.filter
    }

    /// Borrow the repository.
    #[must_use]
    pub fn repository(&self) -> &FleetRepository<S> {
        &self.repository
    }

    /// Load the whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn records(&self) -> Result<Vec<FleetRecord>> {
        self.repository.load()
    }

    /// Render the collection through the active filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn render(&self) -> Result<FleetView> {
        let records = self.repository.load()?;
        Ok(view::project(&records, &self.filter))
    }

    /// Replace the active filter and render.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn apply_filter(&mut self, filter: FleetFilter) -> Result<FleetView> {
        debug!(
            "Filter changed to category={} availability={}",
            filter.category, filter.availability
        );
        self.filter = filter;
        self.render()
    }

    /// Reset both filter dimensions to `All` and render.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn clear_filters(&mut self) -> Result<FleetView> {
        self.apply_filter(FleetFilter::all())
    }

    /// Create a record from `form`.
    ///
    /// A form missing a required field is rejected with a notice and left
    /// untouched. On success the form is reset.
    ///
    /// # Errors
    ///
    /// Returns an error if the store or the prompter fails.
    pub fn create(&mut self, form: &mut FleetForm, prompter: &mut dyn Prompter) -> Result<Outcome> {
        let mut records = self.repository.load()?;
        let id = FleetRecord::generate_id(&records);

        let Some(record) = form.to_record(id, &self.default_image) else {
            prompter.notify(MISSING_FIELDS_NOTICE)?;
            return Ok(Outcome::Rejected {
                notice: MISSING_FIELDS_NOTICE,
            });
        };

        records.push(record.clone());
        self.repository.save(&records)?;
        form.reset();
        info!("Added fleet {} ({})", record.id, record.reg_no);

        Ok(Outcome::Created {
            record,
            view: self.render()?,
        })
    }

    /// Ask for a new driver name and store it trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store or the prompter fails.
    pub fn update_driver(&mut self, id: &str, prompter: &mut dyn Prompter) -> Result<Outcome> {
        let mut records = self.repository.load()?;
        let Some(idx) = position(&records, id) else {
            return Ok(not_found(id));
        };

        let Some(name) = prompter.input(DRIVER_PROMPT, &records[idx].driver)? else {
            return Ok(Outcome::Declined);
        };
        let cleaned = name.trim();
        if cleaned.is_empty() {
            prompter.notify(EMPTY_DRIVER_NOTICE)?;
            return Ok(Outcome::Rejected {
                notice: EMPTY_DRIVER_NOTICE,
            });
        }

        records[idx].driver = cleaned.to_string();
        self.repository.save(&records)?;
        info!("Updated driver of fleet {}", id);

        Ok(Outcome::Updated {
            record: records.swap_remove(idx),
            view: self.render()?,
        })
    }

    /// Flip a record's availability.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn toggle_availability(&mut self, id: &str) -> Result<Outcome> {
        let mut records = self.repository.load()?;
        let Some(idx) = position(&records, id) else {
            return Ok(not_found(id));
        };

        records[idx].is_available = !records[idx].is_available;
        self.repository.save(&records)?;
        info!(
            "Fleet {} is now {}",
            id,
            records[idx].availability_label().to_lowercase()
        );

        Ok(Outcome::Updated {
            record: records.swap_remove(idx),
            view: self.render()?,
        })
    }

    /// Remove a record after confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error if the store or the prompter fails.
    pub fn delete(&mut self, id: &str, prompter: &mut dyn Prompter) -> Result<Outcome> {
        let mut records = self.repository.load()?;
        let Some(idx) = position(&records, id) else {
            return Ok(not_found(id));
        };

        if !prompter.confirm(DELETE_QUESTION)? {
            return Ok(Outcome::Declined);
        }

        let record = records.remove(idx);
        self.repository.save(&records)?;
        info!("Deleted fleet {} ({})", record.id, record.reg_no);

        Ok(Outcome::Deleted {
            record,
            view: self.render()?,
        })
    }

    /// Erase the whole persisted collection after confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error if the store or the prompter fails.
    pub fn clear_all(&mut self, prompter: &mut dyn Prompter) -> Result<Outcome> {
        if !prompter.confirm(CLEAR_ALL_QUESTION)? {
            return Ok(Outcome::Declined);
        }

        self.repository.clear()?;
        info!("Cleared all fleets under key {}", self.repository.key());

        Ok(Outcome::Cleared {
            view: self.render()?,
        })
    }
}

fn position(records: &[FleetRecord], id: &str) -> Option<usize> {
    records.iter().position(|r| r.id == id)
}

fn not_found(id: &str) -> Outcome {
    debug!("No fleet with id {}", id);
    Outcome::NotFound { id: id.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{ScriptedPrompter, TerminalPrompter};
    use crate::storage::{MemoryStore, SqliteStore};
    use crate::view::{AvailabilityFilter, CategoryFilter};

    fn manager() -> FleetManager<MemoryStore> {
        FleetManager::new(FleetRepository::new(MemoryStore::new()))
    }

    fn asha_form() -> FleetForm {
        FleetForm::new("KA01AB1234", "Truck", "Asha", true)
    }

    fn add(m: &mut FleetManager<MemoryStore>, form: FleetForm) -> FleetRecord {
        let mut form = form;
        match m.create(&mut form, &mut ScriptedPrompter::new()).unwrap() {
            Outcome::Created { record, .. } => record,
            other => panic!("expected Created, got {other:?}"),
        }
    }

    #[test]
    fn test_create_scenario() {
        let mut m = manager();
        let record = add(&mut m, asha_form());

        assert_eq!(m.records().unwrap().len(), 1);
        assert_eq!(record.image, DEFAULT_IMAGE);

        let view = m.render().unwrap();
        assert_eq!(view.ids().collect::<Vec<_>>(), vec![record.id.as_str()]);

        let view = m
            .apply_filter(FleetFilter::new(
                CategoryFilter::from_value("Truck"),
                AvailabilityFilter::Unavailable,
            ))
            .unwrap();
        assert!(view.is_empty());
        assert_eq!(view.total, 1);
    }

    #[test]
    fn test_create_grows_by_one_with_unique_id() {
        let mut m = manager();
        for i in 0..20 {
            let before = m.records().unwrap();
            let record = add(&mut m, FleetForm::new(format!("R{i}"), "Van", "D", i % 2 == 0));
            let after = m.records().unwrap();

            assert_eq!(after.len(), before.len() + 1);
            assert!(before.iter().all(|r| r.id != record.id));
            assert_eq!(after.last().unwrap(), &record);
        }
    }

    #[test]
    fn test_create_resets_form() {
        let mut m = manager();
        let mut form = asha_form();
        m.create(&mut form, &mut ScriptedPrompter::new()).unwrap();
        assert_eq!(form, FleetForm::default());
    }

    #[test]
    fn test_create_rejects_missing_fields() {
        let mut m = manager();
        let mut prompter = ScriptedPrompter::new();
        let mut form = FleetForm::new("KA01", "Truck", "   ", true);

        let outcome = m.create(&mut form, &mut prompter).unwrap();

        assert_eq!(
            outcome,
            Outcome::Rejected {
                notice: MISSING_FIELDS_NOTICE
            }
        );
        assert!(!outcome.is_applied());
        assert_eq!(prompter.notices(), [MISSING_FIELDS_NOTICE.to_string()]);
        assert!(m.records().unwrap().is_empty());
        assert!(m.repository().store().is_empty());
        assert_eq!(form.reg_no, "KA01");
    }

    #[test]
    fn test_create_uses_configured_placeholder() {
        let mut m = manager().with_default_image("https://fleet.local/none.png");
        let record = add(&mut m, asha_form());
        assert_eq!(record.image, "https://fleet.local/none.png");
    }

    #[test]
    fn test_update_driver_trims() {
        let mut m = manager();
        let id = add(&mut m, asha_form()).id;
        let mut prompter = ScriptedPrompter::new().with_input("  Ravi ");

        let outcome = m.update_driver(&id, &mut prompter).unwrap();

        assert!(outcome.is_applied());
        assert_eq!(m.records().unwrap()[0].driver, "Ravi");
        assert_eq!(outcome.view().unwrap().cards[0].driver, "Ravi");
    }

    #[test]
    fn test_update_driver_empty_rejected() {
        let mut m = manager();
        let id = add(&mut m, asha_form()).id;
        let mut prompter = ScriptedPrompter::new().with_input("");

        let outcome = m.update_driver(&id, &mut prompter).unwrap();

        assert_eq!(
            outcome,
            Outcome::Rejected {
                notice: EMPTY_DRIVER_NOTICE
            }
        );
        assert_eq!(prompter.notices(), [EMPTY_DRIVER_NOTICE.to_string()]);
        assert_eq!(m.records().unwrap()[0].driver, "Asha");
    }

    #[test]
    fn test_update_driver_empty_terminal_line_rejected() {
        let mut m = manager();
        let id = add(&mut m, asha_form()).id;
        let mut prompter =
            TerminalPrompter::new(std::io::Cursor::new(b"\n".to_vec()), Vec::<u8>::new());

        let outcome = m.update_driver(&id, &mut prompter).unwrap();

        assert_eq!(
            outcome,
            Outcome::Rejected {
                notice: EMPTY_DRIVER_NOTICE
            }
        );
        assert_eq!(m.records().unwrap()[0].driver, "Asha");
    }

    #[test]
    fn test_update_driver_whitespace_rejected() {
        let mut m = manager();
        let id = add(&mut m, asha_form()).id;
        let outcome = m
            .update_driver(&id, &mut ScriptedPrompter::new().with_input(" \t "))
            .unwrap();
        assert!(matches!(outcome, Outcome::Rejected { .. }));
        assert_eq!(m.records().unwrap()[0].driver, "Asha");
    }

    #[test]
    fn test_update_driver_cancel() {
        let mut m = manager();
        let id = add(&mut m, asha_form()).id;
        let mut prompter = ScriptedPrompter::new().with_cancel();

        let outcome = m.update_driver(&id, &mut prompter).unwrap();

        assert_eq!(outcome, Outcome::Declined);
        assert!(prompter.notices().is_empty());
        assert_eq!(m.records().unwrap()[0].driver, "Asha");
    }

    #[test]
    fn test_update_driver_unknown_id() {
        let mut m = manager();
        add(&mut m, asha_form());
        let outcome = m
            .update_driver("f_missing", &mut ScriptedPrompter::new().with_input("Ravi"))
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::NotFound {
                id: "f_missing".to_string()
            }
        );
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut m = manager();
        let id = add(&mut m, asha_form()).id;

        let first = m.toggle_availability(&id).unwrap();
        assert!(!m.records().unwrap()[0].is_available);
        assert_eq!(first.view().unwrap().cards[0].availability, "Unavailable");

        m.toggle_availability(&id).unwrap();
        assert!(m.records().unwrap()[0].is_available);
    }

    #[test]
    fn test_toggle_unknown_id() {
        let mut m = manager();
        add(&mut m, asha_form());
        let before = m.records().unwrap();
        assert!(matches!(
            m.toggle_availability("nope").unwrap(),
            Outcome::NotFound { .. }
        ));
        assert_eq!(m.records().unwrap(), before);
    }

    #[test]
    fn test_toggle_rerenders_with_active_filter() {
        let mut m = manager();
        let id = add(&mut m, asha_form()).id;
        m.apply_filter(FleetFilter::new(CategoryFilter::All, AvailabilityFilter::Available))
            .unwrap();

        let outcome = m.toggle_availability(&id).unwrap();
        let view = outcome.view().unwrap();
        assert!(view.is_empty());
        assert_eq!(view.total, 1);
    }

    #[test]
    fn test_delete_confirmed_removes_exactly_one() {
        let mut m = manager();
        let a = add(&mut m, FleetForm::new("A", "Truck", "D", true)).id;
        let b = add(&mut m, FleetForm::new("B", "Bus", "D", true)).id;
        let c = add(&mut m, FleetForm::new("C", "Van", "D", true)).id;

        let outcome = m.delete(&b, &mut ScriptedPrompter::confirming()).unwrap();

        assert!(matches!(outcome, Outcome::Deleted { ref record, .. } if record.id == b));
        let ids: Vec<String> = m.records().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_delete_declined() {
        let mut m = manager();
        let id = add(&mut m, asha_form()).id;

        let outcome = m
            .delete(&id, &mut ScriptedPrompter::new().with_confirmation(false))
            .unwrap();

        assert_eq!(outcome, Outcome::Declined);
        assert_eq!(m.records().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_unknown_id_leaves_collection() {
        let mut m = manager();
        add(&mut m, asha_form());
        let before = m.records().unwrap();

        let outcome = m
            .delete("f_ghost", &mut ScriptedPrompter::confirming())
            .unwrap();

        assert!(matches!(outcome, Outcome::NotFound { .. }));
        assert_eq!(m.records().unwrap(), before);
    }

    #[test]
    fn test_clear_all_confirmed() {
        let mut m = manager();
        add(&mut m, asha_form());
        add(&mut m, FleetForm::new("B", "Bus", "D", false));
        m.apply_filter(FleetFilter::new(
            CategoryFilter::from_value("Bus"),
            AvailabilityFilter::All,
        ))
        .unwrap();

        let outcome = m.clear_all(&mut ScriptedPrompter::confirming()).unwrap();

        let view = outcome.view().unwrap();
        assert!(view.is_empty());
        assert_eq!(view.total, 0);
        assert!(m.records().unwrap().is_empty());
        assert!(m.repository().store().is_empty());
    }

    #[test]
    fn test_clear_all_declined() {
        let mut m = manager();
        add(&mut m, asha_form());
        let outcome = m.clear_all(&mut ScriptedPrompter::new()).unwrap();
        assert_eq!(outcome, Outcome::Declined);
        assert_eq!(m.records().unwrap().len(), 1);
    }

    #[test]
    fn test_clear_filters() {
        let mut m = manager();
        add(&mut m, asha_form());
        add(&mut m, FleetForm::new("B", "Bus", "D", false));

        let narrowed = m
            .apply_filter(FleetFilter::new(
                CategoryFilter::from_value("Bus"),
                AvailabilityFilter::All,
            ))
            .unwrap();
        assert_eq!(narrowed.len(), 1);

        let all = m.clear_filters().unwrap();
        assert_eq!(all.len(), 2);
        assert!(m.filter().is_unfiltered());
    }

    #[test]
    fn test_filter_does_not_touch_storage() {
        let mut m = manager();
        add(&mut m, asha_form());
        let before = m.repository().store().get("fleets_v1").unwrap();
        m.apply_filter(FleetFilter::new(
            CategoryFilter::from_value("Van"),
            AvailabilityFilter::Unavailable,
        ))
        .unwrap();
        assert_eq!(m.repository().store().get("fleets_v1").unwrap(), before);
    }

    #[test]
    fn test_render_recovers_from_corrupt_payload() {
        let mut store = MemoryStore::new();
        store.set("fleets_v1", "<<garbage>>").unwrap();
        let mut m = FleetManager::new(FleetRepository::new(store));

        assert!(m.render().unwrap().is_empty());

        let record = add(&mut m, asha_form());
        assert_eq!(m.records().unwrap(), vec![record]);
    }

    #[test]
    fn test_works_over_sqlite() {
        let repo = FleetRepository::new(SqliteStore::open_in_memory().unwrap());
        let mut m = FleetManager::new(repo);
        let mut form = asha_form();
        let outcome = m.create(&mut form, &mut ScriptedPrompter::new()).unwrap();
        let Outcome::Created { record, .. } = outcome else {
            panic!("expected Created");
        };

        m.toggle_availability(&record.id).unwrap();
        let stored = m.records().unwrap();
        assert_eq!(stored.len(), 1);
        assert!(!stored[0].is_available);
    }
}
