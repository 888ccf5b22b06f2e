// SPDX-License-Identifier: AGPL-3.0
// Freightdesk Core - Field store
//
// Holds the one draft a form session edits. There is no history: each
// dispatch replaces the snapshot.

use crate::form::action::{reduce, FormAction};
use crate::form::draft::ContactDraft;
use crate::form::errors::FormErrors;
use crate::form::validate::validate;
use crate::wire::ContactRecord;
use std::sync::OnceLock;

/// Owner of a form session's draft
#[derive(Debug, Clone, Default)]
pub struct FieldStore {
    snapshot: ContactDraft,
    /// Snapshot as of the last load or reset, for dirty tracking
    baseline: ContactDraft,
    /// Validation result for `snapshot`, cleared on every dispatch
    errors: OnceLock<FormErrors>,
}

impl FieldStore {
    /// Store holding a blank draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Store hydrated from a fetched record
    pub fn from_record(record: &ContactRecord) -> Self {
        let snapshot = ContactDraft::from_record(record);
        Self {
            baseline: snapshot.clone(),
            snapshot,
            errors: OnceLock::new(),
        }
    }

    /// Apply one action and replace the snapshot with its result
    pub fn dispatch(&mut self, action: FormAction) {
        tracing::trace!(action = action.kind(), "Dispatching form action");

        let rebases = matches!(action, FormAction::LoadFromSource { .. } | FormAction::Reset);
        self.snapshot = reduce(&self.snapshot, action);
        self.errors = OnceLock::new();

        if rebases {
            self.baseline = self.snapshot.clone();
        }
    }

    /// The current draft
    pub fn snapshot(&self) -> &ContactDraft {
        &self.snapshot
    }

    /// Validation result for the current draft, computed at most once per snapshot
    pub fn errors(&self) -> &FormErrors {
        self.errors.get_or_init(|| validate(&self.snapshot))
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_valid()
    }

    /// Whether the draft differs from what was last loaded or reset
    pub fn is_dirty(&self) -> bool {
        self.snapshot != self.baseline
    }

    /// Give up the draft, e.g. to hand it to a submission
    pub fn into_snapshot(self) -> ContactDraft {
        self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::action::{AddressField, ContactField};
    use crate::form::draft::LocationOption;
    use crate::form::validate::MSG_NAME_TOO_SHORT;

    #[test]
    fn test_new_store_is_clean_and_invalid() {
        let store = FieldStore::new();
        assert!(!store.is_dirty());
        assert!(!store.is_valid());
        assert!(store.errors().contains("name"));
    }

    #[test]
    fn test_errors_follow_dispatches() {
        let mut store = FieldStore::new();
        store.dispatch(FormAction::SetField(ContactField::Name("A".into())));
        assert_eq!(store.errors().message("name"), Some(MSG_NAME_TOO_SHORT));

        store.dispatch(FormAction::SetField(ContactField::Name("Acme".into())));
        assert!(store.is_valid());
        assert!(store.is_dirty());
    }

    #[test]
    fn test_row_errors_follow_index_shift() {
        let mut store = FieldStore::new();
        store.dispatch(FormAction::SetField(ContactField::Name("Acme".into())));
        store.dispatch(FormAction::AddAddress);
        store.dispatch(FormAction::AddAddress);
        store.dispatch(FormAction::UpdateAddress {
            index: 0,
            change: AddressField::Address("Ataturk Cad. 1".into()),
        });
        store.dispatch(FormAction::UpdateAddress {
            index: 0,
            change: AddressField::City(Some(LocationOption::new(7, "Kadikoy"))),
        });
        assert!(store.errors().row("addresses", 1).is_some());

        store.dispatch(FormAction::RemoveAddress { index: 0 });
        assert!(store.errors().row("addresses", 0).is_some());
        assert!(store.errors().row("addresses", 1).is_none());
    }

    #[test]
    fn test_load_and_reset_rebase_dirty_tracking() {
        let record: ContactRecord =
            serde_json::from_value(serde_json::json!({ "id": 3, "name": "Acme" })).unwrap();

        let mut store = FieldStore::new();
        store.dispatch(FormAction::SetField(ContactField::Fax("123".into())));
        assert!(store.is_dirty());

        store.dispatch(FormAction::LoadFromSource {
            record: Box::new(record.clone()),
        });
        assert!(!store.is_dirty());
        assert_eq!(store.snapshot().fax, "");
        assert_eq!(store.snapshot().id, Some(3));

        store.dispatch(FormAction::Reset);
        assert!(!store.is_dirty());
        assert!(store.snapshot().is_new());

        let hydrated = FieldStore::from_record(&record);
        assert!(hydrated.is_valid());
        assert!(!hydrated.is_dirty());
    }
}
