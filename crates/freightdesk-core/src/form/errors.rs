// SPDX-License-Identifier: AGPL-3.0
// Freightdesk Core - Sparse error map
//
// Local validation and server-side validation both land in `FormErrors`,
// so the UI renders one shape no matter where an error came from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Errors of one collection row, keyed by field
pub type RowErrors = BTreeMap<String, String>;

/// One top-level entry of the error map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorNode {
    /// Message for a scalar field
    Message(String),
    /// Per-row errors of a collection; rows without errors are absent
    Rows(BTreeMap<usize, RowErrors>),
}

/// Field-keyed error map. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, ErrorNode>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert_message(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.insert(key.into(), ErrorNode::Message(message.into()));
    }

    /// Record row errors for a collection; an empty row map records nothing
    pub fn insert_rows(&mut self, key: impl Into<String>, rows: BTreeMap<usize, RowErrors>) {
        if !rows.is_empty() {
            self.0.insert(key.into(), ErrorNode::Rows(rows));
        }
    }

    /// Message of a scalar field
    pub fn message(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(ErrorNode::Message(message)) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Errors of one row of a collection
    pub fn row(&self, collection: &str, index: usize) -> Option<&RowErrors> {
        match self.0.get(collection) {
            Some(ErrorNode::Rows(rows)) => rows.get(&index),
            _ => None,
        }
    }

    /// All rows of a collection that have errors
    pub fn rows(&self, collection: &str) -> Option<&BTreeMap<usize, RowErrors>> {
        match self.0.get(collection) {
            Some(ErrorNode::Rows(rows)) => Some(rows),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ErrorNode)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The first scalar message, in key order
    pub fn first_message(&self) -> Option<&str> {
        self.0.values().find_map(|node| match node {
            ErrorNode::Message(message) => Some(message.as_str()),
            ErrorNode::Rows(_) => None,
        })
    }

    /// The subset of errors that belong to one form step
    pub fn for_step(&self, step: FormStep) -> FormErrors {
        FormErrors(
            self.0
                .iter()
                .filter(|(key, _)| step.keys().contains(&key.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    pub fn step_is_valid(&self, step: FormStep) -> bool {
        !step.keys().iter().any(|key| self.0.contains_key(*key))
    }
}

/// Pages of the multi-step contact form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormStep {
    Identity,
    Contact,
    Financial,
    Addresses,
    Authorities,
}

impl FormStep {
    pub const ALL: [FormStep; 5] = [
        FormStep::Identity,
        FormStep::Contact,
        FormStep::Financial,
        FormStep::Addresses,
        FormStep::Authorities,
    ];

    /// Top-level error keys shown on this step
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            Self::Identity => &["name", "shortName", "contactType", "legalType"],
            Self::Contact => &["email", "phone", "fax", "address", "country", "state", "city"],
            Self::Financial => &["taxNumber", "taxOffice", "currency", "paymentTermDays", "riskLimit"],
            Self::Addresses => &["addresses"],
            Self::Authorities => &["authorities"],
        }
    }

    pub fn next(&self) -> Option<FormStep> {
        let position = Self::ALL.iter().position(|s| s == self)?;
        Self::ALL.get(position + 1).copied()
    }

    pub fn previous(&self) -> Option<FormStep> {
        let position = Self::ALL.iter().position(|s| s == self)?;
        position.checked_sub(1).map(|p| Self::ALL[p])
    }

    /// Step that shows a given top-level error key
    pub fn for_key(key: &str) -> Option<FormStep> {
        Self::ALL.into_iter().find(|step| step.keys().contains(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rows_are_not_recorded() {
        let mut errors = FormErrors::new();
        errors.insert_rows("addresses", BTreeMap::new());
        assert!(errors.is_valid());
    }

    #[test]
    fn test_serializes_as_nested_map() {
        let mut errors = FormErrors::new();
        errors.insert_message("name", "Name is required");
        let mut row = RowErrors::new();
        row.insert("city".to_string(), "City is required".to_string());
        errors.insert_rows("addresses", BTreeMap::from([(1, row)]));

        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "Name is required",
                "addresses": { "1": { "city": "City is required" } }
            })
        );
    }

    #[test]
    fn test_step_filtering() {
        let mut errors = FormErrors::new();
        errors.insert_message("name", "Name is required");
        errors.insert_message("taxNumber", "Tax number must be 10 or 11 digits");

        assert!(!errors.step_is_valid(FormStep::Identity));
        assert!(errors.step_is_valid(FormStep::Contact));
        assert_eq!(errors.for_step(FormStep::Financial).len(), 1);
        assert_eq!(FormStep::for_key("riskLimit"), Some(FormStep::Financial));
    }

    #[test]
    fn test_every_field_key_belongs_to_one_step() {
        let keys = [
            "name",
            "shortName",
            "contactType",
            "legalType",
            "email",
            "phone",
            "fax",
            "address",
            "country",
            "state",
            "city",
            "taxNumber",
            "taxOffice",
            "currency",
            "paymentTermDays",
            "riskLimit",
            "addresses",
            "authorities",
        ];
        for key in keys {
            let owners = FormStep::ALL
                .iter()
                .filter(|step| step.keys().contains(&key))
                .count();
            assert_eq!(owners, 1, "{} should belong to exactly one step", key);
        }
        assert_eq!(FormStep::for_key("shortName"), Some(FormStep::Identity));
        assert_eq!(FormStep::for_key("currency"), Some(FormStep::Financial));
        assert_eq!(FormStep::for_key("non_field_errors"), None);
    }

    #[test]
    fn test_step_navigation() {
        assert_eq!(FormStep::Identity.next(), Some(FormStep::Contact));
        assert_eq!(FormStep::Authorities.next(), None);
        assert_eq!(FormStep::Identity.previous(), None);
        assert_eq!(FormStep::Addresses.previous(), Some(FormStep::Financial));
    }

    #[test]
    fn test_first_message_skips_rows() {
        let mut errors = FormErrors::new();
        let mut row = RowErrors::new();
        row.insert("name".to_string(), "Authority name is required".to_string());
        errors.insert_rows("authorities", BTreeMap::from([(0, row)]));
        errors.insert_message("email", "Enter a valid email address");

        assert_eq!(errors.first_message(), Some("Enter a valid email address"));
    }
}
