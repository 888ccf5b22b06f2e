// SPDX-License-Identifier: AGPL-3.0
// Freightdesk Core - Data-access collaborator
//
// The engine never talks HTTP itself. Frontends hand it something that
// implements `ContactApi`.

use crate::form::errors::{FormErrors, RowErrors};
use crate::wire::{error_key_for, ContactPayload, ContactRecord};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::future::Future;

/// Shown when the server gave us nothing better
pub const GENERIC_SAVE_ERROR: &str = "Could not save the contact. Please try again.";

/// Keys servers use for errors that belong to no single field
const NON_FIELD_KEYS: [&str; 2] = ["non_field_errors", "detail"];

/// Failure reported by the data-access collaborator
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Field-level rejection: wire field name -> messages
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Map<String, Value>),

    #[error("{0}")]
    Message(String),

    #[error("Unexpected response status {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// First human-readable string in a message list, or the value itself
fn first_message(value: &Value) -> Option<&str> {
    match value {
        Value::String(message) => Some(message.as_str()),
        Value::Array(items) => items.iter().find_map(first_message),
        _ => None,
    }
}

/// First message found inside nested row objects
fn nested_message(value: &Value) -> Option<&str> {
    match value {
        Value::Object(fields) => fields
            .values()
            .find_map(|value| first_message(value).or_else(|| nested_message(value))),
        Value::Array(items) => items.iter().find_map(nested_message),
        _ => None,
    }
}

/// Flatten one row object of a nested collection error
fn row_errors(value: &Value) -> RowErrors {
    let Value::Object(fields) = value else {
        return RowErrors::new();
    };

    fields
        .iter()
        .filter_map(|(field, messages)| {
            first_message(messages)
                .map(|message| (error_key_for(field).to_string(), message.to_string()))
        })
        .collect()
}

impl ApiError {
    /// Map a structured rejection onto the validator's error shape
    pub fn field_errors(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        let ApiError::Validation(fields) = self else {
            return errors;
        };

        for (field, value) in fields {
            if NON_FIELD_KEYS.contains(&field.as_str()) {
                continue;
            }
            let key = error_key_for(field);

            let rows = match value {
                Value::Array(items) if items.iter().any(Value::is_object) => Some(items),
                _ => None,
            };

            match rows {
                Some(items) => {
                    let rows: BTreeMap<usize, RowErrors> = items
                        .iter()
                        .enumerate()
                        .map(|(index, item)| (index, row_errors(item)))
                        .filter(|(_, row)| !row.is_empty())
                        .collect();
                    errors.insert_rows(key, rows);
                }
                None => {
                    if let Some(message) = first_message(value) {
                        errors.insert_message(key, message);
                    }
                }
            }
        }

        errors
    }

    /// One message suitable for a toast or alert
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation(fields) => NON_FIELD_KEYS
                .iter()
                .filter_map(|key| fields.get(*key).and_then(first_message))
                .next()
                .or_else(|| fields.values().find_map(first_message))
                .or_else(|| fields.values().find_map(nested_message))
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_SAVE_ERROR.to_string()),
            ApiError::Message(message) if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_SAVE_ERROR.to_string(),
        }
    }
}

/// Remote store of contact records
pub trait ContactApi: Send + Sync {
    /// Fetch one record for hydrating an edit form
    fn fetch_record(&self, id: u64)
        -> impl Future<Output = Result<ContactRecord, ApiError>> + Send;

    /// Create (`id == None`) or update a record
    fn submit_record(
        &self,
        id: Option<u64>,
        payload: &ContactPayload,
    ) -> impl Future<Output = Result<ContactRecord, ApiError>> + Send;
}
