// SPDX-License-Identifier: AGPL-3.0
// Freightdesk Core - Derived validation
//
// Validation never blocks an edit. It is recomputed from the draft alone
// and returned as data; the UI decides what to show.

use crate::form::draft::{AddressDraft, AuthorityDraft, ContactDraft};
use crate::form::errors::{FormErrors, RowErrors};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Minimum trimmed length of a contact name
pub const MIN_NAME_CHARS: usize = 2;

pub const MSG_NAME_REQUIRED: &str = "Name is required";
pub const MSG_NAME_TOO_SHORT: &str = "Name must be at least 2 characters";
pub const MSG_EMAIL_INVALID: &str = "Enter a valid email address";
pub const MSG_PHONE_INVALID: &str = "Enter a valid mobile number (5XX XXX XX XX)";
pub const MSG_TAX_NUMBER_INVALID: &str = "Tax number must be 10 or 11 digits";
pub const MSG_RISK_LIMIT_NEGATIVE: &str = "Risk limit cannot be negative";
pub const MSG_ADDRESS_REQUIRED: &str = "Address is required";
pub const MSG_CITY_REQUIRED: &str = "City is required";
pub const MSG_AUTHORITY_NAME_REQUIRED: &str = "Authority name is required";

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

/// Local mobile numbers: ten digits starting with 5
static MOBILE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^5\d{9}$").expect("Invalid mobile regex"));

static TAX_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{10,11}$").expect("Invalid tax number regex"));

/// Trimmed value of an optional text field, `None` when blank
fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Strip the separators people type into phone numbers
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, '-' | '(' | ')')))
        .collect()
}

/// Strip the separators people type into tax numbers
pub fn normalize_tax_number(tax_number: &str) -> String {
    tax_number
        .chars()
        .filter(|c| !(c.is_whitespace() || *c == '-'))
        .collect()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

pub fn is_valid_mobile(phone: &str) -> bool {
    MOBILE_REGEX.is_match(&normalize_phone(phone))
}

pub fn is_valid_tax_number(tax_number: &str) -> bool {
    TAX_NUMBER_REGEX.is_match(&normalize_tax_number(tax_number))
}

fn name_error(name: &str) -> Option<&'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Some(MSG_NAME_REQUIRED)
    } else if trimmed.chars().count() < MIN_NAME_CHARS {
        Some(MSG_NAME_TOO_SHORT)
    } else {
        None
    }
}

fn risk_limit_error(risk_limit: Option<f64>) -> Option<&'static str> {
    match risk_limit {
        Some(limit) if !limit.is_finite() || limit < 0.0 => Some(MSG_RISK_LIMIT_NEGATIVE),
        _ => None,
    }
}

fn address_errors(entry: &AddressDraft) -> RowErrors {
    let mut row = RowErrors::new();
    if present(&entry.address).is_none() {
        row.insert("address".to_string(), MSG_ADDRESS_REQUIRED.to_string());
    }
    if entry.location.city.is_none() {
        row.insert("city".to_string(), MSG_CITY_REQUIRED.to_string());
    }
    row
}

fn authority_errors(entry: &AuthorityDraft) -> RowErrors {
    let mut row = RowErrors::new();
    if present(&entry.name).is_none() {
        row.insert("name".to_string(), MSG_AUTHORITY_NAME_REQUIRED.to_string());
    }
    if let Some(phone) = present(&entry.phone) {
        if !is_valid_mobile(phone) {
            row.insert("phone".to_string(), MSG_PHONE_INVALID.to_string());
        }
    }
    row
}

/// Index rows that failed; rows that passed are left out entirely
fn sparse_rows<'a, T: 'a>(
    entries: impl IntoIterator<Item = &'a T>,
    check: impl Fn(&T) -> RowErrors,
) -> BTreeMap<usize, RowErrors> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| (index, check(entry)))
        .filter(|(_, row)| !row.is_empty())
        .collect()
}

/// Compute the error map for a draft
pub fn validate(draft: &ContactDraft) -> FormErrors {
    let mut errors = FormErrors::new();

    if let Some(message) = name_error(&draft.name) {
        errors.insert_message("name", message);
    }

    if let Some(email) = present(&draft.email) {
        if !is_valid_email(email) {
            errors.insert_message("email", MSG_EMAIL_INVALID);
        }
    }

    if let Some(phone) = present(&draft.phone) {
        if !is_valid_mobile(phone) {
            errors.insert_message("phone", MSG_PHONE_INVALID);
        }
    }

    if let Some(tax_number) = present(&draft.tax_number) {
        if !is_valid_tax_number(tax_number) {
            errors.insert_message("taxNumber", MSG_TAX_NUMBER_INVALID);
        }
    }

    if let Some(message) = risk_limit_error(draft.risk_limit) {
        errors.insert_message("riskLimit", message);
    }

    errors.insert_rows("addresses", sparse_rows(&draft.addresses, address_errors));
    errors.insert_rows("authorities", sparse_rows(&draft.authorities, authority_errors));

    errors
}
