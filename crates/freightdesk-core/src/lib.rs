// SPDX-License-Identifier: AGPL-3.0
// Freightdesk Core - Shared logic for all frontends
//
// This crate provides:
// - The contact draft, its actions and the field store
// - Derived validation producing a sparse error map
// - The submission coordinator and the ContactApi collaborator trait
// - AppSettings, SettingsStore and AppError
//
// Frontend-specific code lives in separate crates.

pub mod api;
pub mod form;
pub mod settings;
pub mod types;
pub mod wire;

// Re-export commonly used items
pub use api::{ApiError, ContactApi};
pub use form::{
    reduce, validate, AddressField, AuthorityField, ContactDraft, ContactField, FieldStore,
    FormAction, FormErrors, FormStep, LocationOption, SubmissionCoordinator, SubmitFailure,
    SubmitOutcome,
};
pub use settings::SettingsStore;
pub use types::{AppError, AppSettings, API_URL_ENV};
pub use wire::{ContactPayload, ContactRecord};
