// SPDX-License-Identifier: AGPL-3.0
// Freightdesk Core - Form state engine

pub mod action;
pub mod draft;
pub mod errors;
pub mod store;
pub mod submit;
pub mod validate;

pub use action::{reduce, AddressField, AuthorityField, ContactField, FormAction};
pub use draft::{
    AddressDraft, AuthorityDraft, ContactDraft, ContactType, LegalType, Location, LocationOption,
};
pub use errors::{ErrorNode, FormErrors, FormStep, RowErrors};
pub use store::FieldStore;
pub use submit::{SubmissionCoordinator, SubmitFailure, SubmitOutcome};
pub use validate::validate;
