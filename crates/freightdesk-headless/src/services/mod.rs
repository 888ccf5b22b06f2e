// SPDX-License-Identifier: AGPL-3.0
// Freightdesk Headless - Services

pub mod form_bridge;

pub use form_bridge::{FormBridge, FormCommand, FormEvent};
