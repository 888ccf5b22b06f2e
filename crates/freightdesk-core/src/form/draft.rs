// SPDX-License-Identifier: AGPL-3.0
// Freightdesk Core - Draft record model
//
// The draft is the in-progress contact being edited. It is a plain value:
// every transition produces a new draft, nothing mutates one in place
// outside of the reducer.

use crate::wire::{AddressRecord, AuthorityRecord, ContactRecord};
use serde::{Deserialize, Serialize};

/// Currency preselected on a blank contact
pub const DEFAULT_CURRENCY: &str = "TRY";

/// Business role of a contact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
    #[default]
    Customer,
    Supplier,
    Agent,
    Carrier,
    Other,
}

/// Legal classification of a contact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegalType {
    #[default]
    Corporate,
    Individual,
}

/// One selected entry of a country, state or city picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationOption {
    pub id: u64,
    pub name: String,
}

impl LocationOption {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Rebuild a selection from the id/name pair a record carries
    fn from_parts(id: Option<u64>, name: Option<&str>) -> Option<Self> {
        id.map(|id| Self::new(id, name.unwrap_or_default()))
    }
}

/// Country/state/city selection where each level depends on the one above
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub country: Option<LocationOption>,
    pub state: Option<LocationOption>,
    pub city: Option<LocationOption>,
}

impl Location {
    /// Select a country; state and city no longer apply
    pub fn with_country(self, country: Option<LocationOption>) -> Self {
        Self {
            country,
            state: None,
            city: None,
        }
    }

    /// Select a state; the city no longer applies
    pub fn with_state(self, state: Option<LocationOption>) -> Self {
        Self {
            state,
            city: None,
            ..self
        }
    }

    pub fn with_city(self, city: Option<LocationOption>) -> Self {
        Self { city, ..self }
    }

    pub fn country_id(&self) -> Option<u64> {
        self.country.as_ref().map(|o| o.id)
    }

    pub fn state_id(&self) -> Option<u64> {
        self.state.as_ref().map(|o| o.id)
    }

    pub fn city_id(&self) -> Option<u64> {
        self.city.as_ref().map(|o| o.id)
    }
}

/// One entry of the draft's address list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressDraft {
    /// Server id of an existing address row
    pub id: Option<u64>,
    pub title: String,
    pub address: String,
    pub location: Location,
    pub postal_code: String,
    pub is_default: bool,
    pub is_invoice: bool,
    pub is_delivery: bool,
}

impl AddressDraft {
    /// Blank entry appended by `AddAddress`; only the first address is the default
    pub fn blank(is_first: bool) -> Self {
        Self {
            is_default: is_first,
            is_invoice: true,
            is_delivery: true,
            ..Self::default()
        }
    }

    fn from_record(record: &AddressRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            address: record.address.clone(),
            location: Location {
                country: LocationOption::from_parts(record.country, record.country_name.as_deref()),
                state: LocationOption::from_parts(record.state, record.state_name.as_deref()),
                city: LocationOption::from_parts(record.city, record.city_name.as_deref()),
            },
            postal_code: record.postal_code.clone(),
            is_default: record.is_default,
            is_invoice: record.is_invoice_address,
            is_delivery: record.is_delivery_address,
        }
    }
}

/// One entry of the draft's authority (contact person) list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorityDraft {
    /// Server id of an existing authority row
    pub id: Option<u64>,
    pub name: String,
    pub title: String,
    pub department: String,
    pub phone: String,
    pub email: String,
    pub is_primary: bool,
}

impl AuthorityDraft {
    /// Blank entry appended by `AddAuthority`; only the first one is primary
    pub fn blank(is_first: bool) -> Self {
        Self {
            is_primary: is_first,
            ..Self::default()
        }
    }

    fn from_record(record: &AuthorityRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            title: record.position.clone(),
            department: record.department.clone(),
            phone: record.phone.clone(),
            email: record.email.clone(),
            is_primary: record.is_primary,
        }
    }
}

/// The contact being edited by one form session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactDraft {
    /// Server id when editing an existing contact; `None` creates a new one
    pub id: Option<u64>,

    // Identity
    pub contact_type: ContactType,
    pub legal_type: LegalType,
    pub name: String,
    pub short_name: String,
    pub category: String,
    pub segment: String,

    // Contact info
    pub email: String,
    pub phone: String,
    pub fax: String,
    pub address: String,
    pub location: Location,
    pub postal_code: String,

    // Financial info
    pub tax_number: String,
    pub tax_office: String,
    pub currency: String,
    pub payment_term_days: Option<u32>,
    pub risk_limit: Option<f64>,

    pub addresses: Vec<AddressDraft>,
    pub authorities: Vec<AuthorityDraft>,
}

impl Default for ContactDraft {
    fn default() -> Self {
        Self {
            id: None,
            contact_type: ContactType::default(),
            legal_type: LegalType::default(),
            name: String::new(),
            short_name: String::new(),
            category: String::new(),
            segment: String::new(),
            email: String::new(),
            phone: String::new(),
            fax: String::new(),
            address: String::new(),
            location: Location::default(),
            postal_code: String::new(),
            tax_number: String::new(),
            tax_office: String::new(),
            currency: DEFAULT_CURRENCY.to_string(),
            payment_term_days: None,
            risk_limit: None,
            addresses: Vec::new(),
            authorities: Vec::new(),
        }
    }
}

impl ContactDraft {
    /// Derive a draft from a fetched record.
    ///
    /// Every field is taken from `record`; nothing is inherited from
    /// whatever draft was being edited before.
    pub fn from_record(record: &ContactRecord) -> Self {
        Self {
            id: Some(record.id),
            contact_type: record.contact_type,
            legal_type: record.legal_type,
            name: record.name.clone(),
            short_name: record.short_name.clone(),
            category: record.category.clone(),
            segment: record.segment.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            fax: record.fax.clone(),
            address: record.address.clone(),
            location: Location {
                country: LocationOption::from_parts(record.country, record.country_name.as_deref()),
                state: LocationOption::from_parts(record.state, record.state_name.as_deref()),
                city: LocationOption::from_parts(record.city, record.city_name.as_deref()),
            },
            postal_code: record.postal_code.clone(),
            tax_number: record.tax_number.clone(),
            tax_office: record.tax_office.clone(),
            currency: record.currency.clone(),
            payment_term_days: record.payment_term_days,
            risk_limit: record.risk_limit,
            addresses: record.addresses.iter().map(AddressDraft::from_record).collect(),
            authorities: record
                .authorities
                .iter()
                .map(AuthorityDraft::from_record)
                .collect(),
        }
    }

    /// Whether submitting this draft creates a new contact
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_draft() {
        let draft = ContactDraft::default();
        assert!(draft.is_new());
        assert_eq!(draft.currency, "TRY");
        assert_eq!(draft.contact_type, ContactType::Customer);
        assert!(draft.addresses.is_empty());
        assert!(draft.location.country.is_none());
    }

    #[test]
    fn test_country_clears_dependents() {
        let location = Location {
            country: Some(LocationOption::new(90, "Turkey")),
            state: Some(LocationOption::new(34, "Istanbul")),
            city: Some(LocationOption::new(1, "Kadikoy")),
        };

        let changed = location.with_country(Some(LocationOption::new(49, "Germany")));
        assert_eq!(changed.country_id(), Some(49));
        assert!(changed.state.is_none());
        assert!(changed.city.is_none());
    }

    #[test]
    fn test_state_keeps_country_clears_city() {
        let location = Location {
            country: Some(LocationOption::new(90, "Turkey")),
            state: Some(LocationOption::new(34, "Istanbul")),
            city: Some(LocationOption::new(1, "Kadikoy")),
        };

        let changed = location.with_state(Some(LocationOption::new(6, "Ankara")));
        assert_eq!(changed.country_id(), Some(90));
        assert_eq!(changed.state_id(), Some(6));
        assert!(changed.city.is_none());
    }

    #[test]
    fn test_blank_rows_flag_first_entry() {
        assert!(AddressDraft::blank(true).is_default);
        assert!(!AddressDraft::blank(false).is_default);
        assert!(AddressDraft::blank(false).is_invoice);
        assert!(AuthorityDraft::blank(true).is_primary);
        assert!(!AuthorityDraft::blank(false).is_primary);
    }
}
