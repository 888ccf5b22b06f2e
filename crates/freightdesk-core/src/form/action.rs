// SPDX-License-Identifier: AGPL-3.0
// Freightdesk Core - Form actions and the reducer
//
// The action set is closed: every way a draft can change is a variant
// here, and `ContactDraft::apply` is the only place a draft is rewritten.

use crate::form::draft::{
    AddressDraft, AuthorityDraft, ContactDraft, ContactType, LegalType, LocationOption,
};
use crate::wire::ContactRecord;
use serde::{Deserialize, Serialize};

/// A top-level scalar field together with its new value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum ContactField {
    ContactType(ContactType),
    LegalType(LegalType),
    Name(String),
    ShortName(String),
    Category(String),
    Segment(String),
    Email(String),
    Phone(String),
    Fax(String),
    Address(String),
    PostalCode(String),
    TaxNumber(String),
    TaxOffice(String),
    Currency(String),
    PaymentTermDays(Option<u32>),
    RiskLimit(Option<f64>),
}

/// A field of one address entry together with its new value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum AddressField {
    Title(String),
    Address(String),
    /// Clears the entry's state and city
    Country(Option<LocationOption>),
    /// Clears the entry's city
    State(Option<LocationOption>),
    City(Option<LocationOption>),
    PostalCode(String),
    IsDefault(bool),
    IsInvoice(bool),
    IsDelivery(bool),
}

/// A field of one authority entry together with its new value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum AuthorityField {
    Name(String),
    Title(String),
    Department(String),
    Phone(String),
    Email(String),
    IsPrimary(bool),
}

/// Every mutation the form can make to its draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FormAction {
    SetField(ContactField),
    SetCountry { option: Option<LocationOption> },
    SetState { option: Option<LocationOption> },
    SetCity { option: Option<LocationOption> },
    AddAddress,
    RemoveAddress { index: usize },
    UpdateAddress { index: usize, change: AddressField },
    AddAuthority,
    RemoveAuthority { index: usize },
    UpdateAuthority { index: usize, change: AuthorityField },
    LoadFromSource { record: Box<ContactRecord> },
    Reset,
}

impl FormAction {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetField(_) => "setField",
            Self::SetCountry { .. } => "setCountry",
            Self::SetState { .. } => "setState",
            Self::SetCity { .. } => "setCity",
            Self::AddAddress => "addAddress",
            Self::RemoveAddress { .. } => "removeAddress",
            Self::UpdateAddress { .. } => "updateAddress",
            Self::AddAuthority => "addAuthority",
            Self::RemoveAuthority { .. } => "removeAuthority",
            Self::UpdateAuthority { .. } => "updateAuthority",
            Self::LoadFromSource { .. } => "loadFromSource",
            Self::Reset => "reset",
        }
    }
}

/// Pure transition: the draft `state` becomes after `action`
pub fn reduce(state: &ContactDraft, action: FormAction) -> ContactDraft {
    state.clone().apply(action)
}

impl ContactDraft {
    /// Consume this draft and return the one `action` produces
    pub fn apply(mut self, action: FormAction) -> Self {
        match action {
            FormAction::SetField(field) => {
                self.set_field(field);
                self
            }
            FormAction::SetCountry { option } => {
                self.location = self.location.with_country(option);
                self
            }
            FormAction::SetState { option } => {
                self.location = self.location.with_state(option);
                self
            }
            FormAction::SetCity { option } => {
                self.location = self.location.with_city(option);
                self
            }
            FormAction::AddAddress => {
                let is_first = self.addresses.is_empty();
                self.addresses.push(AddressDraft::blank(is_first));
                self
            }
            FormAction::RemoveAddress { index } => {
                if index < self.addresses.len() {
                    self.addresses.remove(index);
                }
                self
            }
            FormAction::UpdateAddress { index, change } => {
                if let Some(entry) = self.addresses.get_mut(index) {
                    update_address(entry, change);
                }
                self
            }
            FormAction::AddAuthority => {
                let is_first = self.authorities.is_empty();
                self.authorities.push(AuthorityDraft::blank(is_first));
                self
            }
            FormAction::RemoveAuthority { index } => {
                if index < self.authorities.len() {
                    self.authorities.remove(index);
                }
                self
            }
            FormAction::UpdateAuthority { index, change } => {
                if let Some(entry) = self.authorities.get_mut(index) {
                    update_authority(entry, change);
                }
                self
            }
            FormAction::LoadFromSource { record } => ContactDraft::from_record(&record),
            FormAction::Reset => ContactDraft::default(),
        }
    }

    fn set_field(&mut self, field: ContactField) {
        match field {
            ContactField::ContactType(v) => self.contact_type = v,
            ContactField::LegalType(v) => self.legal_type = v,
            ContactField::Name(v) => self.name = v,
            ContactField::ShortName(v) => self.short_name = v,
            ContactField::Category(v) => self.category = v,
            ContactField::Segment(v) => self.segment = v,
            ContactField::Email(v) => self.email = v,
            ContactField::Phone(v) => self.phone = v,
            ContactField::Fax(v) => self.fax = v,
            ContactField::Address(v) => self.address = v,
            ContactField::PostalCode(v) => self.postal_code = v,
            ContactField::TaxNumber(v) => self.tax_number = v,
            ContactField::TaxOffice(v) => self.tax_office = v,
            ContactField::Currency(v) => self.currency = v,
            ContactField::PaymentTermDays(v) => self.payment_term_days = v,
            ContactField::RiskLimit(v) => self.risk_limit = v,
        }
    }
}

fn update_address(entry: &mut AddressDraft, change: AddressField) {
    match change {
        AddressField::Title(v) => entry.title = v,
        AddressField::Address(v) => entry.address = v,
        AddressField::Country(v) => {
            entry.location = std::mem::take(&mut entry.location).with_country(v)
        }
        AddressField::State(v) => {
            entry.location = std::mem::take(&mut entry.location).with_state(v)
        }
        AddressField::City(v) => {
            entry.location = std::mem::take(&mut entry.location).with_city(v)
        }
        AddressField::PostalCode(v) => entry.postal_code = v,
        AddressField::IsDefault(v) => entry.is_default = v,
        AddressField::IsInvoice(v) => entry.is_invoice = v,
        AddressField::IsDelivery(v) => entry.is_delivery = v,
    }
}

fn update_authority(entry: &mut AuthorityDraft, change: AuthorityField) {
    match change {
        AuthorityField::Name(v) => entry.name = v,
        AuthorityField::Title(v) => entry.title = v,
        AuthorityField::Department(v) => entry.department = v,
        AuthorityField::Phone(v) => entry.phone = v,
        AuthorityField::Email(v) => entry.email = v,
        AuthorityField::IsPrimary(v) => entry.is_primary = v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::draft::Location;
    use proptest::prelude::*;

    fn turkey() -> LocationOption {
        LocationOption::new(90, "Turkey")
    }

    fn with_addresses(titles: &[&str]) -> ContactDraft {
        let mut draft = ContactDraft::default();
        for title in titles {
            draft = draft.apply(FormAction::AddAddress);
            let index = draft.addresses.len() - 1;
            draft = draft.apply(FormAction::UpdateAddress {
                index,
                change: AddressField::Title(title.to_string()),
            });
        }
        draft
    }

    #[test]
    fn test_reduce_leaves_input_untouched() {
        let before = ContactDraft::default();
        let after = reduce(&before, FormAction::SetField(ContactField::Name("Acme".into())));

        assert_eq!(before.name, "");
        assert_eq!(after.name, "Acme");
    }

    #[test]
    fn test_country_change_resets_state_and_city() {
        let draft = ContactDraft::default()
            .apply(FormAction::SetCountry { option: Some(turkey()) })
            .apply(FormAction::SetState {
                option: Some(LocationOption::new(34, "Istanbul")),
            })
            .apply(FormAction::SetCity {
                option: Some(LocationOption::new(7, "Kadikoy")),
            });
        assert_eq!(draft.location.city_id(), Some(7));

        let draft = draft.apply(FormAction::SetCountry {
            option: Some(LocationOption::new(49, "Germany")),
        });
        assert_eq!(draft.location.country_id(), Some(49));
        assert!(draft.location.state.is_none());
        assert!(draft.location.city.is_none());
    }

    #[test]
    fn test_remove_address_shifts_later_entries() {
        let draft = with_addresses(&["A0", "A1", "A2"]);
        let draft = draft.apply(FormAction::RemoveAddress { index: 1 });

        let titles: Vec<_> = draft.addresses.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["A0", "A2"]);

        let draft = draft.apply(FormAction::UpdateAddress {
            index: 1,
            change: AddressField::PostalCode("35800".into()),
        });
        assert_eq!(draft.addresses[1].title, "A2");
        assert_eq!(draft.addresses[1].postal_code, "35800");
    }

    #[test]
    fn test_authority_update_and_removal_shift() {
        let mut draft = ContactDraft::default();
        for name in ["P0", "P1", "P2"] {
            draft = draft.apply(FormAction::AddAuthority);
            let index = draft.authorities.len() - 1;
            draft = draft.apply(FormAction::UpdateAuthority {
                index,
                change: AuthorityField::Name(name.to_string()),
            });
        }
        assert!(draft.authorities[0].is_primary);
        assert!(!draft.authorities[1].is_primary);

        let draft = draft
            .apply(FormAction::UpdateAuthority {
                index: 2,
                change: AuthorityField::Title("Finance Manager".into()),
            })
            .apply(FormAction::UpdateAuthority {
                index: 2,
                change: AuthorityField::Phone("532 123 45 67".into()),
            })
            .apply(FormAction::RemoveAuthority { index: 0 });

        let names: Vec<_> = draft.authorities.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["P1", "P2"]);
        assert_eq!(draft.authorities[1].title, "Finance Manager");
        assert_eq!(draft.authorities[1].phone, "532 123 45 67");

        let draft = draft.apply(FormAction::UpdateAuthority {
            index: 0,
            change: AuthorityField::IsPrimary(true),
        });
        assert!(draft.authorities[0].is_primary);
        assert_eq!(draft.authorities[0].name, "P1");
        assert_eq!(draft.authorities[1].department, "");
    }

    #[test]
    fn test_out_of_range_index_is_noop() {
        let draft = with_addresses(&["A0"]).apply(FormAction::AddAuthority);
        let same = draft
            .clone()
            .apply(FormAction::RemoveAddress { index: 5 })
            .apply(FormAction::RemoveAuthority { index: 1 })
            .apply(FormAction::UpdateAuthority {
                index: 9,
                change: AuthorityField::Name("ghost".into()),
            });
        assert_eq!(same, draft);
    }

    #[test]
    fn test_address_entry_has_its_own_cascade() {
        let draft = with_addresses(&["HQ"])
            .apply(FormAction::UpdateAddress {
                index: 0,
                change: AddressField::Country(Some(turkey())),
            })
            .apply(FormAction::UpdateAddress {
                index: 0,
                change: AddressField::State(Some(LocationOption::new(35, "Izmir"))),
            })
            .apply(FormAction::UpdateAddress {
                index: 0,
                change: AddressField::City(Some(LocationOption::new(11, "Aliaga"))),
            })
            .apply(FormAction::UpdateAddress {
                index: 0,
                change: AddressField::State(Some(LocationOption::new(6, "Ankara"))),
            });

        let location = &draft.addresses[0].location;
        assert_eq!(location.country_id(), Some(90));
        assert_eq!(location.state_id(), Some(6));
        assert!(location.city.is_none());
        assert!(draft.location == Location::default());
    }

    #[test]
    fn test_only_first_rows_are_flagged() {
        let draft = ContactDraft::default()
            .apply(FormAction::AddAddress)
            .apply(FormAction::AddAddress)
            .apply(FormAction::AddAuthority)
            .apply(FormAction::AddAuthority);

        assert!(draft.addresses[0].is_default);
        assert!(!draft.addresses[1].is_default);
        assert!(draft.authorities[0].is_primary);
        assert!(!draft.authorities[1].is_primary);
    }

    #[test]
    fn test_reset_and_load_replace_everything() {
        let dirty = with_addresses(&["A0"])
            .apply(FormAction::SetField(ContactField::Name("Old".into())))
            .apply(FormAction::SetField(ContactField::RiskLimit(Some(10.0))));

        assert_eq!(dirty.clone().apply(FormAction::Reset), ContactDraft::default());

        let record: ContactRecord =
            serde_json::from_value(serde_json::json!({ "id": 12, "name": "Fresh" })).unwrap();
        let loaded = dirty.apply(FormAction::LoadFromSource {
            record: Box::new(record),
        });
        assert_eq!(loaded.id, Some(12));
        assert_eq!(loaded.name, "Fresh");
        assert!(loaded.addresses.is_empty());
        assert!(loaded.risk_limit.is_none());
    }

    #[test]
    fn test_action_json_shape() {
        let action: FormAction = serde_json::from_str(
            r#"{"type": "setField", "field": "taxNumber", "value": "1234567890"}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            FormAction::SetField(ContactField::TaxNumber("1234567890".into()))
        );

        let action: FormAction = serde_json::from_str(
            r#"{"type": "updateAddress", "index": 0, "change": {"field": "city", "value": {"id": 7, "name": "Kadikoy"}}}"#,
        )
        .unwrap();
        assert_eq!(action.kind(), "updateAddress");

        let action: FormAction =
            serde_json::from_str(r#"{"type": "setCountry", "option": null}"#).unwrap();
        assert_eq!(action, FormAction::SetCountry { option: None });
    }

    fn location_strategy() -> impl Strategy<Value = Option<LocationOption>> {
        proptest::option::of((1u64..500, "[A-Za-z]{1,12}").prop_map(|(id, name)| {
            LocationOption::new(id, name)
        }))
    }

    proptest! {
        #[test]
        fn prop_set_country_always_clears_dependents(
            country in location_strategy(),
            state in location_strategy(),
            city in location_strategy(),
            next in location_strategy(),
        ) {
            let draft = ContactDraft::default()
                .apply(FormAction::SetCountry { option: country })
                .apply(FormAction::SetState { option: state })
                .apply(FormAction::SetCity { option: city })
                .apply(FormAction::SetCountry { option: next.clone() });

            prop_assert_eq!(draft.location.country, next);
            prop_assert!(draft.location.state.is_none());
            prop_assert!(draft.location.city.is_none());
        }

        #[test]
        fn prop_remove_drops_exactly_one_entry(count in 1usize..8, pick in 0usize..8) {
            let titles: Vec<String> = (0..count).map(|i| format!("A{}", i)).collect();
            let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
            let draft = with_addresses(&refs);
            let after = draft.clone().apply(FormAction::RemoveAddress { index: pick });

            if pick < count {
                let mut expected = titles.clone();
                expected.remove(pick);
                let got: Vec<String> = after.addresses.iter().map(|a| a.title.clone()).collect();
                prop_assert_eq!(got, expected);
            } else {
                prop_assert_eq!(after, draft);
            }
        }
    }
}
