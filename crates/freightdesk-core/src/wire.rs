// SPDX-License-Identifier: AGPL-3.0
// Freightdesk Core - Wire types for the contacts endpoint
//
// Records are what the server returns, payloads are what we send.
// Both use the API's snake_case field names.

use crate::form::draft::{AddressDraft, AuthorityDraft, ContactDraft, ContactType, LegalType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Blank text fields come back as `null` from the API
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_currency() -> String {
    crate::form::draft::DEFAULT_CURRENCY.to_string()
}

/// Currency may also come back as `null`; fall back to the default then
fn nullable_currency<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_currency))
}

/// A contact as stored on the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: u64,
    #[serde(default)]
    pub contact_type: ContactType,
    #[serde(default)]
    pub legal_type: LegalType,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub short_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub category: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub segment: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub fax: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub address: String,
    #[serde(default)]
    pub country: Option<u64>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub state: Option<u64>,
    #[serde(default)]
    pub state_name: Option<String>,
    #[serde(default)]
    pub city: Option<u64>,
    #[serde(default)]
    pub city_name: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub postal_code: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub tax_number: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub tax_office: String,
    #[serde(default = "default_currency", deserialize_with = "nullable_currency")]
    pub currency: String,
    #[serde(default)]
    pub payment_term_days: Option<u32>,
    #[serde(default)]
    pub risk_limit: Option<f64>,
    #[serde(default)]
    pub addresses: Vec<AddressRecord>,
    #[serde(default)]
    pub authorities: Vec<AuthorityRecord>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// An address row of a stored contact
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub address: String,
    #[serde(default)]
    pub country: Option<u64>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub state: Option<u64>,
    #[serde(default)]
    pub state_name: Option<String>,
    #[serde(default)]
    pub city: Option<u64>,
    #[serde(default)]
    pub city_name: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub postal_code: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_invoice_address: bool,
    #[serde(default)]
    pub is_delivery_address: bool,
}

/// An authority (contact person) row of a stored contact
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorityRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub position: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub department: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub email: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// Body of a create or update request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactPayload {
    pub contact_type: ContactType,
    pub legal_type: LegalType,
    pub name: String,
    pub short_name: String,
    pub category: String,
    pub segment: String,
    pub email: String,
    pub phone: String,
    pub fax: String,
    pub address: String,
    pub country: Option<u64>,
    pub state: Option<u64>,
    pub city: Option<u64>,
    pub postal_code: String,
    pub tax_number: String,
    pub tax_office: String,
    pub currency: String,
    pub payment_term_days: Option<u32>,
    pub risk_limit: Option<f64>,
    pub addresses: Vec<AddressPayload>,
    pub authorities: Vec<AuthorityPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub title: String,
    pub address: String,
    pub country: Option<u64>,
    pub state: Option<u64>,
    pub city: Option<u64>,
    pub postal_code: String,
    pub is_default: bool,
    pub is_invoice_address: bool,
    pub is_delivery_address: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorityPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub position: String,
    pub department: String,
    pub phone: String,
    pub email: String,
    pub is_primary: bool,
}

impl From<&AddressDraft> for AddressPayload {
    fn from(draft: &AddressDraft) -> Self {
        Self {
            id: draft.id,
            title: draft.title.clone(),
            address: draft.address.clone(),
            country: draft.location.country_id(),
            state: draft.location.state_id(),
            city: draft.location.city_id(),
            postal_code: draft.postal_code.clone(),
            is_default: draft.is_default,
            is_invoice_address: draft.is_invoice,
            is_delivery_address: draft.is_delivery,
        }
    }
}

impl From<&AuthorityDraft> for AuthorityPayload {
    fn from(draft: &AuthorityDraft) -> Self {
        Self {
            id: draft.id,
            name: draft.name.clone(),
            position: draft.title.clone(),
            department: draft.department.clone(),
            phone: draft.phone.clone(),
            email: draft.email.clone(),
            is_primary: draft.is_primary,
        }
    }
}

impl From<&ContactDraft> for ContactPayload {
    fn from(draft: &ContactDraft) -> Self {
        Self {
            contact_type: draft.contact_type,
            legal_type: draft.legal_type,
            name: draft.name.clone(),
            short_name: draft.short_name.clone(),
            category: draft.category.clone(),
            segment: draft.segment.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            fax: draft.fax.clone(),
            address: draft.address.clone(),
            country: draft.location.country_id(),
            state: draft.location.state_id(),
            city: draft.location.city_id(),
            postal_code: draft.postal_code.clone(),
            tax_number: draft.tax_number.clone(),
            tax_office: draft.tax_office.clone(),
            currency: draft.currency.clone(),
            payment_term_days: draft.payment_term_days,
            risk_limit: draft.risk_limit,
            addresses: draft.addresses.iter().map(AddressPayload::from).collect(),
            authorities: draft.authorities.iter().map(AuthorityPayload::from).collect(),
        }
    }
}

/// Map a wire field name onto the key the validator reports it under
pub fn error_key_for(wire_field: &str) -> &str {
    match wire_field {
        "tax_number" => "taxNumber",
        "tax_office" => "taxOffice",
        "risk_limit" => "riskLimit",
        "short_name" => "shortName",
        "contact_type" => "contactType",
        "legal_type" => "legalType",
        "postal_code" => "postalCode",
        "payment_term_days" => "paymentTermDays",
        "position" => "title",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample_record() -> ContactRecord {
        serde_json::from_value(json!({
            "id": 42,
            "contact_type": "supplier",
            "legal_type": "individual",
            "name": "Anadolu Lojistik",
            "short_name": "ANL",
            "category": "road",
            "segment": "A",
            "email": "ops@anadolu.example",
            "phone": "5321234567",
            "fax": null,
            "address": "Ataturk Cad. 12",
            "country": 90,
            "country_name": "Turkey",
            "state": 34,
            "state_name": "Istanbul",
            "city": 7,
            "city_name": "Kadikoy",
            "postal_code": "34710",
            "tax_number": "1234567890",
            "tax_office": "Kadikoy",
            "currency": "EUR",
            "payment_term_days": 45,
            "risk_limit": 250000.0,
            "addresses": [
                {
                    "id": 3,
                    "title": "Warehouse",
                    "address": "Liman Yolu 4",
                    "country": 90,
                    "country_name": "Turkey",
                    "state": 35,
                    "state_name": "Izmir",
                    "city": 11,
                    "city_name": "Aliaga",
                    "postal_code": "35800",
                    "is_default": true,
                    "is_invoice_address": false,
                    "is_delivery_address": true
                }
            ],
            "authorities": [
                {
                    "id": 8,
                    "name": "Ayse Kaya",
                    "position": "Operations",
                    "department": "Export",
                    "phone": "5559876543",
                    "email": "ayse@anadolu.example",
                    "is_primary": true
                }
            ],
            "updated_at": "2026-03-02T09:15:00Z"
        }))
        .unwrap()
    }

    /// Every key present in `subset` carries the same value in `superset`
    fn assert_contained(subset: &Value, superset: &Value, path: &str) {
        match (subset, superset) {
            (Value::Object(sub), Value::Object(sup)) => {
                for (key, value) in sub {
                    let other = sup
                        .get(key)
                        .unwrap_or_else(|| panic!("{}.{} missing from record", path, key));
                    assert_contained(value, other, &format!("{}.{}", path, key));
                }
            }
            (Value::Array(sub), Value::Array(sup)) => {
                assert_eq!(sub.len(), sup.len(), "{} length differs", path);
                for (i, (a, b)) in sub.iter().zip(sup).enumerate() {
                    assert_contained(a, b, &format!("{}[{}]", path, i));
                }
            }
            _ => assert_eq!(subset, superset, "{} differs", path),
        }
    }

    #[test]
    fn test_null_text_fields_become_empty() {
        let record = sample_record();
        assert_eq!(record.fax, "");
        assert!(record.created_at.is_none());
        assert!(record.updated_at.is_some());
    }

    #[test]
    fn test_null_or_missing_currency_uses_default() {
        let record: ContactRecord =
            serde_json::from_value(json!({ "id": 1, "name": "Acme", "currency": null })).unwrap();
        assert_eq!(record.currency, "TRY");

        let record: ContactRecord =
            serde_json::from_value(json!({ "id": 1, "name": "Acme" })).unwrap();
        assert_eq!(record.currency, "TRY");

        let draft = ContactDraft::from_record(&record);
        assert_eq!(draft.currency, "TRY");
    }

    #[test]
    fn test_load_then_serialize_reproduces_record() {
        let record = sample_record();
        let draft = ContactDraft::from_record(&record);
        let payload = ContactPayload::from(&draft);

        let payload_json = serde_json::to_value(&payload).unwrap();
        let record_json = serde_json::to_value(&record).unwrap();
        assert_contained(&payload_json, &record_json, "contact");
    }

    #[test]
    fn test_load_does_not_leak_previous_draft() {
        let record: ContactRecord =
            serde_json::from_value(json!({ "id": 5, "name": "Bare" })).unwrap();
        let draft = ContactDraft::from_record(&record);
        let payload = ContactPayload::from(&draft);

        assert_eq!(payload.name, "Bare");
        assert_eq!(payload.currency, "TRY");
        assert!(payload.country.is_none());
        assert!(payload.addresses.is_empty());
        assert!(payload.risk_limit.is_none());
    }

    #[test]
    fn test_payload_uses_api_field_names() {
        let mut draft = ContactDraft::default();
        draft.authorities.push(AuthorityDraft {
            title: "CFO".to_string(),
            ..AuthorityDraft::default()
        });
        draft.addresses.push(AddressDraft::blank(true));

        let value = serde_json::to_value(ContactPayload::from(&draft)).unwrap();
        assert_eq!(value["contact_type"], "customer");
        assert_eq!(value["legal_type"], "corporate");
        assert_eq!(value["authorities"][0]["position"], "CFO");
        assert_eq!(value["addresses"][0]["is_invoice_address"], true);
        assert!(value["addresses"][0].get("id").is_none());
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_error_key_mapping() {
        assert_eq!(error_key_for("tax_number"), "taxNumber");
        assert_eq!(error_key_for("risk_limit"), "riskLimit");
        assert_eq!(error_key_for("city"), "city");
        assert_eq!(error_key_for("unexpected"), "unexpected");
    }
}
