use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// https://developer.revolut.com/docs/business/get-counterparties
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Counterparty {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile_type: Option<ProfileType>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub accounts: Vec<CounterpartyAccount>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    Personal,
    Business,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CounterpartyAccount {
    pub id: String,
    pub currency: String,
    #[serde(rename = "type")]
    pub kind: CounterpartyAccountType,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bank_country: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub account_no: Option<String>,
    #[serde(default)]
    pub sort_code: Option<String>,
    #[serde(default)]
    pub routing_number: Option<String>,
    #[serde(default)]
    pub iban: Option<String>,
    #[serde(default)]
    pub bic: Option<String>,
    #[serde(default)]
    pub recipient_charges: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CounterpartyAccountType {
    Revolut,
    External,
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use serde_json::{Value, json};

    pub(crate) fn mock_counterparty_json(id: &str) -> Value {
        json!({
            "id": id,
            "name": "John Smith",
            "phone": "+4412345678900",
            "profile_type": "personal",
            "country": "GB",
            "state": "created",
            "created_at": "2024-11-23T10:00:00.000Z",
            "updated_at": "2024-11-23T10:00:00.000Z",
            "accounts": [
                {
                    "id": "cpa_1",
                    "currency": "GBP",
                    "type": "revolut"
                }
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counterparty_deserialization() {
        let cp: Counterparty =
            serde_json::from_value(test_helpers::mock_counterparty_json("cp_1")).unwrap();

        assert_eq!(cp.id, "cp_1");
        assert_eq!(cp.profile_type, Some(ProfileType::Personal));
        assert_eq!(cp.accounts.len(), 1);
        assert_eq!(cp.accounts[0].kind, CounterpartyAccountType::Revolut);
        assert_eq!(cp.accounts[0].iban, None);
    }

    #[test]
    fn test_external_counterparty_account() {
        let json = r#"{
            "id": "cpa_2",
            "currency": "EUR",
            "type": "external",
            "name": "Boby Charry",
            "bank_country": "LT",
            "iban": "LT121000011101001000",
            "bic": "HABALT22",
            "recipient_charges": "no"
        }"#;
        let account: CounterpartyAccount = serde_json::from_str(json).unwrap();

        assert_eq!(account.kind, CounterpartyAccountType::External);
        assert_eq!(account.bic.as_deref(), Some("HABALT22"));
    }

    #[test]
    fn test_unrecognised_profile_and_account_type() {
        let mut json = test_helpers::mock_counterparty_json("cp_2");
        json["profile_type"] = "sole_trader".into();
        json["accounts"][0]["type"] = "card".into();

        let cp: Counterparty = serde_json::from_value(json).unwrap();

        assert_eq!(cp.profile_type, Some(ProfileType::Unknown));
        assert_eq!(cp.accounts[0].kind, CounterpartyAccountType::Unknown);
    }
}
