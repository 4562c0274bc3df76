use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// https://developer.revolut.com/docs/business/get-accounts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub balance: Decimal,
    pub currency: String,
    pub state: AccountState,
    #[serde(default)]
    pub public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AccountState {
    Active,
    Inactive,
    #[serde(other)]
    Unknown,
}

/// Details needed to pay into an account from outside Revolut
// https://developer.revolut.com/docs/business/get-account-bank-details
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BankDetail {
    #[serde(default)]
    pub iban: Option<String>,
    #[serde(default)]
    pub bic: Option<String>,
    #[serde(default)]
    pub account_no: Option<String>,
    #[serde(default)]
    pub sort_code: Option<String>,
    #[serde(default)]
    pub routing_number: Option<String>,
    #[serde(default)]
    pub beneficiary: Option<String>,
    #[serde(default)]
    pub beneficiary_address: Option<Address>,
    #[serde(default)]
    pub bank_country: Option<String>,
    #[serde(default)]
    pub pooled: Option<bool>,
    #[serde(default)]
    pub unique_reference: Option<String>,
    #[serde(default)]
    pub schemes: Vec<String>,
    #[serde(default)]
    pub estimated_time: Option<EstimatedTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimatedTime {
    pub unit: String,
    #[serde(default)]
    pub min: Option<u32>,
    #[serde(default)]
    pub max: Option<u32>,
}


#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::dec;

    #[test]
    fn test_account_deserialization() {
        let account: Account =
            serde_json::from_value(test_helpers::mock_account_json("acc_123")).unwrap();

        assert_eq!(account.id, "acc_123");
        assert_eq!(account.balance, dec!(1250.75));
        assert_eq!(account.state, AccountState::Active);
        assert!(!account.public);
    }

    #[test]
    fn test_bank_detail_partial() {
        let json = r#"{
            "iban": "GB33BUKB20201555555555",
            "bic": "REVOGB21",
            "beneficiary": "Acme Ltd",
            "beneficiary_address": {"city": "London", "country": "GB"},
            "schemes": ["sepa"],
            "estimated_time": {"unit": "days", "max": 1}
        }"#;
        let detail: BankDetail = serde_json::from_str(json).unwrap();

        assert_eq!(detail.bic.as_deref(), Some("REVOGB21"));
        assert_eq!(detail.account_no, None);
        assert_eq!(detail.schemes, vec!["sepa"]);
        assert_eq!(
            detail.beneficiary_address.unwrap().city.as_deref(),
            Some("London")
        );
    }

    #[test]
    fn test_unrecognised_account_state() {
        let mut json = test_helpers::mock_account_json("acc_9");
        json["state"] = "suspended".into();

        let account: Account = serde_json::from_value(json).unwrap();
        assert_eq!(account.state, AccountState::Unknown);
    }
}
