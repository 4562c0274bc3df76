use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A payment or transfer record
///
/// Transfers between two of the business' own accounts carry two legs,
/// everything else carries one. `pay` responses omit the legs entirely.
// https://developer.revolut.com/docs/business/get-transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub state: TransactionState,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub type_: Option<TransactionType>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub reason_code: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scheduled_for: Option<NaiveDate>,
    #[serde(default)]
    pub merchant: Option<Merchant>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub legs: Vec<Leg>,
    #[serde(default)]
    pub card: Option<Card>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionState {
    Created,
    Pending,
    Completed,
    Declined,
    Failed,
    Reverted,
    /// State added to the API after this client was built
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Atm,
    CardPayment,
    CardRefund,
    CardChargeback,
    CardCredit,
    Exchange,
    Transfer,
    Loan,
    Fee,
    Refund,
    Topup,
    TopupReturn,
    Tax,
    TaxRefund,
    #[serde(other)]
    Unknown,
}

/// One side of the money movement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Leg {
    pub leg_id: String,
    pub account_id: String,
    #[serde(default)]
    pub counterparty: Option<LegCounterparty>,
    pub amount: Decimal,
    pub currency: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub balance: Option<Decimal>,
    #[serde(default)]
    pub bill_amount: Option<Decimal>,
    #[serde(default)]
    pub bill_currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegCounterparty {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: LegCounterpartyKind,
    #[serde(default)]
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LegCounterpartyKind {
    #[serde(rename = "self")]
    Own,
    Revolut,
    External,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Merchant {
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub category_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    pub card_number: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}


#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::dec;

    #[test]
    fn test_transaction_with_legs() {
        let tx: Transaction =
            serde_json::from_value(test_helpers::mock_transaction_json("tx_1", "req_1")).unwrap();

        assert_eq!(tx.state, TransactionState::Completed);
        assert_eq!(tx.type_, Some(TransactionType::Transfer));
        assert_eq!(tx.request_id.as_deref(), Some("req_1"));
        assert_eq!(tx.legs.len(), 1);

        let leg = &tx.legs[0];
        assert_eq!(leg.amount, dec!(-10));
        assert_eq!(leg.balance, Some(dec!(1240.75)));
        assert_eq!(
            leg.counterparty.as_ref().map(|c| c.kind),
            Some(LegCounterpartyKind::External)
        );
    }

    #[test]
    fn test_payment_response_without_legs() {
        let tx: Transaction =
            serde_json::from_value(test_helpers::mock_payment_json("tx_2")).unwrap();

        assert_eq!(tx.state, TransactionState::Pending);
        assert!(tx.legs.is_empty());
        assert_eq!(tx.completed_at, None);
    }

    #[test]
    fn test_unrecognised_values_decode_as_unknown() {
        let mut json = test_helpers::mock_transaction_json("tx_3", "req_3");
        json["type"] = "card_cashback".into();
        json["state"] = "held".into();
        json["legs"][0]["counterparty"]["type"] = "pocket".into();

        let tx: Transaction = serde_json::from_value(json).unwrap();

        assert_eq!(tx.type_, Some(TransactionType::Unknown));
        assert_eq!(tx.state, TransactionState::Unknown);
        assert_eq!(
            tx.legs[0].counterparty.as_ref().map(|c| c.kind),
            Some(LegCounterpartyKind::Unknown)
        );
    }

    #[test]
    fn test_own_account_leg() {
        let json = r#"{"id": "acc_2", "type": "self", "account_id": "acc_2"}"#;
        let cp: LegCounterparty = serde_json::from_str(json).unwrap();
        assert_eq!(cp.kind, LegCounterpartyKind::Own);
    }

    #[test]
    fn test_card_payment() {
        let json = r#"{
            "id": "tx_3",
            "type": "card_payment",
            "state": "declined",
            "reason_code": "insufficient_balance",
            "created_at": "2024-11-23T10:00:00Z",
            "merchant": {"name": "Coffee", "city": "London", "category_code": "5814", "country": "GBR"},
            "card": {"card_number": "4111***1111", "first_name": "Jane", "last_name": "Doe"}
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(tx.type_, Some(TransactionType::CardPayment));
        assert_eq!(tx.state, TransactionState::Declined);
        assert_eq!(tx.merchant.unwrap().name, "Coffee");
        assert_eq!(tx.card.unwrap().phone, None);
    }
}
