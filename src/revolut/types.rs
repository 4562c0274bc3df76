use crate::models::TransactionType;
use crate::models::account::Address;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Instruction for `POST /pay`
///
/// `request_id` is the idempotency key: replaying a request with the same
/// ID returns the original transaction instead of paying twice.
// https://developer.revolut.com/docs/business/create-payment
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentRequest {
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub receiver: Receiver,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_for: Option<NaiveDate>,
}

impl PaymentRequest {
    /// New payment attempt with a freshly generated `request_id`
    pub fn new(
        counterparty_id: impl Into<String>,
        amount: Decimal,
        currency: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            account_id: None,
            receiver: Receiver {
                counterparty_id: counterparty_id.into(),
                account_id: None,
            },
            amount,
            currency: currency.into(),
            reference: reference.into(),
            schedule_for: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Account the money is taken from
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Counterparty account to pay into, when it has several
    pub fn with_receiver_account(mut self, account_id: impl Into<String>) -> Self {
        self.receiver.account_id = Some(account_id.into());
        self
    }

    pub fn with_schedule_for(mut self, date: NaiveDate) -> Self {
        self.schedule_for = Some(date);
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Receiver {
    pub counterparty_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

/// Filter for `GET /transactions`; unset fields are left out of the query
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct TransactionsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<TransactionType>,
}

/// Body for `POST /counterparty`
///
/// Each variant carries exactly the bank identifiers its payment scheme
/// needs, so mixed shapes such as an IBAN next to a sort code cannot be built.
#[derive(Debug, Clone, PartialEq)]
pub enum NewCounterparty {
    /// Another Revolut user or business
    Revolut(RevolutCounterparty),
    /// EUR account identified by IBAN and BIC
    Iban(IbanCounterparty),
    /// UK domestic GBP account
    Gbp(GbpCounterparty),
    /// US domestic account identified by ACH routing number
    Usd(UsdCounterparty),
    /// International transfer over SWIFT
    Swift(SwiftCounterparty),
}

impl NewCounterparty {
    pub fn currency(&self) -> Option<&str> {
        match self {
            NewCounterparty::Revolut(_) => None,
            NewCounterparty::Iban(_) => Some("EUR"),
            NewCounterparty::Gbp(_) => Some("GBP"),
            NewCounterparty::Usd(_) => Some("USD"),
            NewCounterparty::Swift(c) => Some(&c.currency),
        }
    }
}

#[derive(Serialize)]
struct WithCurrency<'a, T> {
    currency: &'a str,
    #[serde(flatten)]
    details: &'a T,
}

impl Serialize for NewCounterparty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NewCounterparty::Revolut(c) => c.serialize(serializer),
            NewCounterparty::Iban(c) => WithCurrency {
                currency: "EUR",
                details: c,
            }
            .serialize(serializer),
            NewCounterparty::Gbp(c) => WithCurrency {
                currency: "GBP",
                details: c,
            }
            .serialize(serializer),
            NewCounterparty::Usd(c) => WithCurrency {
                currency: "USD",
                details: c,
            }
            .serialize(serializer),
            NewCounterparty::Swift(c) => c.serialize(serializer),
        }
    }
}

impl From<RevolutCounterparty> for NewCounterparty {
    fn from(c: RevolutCounterparty) -> Self {
        NewCounterparty::Revolut(c)
    }
}

impl From<IbanCounterparty> for NewCounterparty {
    fn from(c: IbanCounterparty) -> Self {
        NewCounterparty::Iban(c)
    }
}

impl From<GbpCounterparty> for NewCounterparty {
    fn from(c: GbpCounterparty) -> Self {
        NewCounterparty::Gbp(c)
    }
}

impl From<UsdCounterparty> for NewCounterparty {
    fn from(c: UsdCounterparty) -> Self {
        NewCounterparty::Usd(c)
    }
}

impl From<SwiftCounterparty> for NewCounterparty {
    fn from(c: SwiftCounterparty) -> Self {
        NewCounterparty::Swift(c)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "profile_type", rename_all = "lowercase")]
pub enum RevolutCounterparty {
    Personal { name: String, phone: String },
    /// Identified by the email of an admin of a public business account
    Business { email: String },
}

/// Fields shared by all counterparties outside Revolut
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExternalParty {
    #[serde(flatten)]
    pub name: CounterpartyName,
    pub bank_country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl ExternalParty {
    pub fn company(name: impl Into<String>, bank_country: impl Into<String>) -> Self {
        Self::named(CounterpartyName::CompanyName(name.into()), bank_country)
    }

    pub fn individual(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        bank_country: impl Into<String>,
    ) -> Self {
        Self::named(
            CounterpartyName::IndividualName {
                first_name: first_name.into(),
                last_name: last_name.into(),
            },
            bank_country,
        )
    }

    fn named(name: CounterpartyName, bank_country: impl Into<String>) -> Self {
        Self {
            name,
            bank_country: bank_country.into(),
            email: None,
            phone: None,
            address: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CounterpartyName {
    CompanyName(String),
    IndividualName {
        first_name: String,
        last_name: String,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IbanCounterparty {
    #[serde(flatten)]
    pub party: ExternalParty,
    pub iban: String,
    pub bic: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GbpCounterparty {
    #[serde(flatten)]
    pub party: ExternalParty,
    pub account_no: String,
    pub sort_code: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UsdCounterparty {
    #[serde(flatten)]
    pub party: ExternalParty,
    pub routing_number: String,
    pub account_no: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SwiftCounterparty {
    #[serde(flatten)]
    pub party: ExternalParty,
    pub currency: String,
    pub account_no: String,
    pub bic: String,
}

/// Error body returned by the API on non-2xx responses
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default, alias = "error_description")]
    pub(super) message: Option<String>,
    #[serde(default)]
    pub(super) code: Option<u32>,
}
