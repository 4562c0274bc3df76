pub mod account;
pub mod counterparty;
pub mod token;
pub mod transaction;
pub mod webhook;

pub use account::{Account, AccountState, BankDetail};
pub use counterparty::{Counterparty, CounterpartyAccount, ProfileType};
pub use token::OAuthToken;
pub use transaction::{
    Leg, LegCounterparty, LegCounterpartyKind, Transaction, TransactionState, TransactionType,
};
pub use webhook::{Webhook, WebhookEvent};
