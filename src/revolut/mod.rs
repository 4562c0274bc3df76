mod auth;
mod client;
pub mod types;

pub use auth::{AUDIENCE, ClientAssertionClaims, create_jwt_token};
pub use client::RevolutClient;
pub use types::{
    CounterpartyName, ExternalParty, GbpCounterparty, IbanCounterparty, NewCounterparty,
    PaymentRequest, Receiver, RevolutCounterparty, SwiftCounterparty, TransactionsQuery,
    UsdCounterparty,
};
