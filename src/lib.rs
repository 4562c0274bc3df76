//! Typed client for the Revolut Business API.
//!
//! [`RevolutClient`] maps each endpoint to a method returning typed models.
//! Access tokens are obtained with [`create_jwt_token`] and
//! [`RevolutClient::get_token`] or [`RevolutClient::refresh_token`], then
//! installed with [`RevolutClient::set_token`]. Refresh scheduling, retries
//! and token storage are left to the caller.

pub mod config;
pub mod error;
pub mod models;
pub mod revolut;

pub use config::Environment;
pub use error::{Error, Result};
pub use revolut::{RevolutClient, create_jwt_token};
