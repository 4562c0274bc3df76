use super::types::{
    ErrorBody, IbanCounterparty, NewCounterparty, PaymentRequest, RevolutCounterparty,
    TransactionsQuery,
};
use crate::config::Environment;
use crate::error::{Error, Result};
use crate::models::{Account, BankDetail, Counterparty, Transaction, Webhook};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Typed binding for the Revolut Business API
///
/// A client starts unauthenticated. Authenticated calls carry the bearer
/// token installed with [`RevolutClient::set_token`]; its expiry is not
/// tracked, so callers re-authenticate when a call fails with 401.
#[derive(Clone)]
pub struct RevolutClient {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl fmt::Debug for RevolutClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevolutClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl RevolutClient {
    pub fn new(environment: Environment) -> Result<Self> {
        Self::with_base_url(environment.api_base_url())
    }

    /// Client against an arbitrary API root, e.g. a mock server
    pub fn with_base_url(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| Error::Config(format!("Invalid API base URL: {}", e)))?;

        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "API base URL {} cannot carry a path",
                base_url
            )));
        }

        let client = reqwest::ClientBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url,
            access_token: None,
        })
    }

    pub fn set_token(&mut self, access_token: impl Into<String>) {
        self.access_token = Some(access_token.into());
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub(super) fn http_client(&self) -> &Client {
        &self.client
    }

    /// Endpoint URL below the API root, each segment percent-encoded
    ///
    /// Empty, `.` and `..` segments are rejected since they would address
    /// another endpoint.
    pub(super) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(Error::InvalidPathSegment(bad.to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("API base URL {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let request = self.client.request(method, self.endpoint(segments)?);
        Ok(match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    /// Send the request, turning any non-2xx response into [`Error::Api`]
    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let request = request.build()?;
        debug!(method = %request.method(), url = %request.url(), "Sending request");

        let response = self.client.execute(request).await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(response)
    }

    pub(super) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.execute(request).await?;
        decode(response).await
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        self.execute(request).await?;
        Ok(())
    }

    #[instrument(name = "Setting webhook", skip_all)]
    pub async fn set_webhook(&self, url: &str) -> Result<()> {
        let request = self
            .request(Method::POST, &["webhook"])?
            .json(&json!({ "url": url }));

        self.send_empty(request).await
    }

    /// Currently registered webhook, `None` when nothing is registered
    #[instrument(name = "Fetching webhook", skip_all)]
    pub async fn get_webhook(&self) -> Result<Option<Webhook>> {
        let response = match self.execute(self.request(Method::GET, &["webhook"])?).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        Ok(Some(decode(response).await?))
    }

    #[instrument(name = "Deleting webhook", skip_all)]
    pub async fn del_webhook(&self) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &["webhook"])?)
            .await
    }

    #[instrument(name = "Fetching accounts", skip_all)]
    pub async fn get_accounts(&self) -> Result<Vec<Account>> {
        self.send_json(self.request(Method::GET, &["accounts"])?)
            .await
    }

    #[instrument(name = "Fetching account", skip_all, fields(account_id = %account_id))]
    pub async fn get_account(&self, account_id: &str) -> Result<Account> {
        self.send_json(self.request(Method::GET, &["accounts", account_id])?)
            .await
    }

    #[instrument(name = "Fetching account bank details", skip_all, fields(account_id = %account_id))]
    pub async fn get_account_detail(&self, account_id: &str) -> Result<Vec<BankDetail>> {
        let request = self.request(Method::GET, &["accounts", account_id, "bank-details"])?;
        self.send_json(request).await
    }

    /// Create a payment
    ///
    /// Sending the same `request_id` again returns the original transaction.
    #[instrument(name = "Creating payment", skip_all, fields(request_id = %payment.request_id))]
    pub async fn pay(&self, payment: &PaymentRequest) -> Result<Transaction> {
        let request = self.request(Method::POST, &["pay"])?.json(payment);
        self.send_json(request).await
    }

    #[instrument(name = "Fetching transactions", skip_all)]
    pub async fn get_transactions(&self, query: &TransactionsQuery) -> Result<Vec<Transaction>> {
        let request = self.request(Method::GET, &["transactions"])?.query(query);
        self.send_json(request).await
    }

    #[instrument(name = "Fetching transaction", skip_all, fields(id = %id))]
    pub async fn get_transaction(&self, id: &str) -> Result<Transaction> {
        self.send_json(self.request(Method::GET, &["transaction", id])?)
            .await
    }

    #[instrument(name = "Fetching transaction by request ID", skip_all, fields(request_id = %request_id))]
    pub async fn get_transaction_by_request_id(&self, request_id: &str) -> Result<Transaction> {
        let request = self
            .request(Method::GET, &["transaction", request_id])?
            .query(&[("id_type", "request_id")]);

        self.send_json(request).await
    }

    /// Cancel a scheduled transaction; the API rejects it in any other state
    #[instrument(name = "Cancelling transaction", skip_all, fields(id = %id))]
    pub async fn del_transaction(&self, id: &str) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &["transaction", id])?)
            .await
    }

    #[instrument(name = "Fetching counterparties", skip_all)]
    pub async fn get_counterparties(&self) -> Result<Vec<Counterparty>> {
        self.send_json(self.request(Method::GET, &["counterparties"])?)
            .await
    }

    #[instrument(name = "Fetching counterparty", skip_all, fields(id = %id))]
    pub async fn get_counterparty(&self, id: &str) -> Result<Counterparty> {
        self.send_json(self.request(Method::GET, &["counterparty", id])?)
            .await
    }

    #[instrument(name = "Adding counterparty", skip_all, fields(currency = ?counterparty.currency()))]
    pub async fn add_counterparty(&self, counterparty: &NewCounterparty) -> Result<Counterparty> {
        let request = self
            .request(Method::POST, &["counterparty"])?
            .json(counterparty);

        self.send_json(request).await
    }

    pub async fn add_rev_counterparty(&self, data: RevolutCounterparty) -> Result<Counterparty> {
        self.add_counterparty(&data.into()).await
    }

    pub async fn add_iban_counterparty(&self, data: IbanCounterparty) -> Result<Counterparty> {
        self.add_counterparty(&data.into()).await
    }

    #[instrument(name = "Deleting counterparty", skip_all, fields(id = %id))]
    pub async fn delete_counterparty(&self, id: &str) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &["counterparty", id])?)
            .await
    }
}

/// Parse a successful body; a payload that doesn't match the model is a
/// serialization error, not a transport one
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

async fn api_error(response: Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<ErrorBody>(&body).ok();

    let code = parsed.as_ref().and_then(|b| b.code);
    let message = parsed
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| match body.is_empty() {
            true => status.canonical_reason().unwrap_or("Unknown error").to_string(),
            false => body,
        });

    debug!(%status, ?code, "Revolut API request failed");

    Error::Api {
        status,
        code,
        message,
    }
}
