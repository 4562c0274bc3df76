use super::auth::authenticated_client;
use chrono::NaiveDate;
use clap::Subcommand;
use revolut_business::config::Config;
use revolut_business::error::Result;
use revolut_business::models::Transaction;
use revolut_business::revolut::TransactionsQuery;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum ShowResource {
    /// Show configuration and cache paths
    Paths,
    /// List accounts and balances
    Accounts,
    /// Show the bank details of an account
    BankDetails { account_id: String },
    /// List counterparties
    Counterparties,
    /// List transactions
    Transactions {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        counterparty: Option<String>,
        #[arg(long)]
        count: Option<u32>,
    },
    /// Show a single transaction
    Transaction {
        id: String,
        /// Look the transaction up by the request ID of the payment
        #[arg(long)]
        request_id: bool,
    },
    /// Show the registered webhook
    Webhook,
}

impl ShowResource {
    pub async fn execute(&self) -> Result<()> {
        if let ShowResource::Paths = self {
            return show_paths();
        }

        let config = Config::load()?;
        let client = authenticated_client(&config.revolut).await?;

        match self {
            ShowResource::Paths => show_paths()?,
            ShowResource::Accounts => {
                for account in client.get_accounts().await? {
                    info!(
                        id = %account.id,
                        name = account.name.as_deref().unwrap_or_default(),
                        balance = %account.balance,
                        currency = %account.currency,
                        "Account"
                    );
                }
            }
            ShowResource::BankDetails { account_id } => {
                for detail in client.get_account_detail(account_id).await? {
                    println!("{}", serde_json::to_string_pretty(&detail)?);
                }
            }
            ShowResource::Counterparties => {
                for cp in client.get_counterparties().await? {
                    info!(
                        id = %cp.id,
                        name = cp.name.as_deref().unwrap_or_default(),
                        accounts = cp.accounts.len(),
                        "Counterparty"
                    );
                }
            }
            ShowResource::Transactions {
                from,
                to,
                counterparty,
                count,
            } => {
                let query = TransactionsQuery {
                    from: *from,
                    to: *to,
                    counterparty: counterparty.clone(),
                    count: *count,
                    type_: None,
                };
                for transaction in client.get_transactions(&query).await? {
                    log_transaction(&transaction);
                }
            }
            ShowResource::Transaction { id, request_id } => {
                let transaction = match request_id {
                    true => client.get_transaction_by_request_id(id).await?,
                    false => client.get_transaction(id).await?,
                };
                println!("{}", serde_json::to_string_pretty(&transaction)?);
            }
            ShowResource::Webhook => match client.get_webhook().await? {
                Some(webhook) => info!(url = %webhook.url, "Webhook"),
                None => info!("No webhook registered"),
            },
        }

        Ok(())
    }
}

fn log_transaction(transaction: &Transaction) {
    let amount = transaction
        .legs
        .first()
        .map(|leg| format!("{} {}", leg.amount, leg.currency))
        .unwrap_or_default();

    info!(
        id = %transaction.id,
        state = ?transaction.state,
        kind = ?transaction.type_,
        amount = %amount,
        created_at = %transaction.created_at,
        "Transaction"
    );
}

fn show_paths() -> Result<()> {
    let config_path = Config::config_file()?;
    let cache_dir = Config::cache_dir()?;

    info!(path = ?config_path, "Config path");
    info!(path = ?cache_dir, "Cache path");

    Ok(())
}
