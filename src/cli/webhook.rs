use super::auth::authenticated_client;
use clap::Subcommand;
use revolut_business::config::Config;
use revolut_business::error::Result;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum WebhookAction {
    /// Register the URL that receives transaction events
    Set { url: String },
    /// Remove the webhook registration
    Delete,
}

impl WebhookAction {
    pub async fn execute(&self) -> Result<()> {
        let config = Config::load()?;
        let client = authenticated_client(&config.revolut).await?;

        match self {
            WebhookAction::Set { url } => {
                client.set_webhook(url).await?;
                info!(url = %url, "Webhook registered");
            }
            WebhookAction::Delete => {
                client.del_webhook().await?;
                info!("Webhook removed");
            }
        }

        Ok(())
    }
}
