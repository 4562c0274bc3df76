mod auth;
mod show;
mod webhook;

use clap::{Parser, Subcommand};
use revolut_business::Result;

pub use auth::AuthAction;
pub use show::ShowResource;
pub use webhook::WebhookAction;

#[derive(Parser, Debug)]
#[command(name = "revolut")]
#[command(about = "Command line access to the Revolut Business API", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Auth { action } => action.execute().await,
            Commands::Show { resource } => resource.execute().await,
            Commands::Webhook { action } => action.execute().await,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage OAuth tokens
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    Show {
        #[command(subcommand)]
        resource: ShowResource,
    },
    /// Manage the webhook registration
    Webhook {
        #[command(subcommand)]
        action: WebhookAction,
    },
}
