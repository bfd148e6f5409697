use std::sync::Arc;

use clap::{Parser, Subcommand};

use storefront_core::ProductId;
use storefront_store::{CartStore, RecordingNotifier, UpdateProductAmount};

use crate::config::CliConfig;
use crate::render::render_cart;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront cart CLI", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: CliConfig,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Print the cart
    Show,
    /// Add one unit of a product
    Add {
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        product_id: ProductId,
    },
    /// Set the quantity of a product already in the cart
    Update {
        product_id: ProductId,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

/// What a run produced: the rendered cart and any user notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub output: String,
    pub notifications: Vec<String>,
    pub succeeded: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<Report> {
        let catalog = self.config.catalog()?;
        let storage = self.config.storage().await?;
        let notifier = Arc::new(RecordingNotifier::new());

        let store = CartStore::load_with_key(
            catalog,
            storage,
            notifier.clone(),
            self.config.cart_key.clone(),
        )
        .await?;

        let result = match self.command {
            Commands::Show => Ok(()),
            Commands::Add { product_id } => store.add_product(product_id).await,
            Commands::Remove { product_id } => store.remove_product(product_id).await,
            Commands::Update { product_id, amount } => {
                store
                    .update_product_amount(UpdateProductAmount { product_id, amount })
                    .await
            }
        };

        if let Err(err) = &result {
            tracing::debug!("command failed: {err}");
        }

        Ok(Report {
            output: render_cart(&store.cart()),
            notifications: notifier.take(),
            succeeded: result.is_ok(),
        })
    }
}
