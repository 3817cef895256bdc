//! Cryptomus CLI
//!
//! Command-line client for the Cryptomus payment gateway, including a
//! local listener that verifies inbound webhook signatures.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

use cryptomus_client::{API_URL, CryptomusClient, Webhook};
use cryptomus_types::{
    CreatePaymentRequest, CreatePayoutRequest, CreateWalletRequest, InfoRequest,
};

#[derive(Parser)]
#[command(name = "cryptomus")]
#[command(author, version, about = "Cryptomus API CLI client", long_about = None)]
struct Cli {
    /// Merchant UUID
    #[arg(long, env = "CRYPTOMUS_MERCHANT_UUID")]
    merchant: String,

    /// Base URL of the Cryptomus API
    #[arg(long, env = "CRYPTOMUS_API_URL", default_value = API_URL)]
    api_url: String,

    /// API key for payment operations
    #[arg(long, env = "CRYPTOMUS_PAYMENT_KEY")]
    payment_key: Option<String>,

    /// API key for payout operations
    #[arg(long, env = "CRYPTOMUS_PAYOUT_KEY")]
    payout_key: Option<String>,

    /// API key for webhook verification
    #[arg(long, env = "CRYPTOMUS_WEBHOOK_KEY")]
    webhook_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Payment operations
    Payment {
        #[command(subcommand)]
        action: PaymentCommands,
    },
    /// Payout operations
    Payout {
        #[command(subcommand)]
        action: PayoutCommands,
    },
    /// Webhook operations
    Webhook {
        #[command(subcommand)]
        action: WebhookCommands,
    },
}

#[derive(Subcommand)]
enum PaymentCommands {
    /// List available payment services
    Services,
    /// Create a payment invoice
    Create {
        /// Amount, e.g. "10.00"
        #[arg(long)]
        amount: String,
        #[arg(long)]
        currency: String,
        #[arg(long)]
        order_id: String,
        #[arg(long)]
        network: Option<String>,
        #[arg(long)]
        url_return: Option<String>,
        #[arg(long)]
        url_callback: Option<String>,
        /// Allow paying the invoice in several transactions
        #[arg(long)]
        multiple: bool,
        /// Invoice lifetime in seconds
        #[arg(long)]
        lifetime: Option<String>,
        #[arg(long)]
        to_currency: Option<String>,
    },
    /// Get payment information
    Info {
        #[arg(long)]
        uuid: Option<String>,
        #[arg(long)]
        order_id: Option<String>,
    },
    /// Get payment history
    History {
        /// Page cursor
        #[arg(long, default_value = "1")]
        page: String,
    },
    /// Create a static wallet address
    Wallet {
        #[arg(long)]
        network: String,
        #[arg(long)]
        currency: String,
        #[arg(long)]
        order_id: String,
        #[arg(long)]
        url_callback: Option<String>,
    },
}

#[derive(Subcommand)]
enum PayoutCommands {
    /// Create a payout
    Create {
        #[arg(long)]
        amount: String,
        #[arg(long)]
        currency: String,
        #[arg(long)]
        network: String,
        #[arg(long)]
        order_id: String,
        /// Destination address
        #[arg(long)]
        address: String,
        /// Subtract the network fee from the amount instead of adding it
        #[arg(long)]
        subtract_fee: bool,
        #[arg(long)]
        url_callback: String,
    },
    /// Get payout information
    Info {
        #[arg(long)]
        uuid: Option<String>,
        #[arg(long)]
        order_id: Option<String>,
    },
}

#[derive(Subcommand)]
enum WebhookCommands {
    /// Verify the signature of a webhook body
    Verify {
        /// JSON body as delivered by the provider
        #[arg(long)]
        body: String,
        /// Source IP of the delivering request
        #[arg(long)]
        ip: Option<String>,
        /// Also require the source IP to match the provider's address
        #[arg(long)]
        check_ip: bool,
    },
    /// Start a local webhook listener
    Listen {
        /// Port to listen on
        #[arg(long, default_value = "3000")]
        port: u16,
        /// Require the source IP to match the provider's address
        #[arg(long)]
        check_ip: bool,
    },
}

fn require_key(key: Option<String>, name: &str) -> Result<String> {
    key.with_context(|| format!("{} is required", name))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let client = CryptomusClient::new(&cli.merchant).with_base_url(&cli.api_url);

    match cli.command {
        Commands::Payment { action } => {
            let payment = client.payment(require_key(cli.payment_key, "CRYPTOMUS_PAYMENT_KEY")?);
            match action {
                PaymentCommands::Services => {
                    let envelope = payment.services(Map::new()).await?;
                    println!("{}", serde_json::to_string_pretty(&envelope)?);
                }
                PaymentCommands::Create {
                    amount,
                    currency,
                    order_id,
                    network,
                    url_return,
                    url_callback,
                    multiple,
                    lifetime,
                    to_currency,
                } => {
                    let request = CreatePaymentRequest {
                        amount,
                        currency,
                        network,
                        order_id,
                        url_return,
                        url_callback,
                        is_payment_multiple: multiple.then_some(true),
                        lifetime,
                        to_currency,
                    };
                    let envelope = payment.create(&request).await?;
                    println!("{}", serde_json::to_string_pretty(&envelope)?);
                }
                PaymentCommands::Info { uuid, order_id } => {
                    let envelope = payment.info(&InfoRequest { uuid, order_id }).await?;
                    println!("{}", serde_json::to_string_pretty(&envelope)?);
                }
                PaymentCommands::History { page } => {
                    let envelope = payment.history(page, Map::new()).await?;
                    println!("{}", serde_json::to_string_pretty(&envelope)?);
                }
                PaymentCommands::Wallet {
                    network,
                    currency,
                    order_id,
                    url_callback,
                } => {
                    let request = CreateWalletRequest {
                        network,
                        currency,
                        order_id,
                        url_callback,
                    };
                    let envelope = payment.create_wallet(&request).await?;
                    println!("{}", serde_json::to_string_pretty(&envelope)?);
                }
            }
        }

        Commands::Payout { action } => {
            let payout = client.payout(require_key(cli.payout_key, "CRYPTOMUS_PAYOUT_KEY")?);
            match action {
                PayoutCommands::Create {
                    amount,
                    currency,
                    network,
                    order_id,
                    address,
                    subtract_fee,
                    url_callback,
                } => {
                    let request = CreatePayoutRequest {
                        amount,
                        currency,
                        network,
                        order_id,
                        address,
                        is_subtract: if subtract_fee { "1" } else { "0" }.to_string(),
                        url_callback,
                    };
                    let envelope = payout.create(&request).await?;
                    println!("{}", serde_json::to_string_pretty(&envelope)?);
                }
                PayoutCommands::Info { uuid, order_id } => {
                    let envelope = payout.info(&InfoRequest { uuid, order_id }).await?;
                    println!("{}", serde_json::to_string_pretty(&envelope)?);
                }
            }
        }

        Commands::Webhook { action } => {
            let key = require_key(cli.webhook_key, "CRYPTOMUS_WEBHOOK_KEY")?;
            match action {
                WebhookCommands::Verify { body, ip, check_ip } => {
                    let payload: Map<String, Value> =
                        serde_json::from_str(&body).context("body must be a JSON object")?;
                    let verifier = Webhook::new(key, check_ip);
                    if verifier.verify_signature(&payload, ip.as_deref())? {
                        println!("✓ signature valid");
                    } else {
                        println!("✗ signature invalid");
                        std::process::exit(1);
                    }
                }
                WebhookCommands::Listen { port, check_ip } => {
                    let verifier = Arc::new(Webhook::new(key, check_ip));
                    let app = axum::Router::new()
                        .route("/webhook", axum::routing::post(handle_webhook))
                        .with_state(verifier);
                    let addr = SocketAddr::from(([127, 0, 0, 1], port));
                    println!("Listening for webhooks on {}", addr);
                    let listener = tokio::net::TcpListener::bind(&addr).await?;
                    axum::serve(
                        listener,
                        app.into_make_service_with_connect_info::<SocketAddr>(),
                    )
                    .await?;
                }
            }
        }
    }

    Ok(())
}

async fn handle_webhook(
    axum::extract::State(verifier): axum::extract::State<Arc<Webhook>>,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<SocketAddr>,
    axum::Json(payload): axum::Json<Map<String, Value>>,
) -> axum::http::StatusCode {
    let ip = addr.ip().to_string();
    match verifier.verify_signature(&payload, Some(&ip)) {
        Ok(true) => {
            println!("✓ verified webhook from {}", ip);
            println!("{}", Value::Object(payload));
            axum::http::StatusCode::OK
        }
        Ok(false) => {
            println!("✗ rejected webhook from {}", ip);
            axum::http::StatusCode::FORBIDDEN
        }
        Err(err) => {
            println!("✗ unusable webhook from {}: {}", ip, err);
            axum::http::StatusCode::BAD_REQUEST
        }
    }
}
