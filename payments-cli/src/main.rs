//! Payments CLI
//!
//! Command-line interface for the payment record API.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::{Value, json};

use payments_client::PaymentsClient;
use payments_types::{
    CreatePaymentRequest, Network, NotifyRequest, PaymentFilters, PaymentStatus,
};

#[derive(Parser)]
#[command(name = "payments")]
#[command(author, version, about = "Payment record API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Payments API
    #[arg(
        long,
        env = "PAYMENTS_API_URL",
        default_value = "http://localhost:3000"
    )]
    api_url: String,

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
    /// List supported settlement networks
    Networks,
    /// Show reference exchange rates
    Rates,
    /// Check API health
    Health,
}

#[derive(Subcommand)]
enum PaymentCommands {
    /// Submit a payment draft
    Create {
        /// Amount in the smallest currency unit
        #[arg(long)]
        amount: i64,
        #[arg(long)]
        currency: Option<String>,
        /// Settlement network (ethereum, polygon, bsc)
        #[arg(long)]
        network: Option<Network>,
        #[arg(long)]
        description: Option<String>,
        /// Extra fields as a JSON object, merged into the draft
        #[arg(long)]
        data: Option<String>,
    },
    /// List payments
    List {
        #[arg(long)]
        status: Option<PaymentStatus>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get a payment
    Get { id: String },
    /// Get full payment details
    Details { id: String },
    /// Get the status of a payment
    Status { id: String },
    /// Find a payment by external reference
    ByReference { reference: String },
    /// Save the QR code image of a payment as PNG
    Qr {
        id: String,
        /// Output file
        #[arg(long, default_value = "payment-qr.png")]
        out: PathBuf,
    },
    /// Show the QR code of a payment as base64 text
    QrCode { id: String },
    /// Send a status notification
    Notify {
        id: String,
        /// New status (PENDING, PROCESSING, COMPLETED, FAILED, EXPIRED)
        #[arg(long)]
        status: Option<PaymentStatus>,
        /// Failure reason
        #[arg(long)]
        reason: Option<String>,
        /// Shared secret to sign the notification with
        #[arg(long, env = "PAYMENTS_NOTIFY_SECRET")]
        secret: Option<String>,
    },
    /// Cancel a payment
    Cancel {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Get the receipt of a payment
    Receipt { id: String },
}

/// Builds a payment draft from the `create` arguments.
fn build_draft(
    amount: i64,
    currency: Option<String>,
    network: Option<Network>,
    description: Option<String>,
    data: Option<String>,
) -> Result<CreatePaymentRequest> {
    let mut draft = match data {
        Some(raw) => match serde_json::from_str(&raw)? {
            Value::Object(map) => map,
            _ => anyhow::bail!("--data must be a JSON object"),
        },
        None => CreatePaymentRequest::new(),
    };

    draft.insert("amount".into(), json!(amount));
    if let Some(currency) = currency {
        draft.insert("currency".into(), json!(currency));
    }
    if let Some(network) = network {
        draft.insert("network".into(), json!(network));
    }
    if let Some(description) = description {
        draft.insert("description".into(), json!(description));
    }
    Ok(draft)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let client = PaymentsClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Networks => print_json(&client.get_networks().await?)?,

        Commands::Rates => print_json(&client.get_exchange_rates().await?)?,

        Commands::Payment { action } => match action {
            PaymentCommands::Create {
                amount,
                currency,
                network,
                description,
                data,
            } => {
                let draft = build_draft(amount, currency, network, description, data)?;
                print_json(&client.create_payment(&draft).await?)?;
            }
            PaymentCommands::List {
                status,
                currency,
                page,
                limit,
            } => {
                let filters = PaymentFilters {
                    status,
                    currency,
                    page,
                    limit,
                };
                print_json(&client.list_payments(&filters).await?)?;
            }
            PaymentCommands::Get { id } => print_json(&client.get_payment(&id).await?)?,
            PaymentCommands::Details { id } => {
                print_json(&client.get_payment_details(&id).await?)?
            }
            PaymentCommands::Status { id } => {
                println!("{}", client.get_payment_status(&id).await?);
            }
            PaymentCommands::ByReference { reference } => {
                print_json(&client.get_payment_by_reference(&reference).await?)?
            }
            PaymentCommands::Qr { id, out } => {
                let image = client.get_qr(&id).await?;
                tokio::fs::write(&out, &image).await?;
                println!("✓ Wrote {} bytes to {}", image.len(), out.display());
            }
            PaymentCommands::QrCode { id } => print_json(&client.get_qr_code(&id).await?)?,
            PaymentCommands::Notify {
                id,
                status,
                reason,
                secret,
            } => {
                let client = match secret {
                    Some(secret) => client.with_notify_secret(secret),
                    None => client,
                };
                client.notify(&id, &NotifyRequest { status, reason }).await?;
                println!("✓ Notification accepted");
            }
            PaymentCommands::Cancel { id, reason } => {
                print_json(&client.cancel_payment(&id, reason).await?)?
            }
            PaymentCommands::Receipt { id } => print_json(&client.get_receipt(&id).await?)?,
        },
    }

    Ok(())
}
