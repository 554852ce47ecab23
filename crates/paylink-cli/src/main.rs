//! paylink Terminal Driver
//!
//! Runs the full payment flow from the command line: amount → phone →
//! account → submission → confirmation poll → receipt PNG in the
//! working directory. The recipient profile comes from the environment;
//! the payer's inputs come from the arguments.
//!
//! ```text
//! paylink <amount> <payer-phone> [account-name]
//! ```

use std::sync::Arc;

use anyhow::{bail, Context};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paylink_core::{
    payment_link, normalize, PaymentSession, PollConfig, PollOutcome, SessionConfig, Step,
    UserProfile,
};
use paylink_gateway::HttpGateway;
use paylink_receipt::{deliver, Renderer};

fn profile_from_env() -> anyhow::Result<UserProfile> {
    let name = std::env::var("PAYLINK_RECIPIENT_NAME")
        .context("PAYLINK_RECIPIENT_NAME not set")?;
    let payment_key =
        std::env::var("PAYLINK_PAYMENT_KEY").context("PAYLINK_PAYMENT_KEY not set")?;
    let raw_phone =
        std::env::var("PAYLINK_RECIPIENT_PHONE").context("PAYLINK_RECIPIENT_PHONE not set")?;
    let phone = normalize(&raw_phone)
        .with_context(|| format!("PAYLINK_RECIPIENT_PHONE is not a valid number: {raw_phone}"))?;

    Ok(UserProfile {
        name,
        payment_key,
        phone,
        handle: std::env::var("PAYLINK_HANDLE").ok(),
        avatar_url: None,
        verified: None,
    })
}

fn session_config_from_env() -> SessionConfig {
    let mut config = SessionConfig::default();

    if let Some(min) = std::env::var("PAYLINK_MIN_AMOUNT")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        config.min_amount = min;
    }
    if let Some(max) = std::env::var("PAYLINK_MAX_AMOUNT")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        config.max_amount = max;
    }

    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (amount, payer_phone) = match (args.first(), args.get(1)) {
        (Some(amount), Some(phone)) => {
            let amount: u64 = amount
                .parse()
                .with_context(|| format!("amount is not a number: {amount}"))?;
            (amount, phone.clone())
        }
        _ => bail!("usage: paylink <amount> <payer-phone> [account-name]"),
    };
    let account_arg = args.get(2).cloned();

    let profile = profile_from_env()?;
    let config = session_config_from_env();
    let gateway = Arc::new(HttpGateway::from_env()?);

    let link = payment_link(profile.handle.as_deref().unwrap_or(&profile.name), None);
    tracing::info!(%link, recipient = %profile.name, "Starting payment");

    let mut session = PaymentSession::new(profile.clone(), config);

    session.submit_amount(amount).map_err(|e| {
        anyhow::anyhow!("{}", e.user_message())
    })?;

    let carrier = session
        .submit_phone(&payer_phone, gateway.as_ref())
        .await
        .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;
    tracing::info!(%carrier, "Payer number accepted");

    if let Some(name) = session.prefilled_name() {
        tracing::info!(name, "Account name resolved by lookup");
    }

    let account_name = account_arg
        .or_else(|| session.prefilled_name().map(str::to_string))
        .context("account name not resolvable; pass it as the third argument")?;

    session
        .submit_payment(&account_name, gateway.as_ref())
        .await
        .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;

    tracing::info!("Approve the request on the payer's handset to continue");

    // Ctrl-C stops the confirmation poll without killing the process.
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let outcome = session
        .await_confirmation(
            gateway.as_ref(),
            &PollConfig::default(),
            |status| tracing::info!(%status, "Status update"),
            &cancel,
        )
        .await?;

    match outcome {
        PollOutcome::Paid => {}
        PollOutcome::Failed(status) => bail!("payment failed with status '{status}'"),
        PollOutcome::TimedOut => {
            bail!("no confirmation arrived in time; the request may still complete")
        }
        PollOutcome::Cancelled => bail!("confirmation poll cancelled"),
    }

    debug_assert_eq!(session.step(), Step::Succeeded);
    let receipt = session
        .receipt()
        .context("session succeeded without a receipt")?;

    // Compose immediately, rasterize best-effort.
    let renderer = Renderer::default();
    let mut artifacts = renderer.compose(receipt, &profile, &link);
    tracing::info!(preview_bytes = artifacts.preview_url.len(), "Receipt preview ready");

    match renderer.rasterize_into(&mut artifacts).await {
        Ok(()) => {
            let raster = artifacts.raster().context("raster missing after build")?;
            let delivery = deliver(raster, None, std::path::Path::new(".")).await?;
            tracing::info!(?delivery, "Receipt image written");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rasterization failed; keeping the SVG preview only");
        }
    }

    tracing::info!(
        reference = %receipt.reference,
        amount = receipt.amount,
        "Payment confirmed"
    );

    Ok(())
}
