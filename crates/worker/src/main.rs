use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pricebrain_core::domain::decision::BatchSummary;
use pricebrain_core::pricing::predictor::PricePredictor;
use pricebrain_core::pricing::{PricingEngine, PricingPolicy};

mod report;

#[derive(Debug, Parser)]
#[command(name = "pricebrain_worker")]
struct Args {
    /// Batch request JSON file (`{"products": [...]}`), or `-` for stdin.
    #[arg(long)]
    input: String,

    /// Where to write the pricing report. Defaults to stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Overrides PRICING_MODEL_PATH.
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Price the batch and log the summary without writing a report.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = pricebrain_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let text = read_input(&args.input).await?;
    let request = report::parse_request(&text)?;

    let model_path = args.model_path.unwrap_or_else(|| settings.model_path());
    let model = match pricebrain_core::model::load_model(&model_path) {
        Ok(model) => model,
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %format!("{e:#}"), "model load failed; pricing with rule-based fallback");
            None
        }
    };
    let engine = PricingEngine::new(PricePredictor::new(model), PricingPolicy::default());

    let decisions = engine.price_batch(&request.products);
    let summary = BatchSummary::from_decisions(&decisions);

    tracing::info!(
        total = summary.total,
        ai_priced = summary.ai_priced,
        fallback_priced = summary.fallback_priced,
        margin_guarded = summary.margin_guarded,
        dry_run = args.dry_run,
        "batch priced"
    );

    if args.dry_run {
        return Ok(());
    }

    let report = report::PricingReport::new(
        chrono::Utc::now(),
        engine.predictor().is_available(),
        &decisions,
    );
    let body = serde_json::to_string_pretty(&report).context("failed to serialize report")?;

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, body)
                .await
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{body}"),
    }

    Ok(())
}

async fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("failed to read batch request from stdin")?;
        return Ok(buf);
    }

    tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("failed to read batch request {input}"))
}

fn init_sentry(settings: &pricebrain_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
