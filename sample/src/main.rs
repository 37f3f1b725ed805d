//! Walk through the three API operations against a real or mock endpoint.
//!
//! ```bash
//! # Against the local mock server
//! cargo run -p mock-server &
//! chimp-sample --base-url http://127.0.0.1:3000 \
//!     --email test@example.com --api-key test-key --app-id sample
//!
//! # Complete rewrite driven by an options file
//! chimp-sample --file article.txt --options options.json
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chimp_core::{
    estimate_credits, ClientConfig, CreateSpinOptions, PosMatch, Quality, RewriteOptions,
    RewriteServiceClient,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "chimp-sample")]
#[command(about = "Rewrite an article, create a spin from it and show credit usage")]
#[command(version)]
struct Cli {
    /// Article to rewrite.
    #[arg(long, short, default_value = "testarticle.txt")]
    file: PathBuf,

    /// Account email.
    #[arg(long, env = "CHIMP_EMAIL")]
    email: String,

    /// Account API key.
    #[arg(long, env = "CHIMP_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Identifier of this application, at most 100 characters.
    #[arg(long, env = "CHIMP_APP_ID", default_value = "chimp-sample")]
    app_id: String,

    /// Override the service endpoint.
    #[arg(long, env = "CHIMP_BASE_URL")]
    base_url: Option<String>,

    /// Request timeout in seconds, 0 to wait forever.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// JSON file with rewrite options for the complete rewrite.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("chimp_core=debug,chimp_sample=debug,info")
    } else {
        EnvFilter::new("chimp_sample=info,warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// The option set used when no options file is given.
fn complete_options() -> RewriteOptions {
    RewriteOptions {
        quality: Some(Quality::Better),
        phrase_quality: Some(Quality::Better),
        pos_match: Some(PosMatch::Full),
        language: Some("en".to_string()),
        rewrite: Some(false),
        sentence_rewrite: Some(true),
        grammar_check: Some(true),
        replace_phrases_with_phrases: Some(false),
        reorder_paragraphs: Some(false),
        spin_tidy: Some(true),
        replace_frequency: Some(1),
        exclude_original: Some(false),
        max_synonyms: Some(10),
        spin_within_spin: Some(true),
        max_spin_depth: Some(0),
        instant_unique: None,
        protected_terms: vec!["You spin me right round baby, right round".to_string()],
        tag_protect: None,
    }
}

fn load_options(path: Option<&PathBuf>) -> Result<RewriteOptions> {
    let Some(path) = path else {
        return Ok(complete_options());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading options from {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing options in {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let text = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("reading article {}", cli.file.display()))?;
    let options = load_options(cli.options.as_ref())?;

    let mut config = ClientConfig::new(cli.app_id.as_str())?
        .with_timeout((cli.timeout > 0).then(|| Duration::from_secs(cli.timeout)));
    if let Some(url) = &cli.base_url {
        config = config.with_base_url(url.as_str());
    }
    let client = RewriteServiceClient::new(config)?;

    // Simple rewrite, server defaults for everything.
    let result = client
        .rewrite(&cli.email, &cli.api_key, &text, &RewriteOptions::default())
        .await;
    if !result.is_success() {
        bail!("Chimp Rewrite failed: {}", result.output);
    }
    println!("--- Simple rewrite ---\n{}\n", result.output);

    // Complete rewrite.
    info!(
        credits = estimate_credits(&text, &options),
        advanced = options.is_advanced(),
        "complete rewrite"
    );
    let result = client
        .rewrite(&cli.email, &cli.api_key, &text, &options)
        .await;
    if !result.is_success() {
        bail!("Chimp Rewrite failed: {}", result.output);
    }
    println!("--- Complete rewrite ---\n{}\n", result.output);

    // Create a spin from the spintax just returned.
    let spin = client
        .create_spin(
            &cli.email,
            &cli.api_key,
            &result.output,
            &CreateSpinOptions::default(),
        )
        .await;
    if !spin.is_success() {
        bail!("Create Spin failed: {}", spin.output);
    }
    println!("--- Create spin ---\n{}\n", spin.output);

    let stats = client.usage_statistics(&cli.email, &cli.api_key).await;
    if stats.is_error() {
        println!("Getting statistics failed because of: {}", stats.error);
    } else {
        println!("Remaining queries this month: {}", stats.remainingthismonth);
    }

    Ok(())
}
