//! # newsreel
//!
//! Reads one category of a syndicated news feed and turns the newest entries
//! into an edition: each article gets a model-written summary, a sentiment
//! tag, narrated audio and its inline image. Editions are written as JSON
//! and, optionally, as a standalone HTML page.
//!
//! ## Usage
//!
//! ```sh
//! GENAI_API_KEY=... newsreel -c "Top Stories" -n 5 -j ./json -o ./html
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: download and normalize the category feed
//! 2. **Enrichment**: summarize, classify, narrate and fetch the image of
//!    every article, one after another
//! 3. **Output**: write the JSON edition and the HTML page

use chrono::Local;
use clap::Parser;
use futures::stream::{self, StreamExt};
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod config;
mod feeds;
mod http;
mod images;
mod models;
mod narrator;
mod outputs;
mod sentiment;
mod utils;

use api::{GenAiClient, Summarizer};
use cli::Cli;
use config::AppConfig;
use feeds::{fetch_articles, FetchOutcome};
use models::{Edition, Story};
use narrator::Narrator;
use outputs::{html, json};
use sentiment::{classify_sentiment, polarity};
use utils::{ensure_writable_dir, time_of_day};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("newsreel starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(
        category = %args.category,
        count = args.count,
        ?args.json_output_dir,
        ?args.html_output_dir,
        "Parsed CLI arguments"
    );

    let config = AppConfig::load(args.config.as_deref()).await?;

    if args.list_categories {
        for name in config.category_names() {
            println!("{name}");
        }
        return Ok(());
    }

    // clap enforces both unless --list-categories was given.
    let json_output_dir = args
        .json_output_dir
        .as_deref()
        .ok_or("--json-output-dir is required")?;
    let source = config.feed(&args.category)?;
    info!(category = %source.name, url = %source.url, "Resolved category");

    // Early check: ensure output dirs are writable
    for dir in std::iter::once(json_output_dir).chain(args.html_output_dir.as_deref()) {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let client = http::build_client(&config.user_agent, config.insecure_tls || args.insecure)?;

    // ---- Fetch feed ----
    let outcome = fetch_articles(&client, &source.url, usize::from(args.count)).await;
    let error_message = outcome.error_message();
    if let FetchOutcome::Failed(e) = &outcome {
        error!(error = %e, url = %source.url, "Feed fetch failed");
    }
    if outcome.articles().is_empty() {
        warn!("No articles found for this category.");
    } else {
        info!(count = outcome.articles().len(), "Fetched articles");
    }
    let articles = outcome.into_articles();

    // ---- Enrich articles, one at a time ----
    let summarizer = Summarizer::new(GenAiClient::new(
        client.clone(),
        args.genai_api_key.clone(),
        config.genai.clone(),
    ));
    let narrator = Narrator::new(client.clone(), config.tts.base_url.clone());
    let total_articles = articles.len();

    let stories: Vec<Story> = {
        let summarizer = &summarizer;
        let narrator = &narrator;
        let client = &client;
        let lang = args.lang.as_str();
        stream::iter(articles.into_iter().enumerate())
            .then(|(i, article)| async move {
                debug!(index = i, title = %article.title, "Processing article");
                let summary = summarizer.summarize(&article.description).await;
                let score = polarity(&summary);
                let sentiment = classify_sentiment(&summary);
                let audio_html = narrator.synthesize_speech(&summary, lang).await;
                let image = images::image_slot(client, article.image_url.as_deref()).await;
                info!(index = i, %sentiment, "Processed article");
                Story {
                    article,
                    summary,
                    sentiment,
                    polarity: score,
                    audio_html,
                    image,
                }
            })
            .collect()
            .await
    };
    info!(total = total_articles, "Completed article processing");

    // ---- Build edition ----
    let now = Local::now();
    let edition = Edition {
        category: source.name.clone(),
        feed_url: source.url.clone(),
        local_date: now.date_naive().to_string(),
        time_of_day: time_of_day(),
        local_time: now.time().format("%H:%M:%S").to_string(),
        stories,
        error: error_message,
    };
    info!(
        time_of_day = %edition.time_of_day,
        local_date = %edition.local_date,
        local_time = %edition.local_time,
        "Edition built"
    );

    // ---- Outputs ----
    if let Err(e) = json::write_edition(&edition, json_output_dir).await {
        error!(error = %e, "Failed to write JSON edition");
    }

    if let Some(html_dir) = args.html_output_dir.as_deref() {
        if let Err(e) = html::write_edition(&edition, html_dir).await {
            error!(error = %e, "Failed to write HTML edition");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        stories = edition.stories.len(),
        "Execution complete"
    );

    Ok(())
}
