// Copyright 2026 Boundless Foundation, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use network_explorer::{
    activity::{ActivityFeed, EntityContext},
    client::ExplorerClient,
    config::Config,
    pane::{ActivityPane, PaneContent, Viewport},
    rewards::{RewardState, RewardSummaryController, RewardTimeframe},
    source::FetchOutcome,
};
use url::Url;

/// Reward summaries and activity of hotspots, accounts and validators.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct MainArgs {
    /// Path to a TOML config file.
    #[clap(long, env = "EXPLORER_CONFIG", global = true)]
    config: Option<PathBuf>,
    /// Explorer API base URL, takes precedence over the config file and EXPLORER_API_URL.
    #[clap(long, global = true)]
    api_url: Option<Url>,
    /// Whether to log in JSON format.
    #[clap(long, env, default_value_t = false, global = true)]
    log_json: bool,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the reward cards of a hotspot.
    Rewards {
        address: String,
        /// Cards to print, defaults to the configured cards.
        #[clap(long, value_enum, value_delimiter = ',')]
        cards: Vec<RewardTimeframe>,
    },
    /// Print the activity of a hotspot, account or validator.
    Activity {
        #[clap(value_enum)]
        context: EntityContext,
        address: String,
        /// Filter name, defaults to the context's default filter.
        #[clap(long)]
        filter: Option<String>,
        /// Number of pages to fetch.
        #[clap(long, default_value = "1")]
        pages: u32,
    },
}

/// The terminal has no scroll position to reset.
struct Stdout;

impl Viewport for Stdout {
    fn scroll_to_top(&self) {}
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = MainArgs::parse();

    if args.log_json {
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }

    let mut config = match &args.config {
        Some(path) => Config::load(path).await.context("Failed to load explorer config")?,
        None => Config::default(),
    };

    let client = match &args.api_url {
        Some(url) => ExplorerClient::with_config(url.clone(), &config.api)?,
        None => ExplorerClient::from_config(&config.api)?,
    };
    let client = Arc::new(client);

    match args.command {
        Command::Rewards { address, cards } => {
            if !cards.is_empty() {
                config.rewards.cards = cards;
            }
            if config.rewards.cards.contains(&RewardTimeframe::Year) {
                config.rewards.year_summary = true;
            }
            print_rewards(client, address, &config).await
        }
        Command::Activity { context, address, filter, pages } => {
            print_activity(client, context, address, filter, pages, &config).await
        }
    }
}

async fn print_rewards(
    client: Arc<ExplorerClient>,
    address: String,
    config: &Config,
) -> Result<()> {
    let controller = RewardSummaryController::new(client, address.clone(), config.rewards.clone());
    controller.load().await;

    let summary = match controller.state().await {
        RewardState::Ready(summary) => summary,
        RewardState::Failed(err) => bail!("Failed to load rewards for {address}: {err}"),
        RewardState::Loading => bail!("Rewards for {address} are still loading"),
    };

    println!("Rewards for {address}");
    for card in summary.cards(&config.rewards.cards) {
        let change = card
            .change_percent()
            .map(|change| format!(" ({change:+.2}%)"))
            .unwrap_or_default();
        println!("  {:<10} {:>16.8} HNT{change}", card.timeframe.label(), card.value);
    }
    Ok(())
}

async fn print_activity(
    client: Arc<ExplorerClient>,
    context: EntityContext,
    address: String,
    filter: Option<String>,
    pages: u32,
    config: &Config,
) -> Result<()> {
    let feed = ActivityFeed::new(client, context, address, config.activity.page_size);
    let pane = ActivityPane::new(feed, Stdout, &config.scroll);

    let outcome = match &filter {
        Some(name) => pane.select_filter(name).await?,
        None => pane.feed().load().await,
    };
    if outcome == FetchOutcome::Applied {
        for _ in 1..pages {
            if pane.fetch_more().await != FetchOutcome::Applied {
                break;
            }
        }
    }

    match pane.content().await {
        PaneContent::List { title, transactions, has_more, .. } => {
            println!("{title}");
            for txn in &transactions {
                println!("  {:>10}  {:<28} {}", txn.height, txn.txn_type, txn.hash);
            }
            if has_more {
                println!("  ... more available, increase --pages");
            }
            Ok(())
        }
        PaneContent::Error { message } => bail!("Failed to load {context} activity: {message}"),
        PaneContent::Skeleton => bail!("{context} activity is still loading"),
    }
}
