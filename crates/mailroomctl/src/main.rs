/*
 *  Copyright 2025-2026 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */


//! mailroomctl - operator tool for the mailroom client layer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mailroom_client::{ConfigLoader, Settings};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

/// Inspect mailroom queues and query the mailroom service
#[derive(Parser)]
#[command(name = "mailroomctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (can also be set via MAILROOM_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Mailroom base URL, overrides the settings file
    #[arg(long, env = "MAILROOM_URL", global = true)]
    mailroom_url: Option<String>,

    /// Queue backend URL, overrides the settings file
    #[arg(long, env = "MAILROOM_QUEUE_URL", global = true)]
    queue_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the version reported by mailroom
    Version,

    /// Batch task queue commands
    Queue {
        #[command(subcommand)]
        command: QueueCommands,
    },

    /// Courier channel queue commands
    Courier {
        #[command(subcommand)]
        command: CourierCommands,
    },

    /// Contact query commands
    Query {
        #[command(subcommand)]
        command: QueryCommands,
    },
}

#[derive(Subcommand)]
enum QueueCommands {
    /// Summarize the tasks waiting in every active org queue
    Dump {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum CourierCommands {
    /// List channels with queued messages
    Channels {
        /// List throttled channels instead of active ones
        #[arg(long)]
        throttled: bool,
    },
}

#[derive(Subcommand)]
enum QueryCommands {
    /// Parse a contact query and show what it references
    Parse {
        /// Org the query is evaluated for
        #[arg(long)]
        org: i64,

        /// Only check syntax, don't resolve fields and groups
        #[arg(long)]
        parse_only: bool,

        query: String,
    },
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = ConfigLoader::new()
        .load_or_default(cli.config.as_deref())
        .context("Failed to load settings")?;

    if let Some(url) = &cli.mailroom_url {
        settings.mailroom.base_url = url.clone();
    }
    if let Some(url) = &cli.queue_url {
        settings.queue.url = url.clone();
    }

    settings.validate().context("Invalid settings")?;
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.logging.level))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Version => commands::version::run(&settings).await?,
        Commands::Queue { command } => match command {
            QueueCommands::Dump { json } => commands::queue::dump(&settings, json).await?,
        },
        Commands::Courier { command } => match command {
            CourierCommands::Channels { throttled } => {
                commands::courier::channels(&settings, throttled).await?
            }
        },
        Commands::Query { command } => match command {
            QueryCommands::Parse {
                org,
                parse_only,
                query,
            } => commands::query::parse(&settings, org, &query, parse_only).await?,
        },
    }

    Ok(())
}
