//! FlavorMap client - command-line front end
//!
//! Stands in for the form and map of the web page: every command runs
//! against a headless map, and prints what the page would show.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flavormap_client::{
    FileStorage, HeadlessMap, HttpTransport, LocalStore, MapSurface, Session, SourceLoader,
    SpotForm,
};
use flavormap_common::config::{resolve_root_folder, RootFolder, TomlConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for flavormap
#[derive(Parser, Debug)]
#[command(name = "flavormap")]
#[command(about = "Drop food spots on a map, with or without a backend")]
#[command(version)]
struct Args {
    /// Folder holding on-device data
    #[arg(short, long, env = "FLAVORMAP_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Primary spots resource
    #[arg(long, env = "FLAVORMAP_API_URL")]
    api_url: Option<String>,

    /// Static snapshot resource
    #[arg(long, env = "FLAVORMAP_SNAPSHOT_URL")]
    snapshot_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load, merge and list spots (newest first)
    List {
        /// Print each entry as escaped list markup
        #[arg(long)]
        html: bool,
    },

    /// Add a spot
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        cuisine: String,
        /// Left empty, an emoji is picked from the cuisine
        #[arg(long, default_value = "")]
        emoji: String,
        #[arg(long, default_value = "")]
        note: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: String,
        #[arg(long, allow_hyphen_values = true)]
        lng: String,
    },

    /// Focus the map on a list entry (0 = newest)
    Show { index: usize },

    /// Print the spots saved on this device
    Local,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config = TomlConfig::load();
    let level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("flavormap_client={},flavormap_common={}", level, level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting FlavorMap client v{}", env!("CARGO_PKG_VERSION"));

    let mut config = config.context("Failed to load configuration")?;
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }
    if let Some(snapshot_url) = args.snapshot_url {
        config.snapshot_url = snapshot_url;
    }

    let root = RootFolder::new(resolve_root_folder(args.root_folder.as_deref(), &config));
    info!("Root folder: {}", root.path().display());

    let transport = HttpTransport::from_config(&config).context("Failed to build HTTP client")?;
    let storage = FileStorage::new(root.local_storage_dir());
    let mut session = Session::new(
        SourceLoader::new(Arc::new(transport)),
        LocalStore::new(Box::new(storage)),
        HeadlessMap::new(),
    );

    match args.command {
        Command::List { html } => {
            let report = session.refresh().await;
            println!("[{}]", report.mode.label());
            if let Some(notice) = report.notice() {
                println!("{}", notice);
            }
            if html {
                for entry in session.view().list() {
                    println!("{}", entry.to_html());
                }
            } else {
                print_list(&session);
            }
        }
        Command::Add {
            name,
            cuisine,
            emoji,
            note,
            lat,
            lng,
        } => {
            let form = SpotForm {
                name,
                cuisine,
                emoji,
                note,
                lat,
                lng,
            };
            match session.submit(&form).await {
                Ok(outcome) => {
                    println!("[{}]", outcome.report().mode.label());
                    println!("{}", outcome.status());
                }
                Err(e) => {
                    eprintln!("{}", e.status());
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Show { index } => {
            session.refresh().await;
            let Some(entry) = session.select(index) else {
                eprintln!("No list entry at index {}", index);
                return Ok(ExitCode::FAILURE);
            };
            let map = session.map();
            println!("{} {} ({})", entry.emoji, entry.name, entry.coordinates_text());
            println!(
                "Map centre: {}, {} @ zoom {}",
                map.center().lat,
                map.center().lng,
                map.zoom()
            );
            match map.open_popup_marker() {
                Some(marker) => println!("Popup: {}", marker.popup_html),
                None => println!("No marker for this spot"),
            }
        }
        Command::Local => {
            let spots = session.store().load();
            println!("{}", serde_json::to_string_pretty(&spots)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_list(session: &Session<HeadlessMap>) {
    let entries = session.view().list();
    if entries.is_empty() {
        println!("No spots yet.");
        return;
    }
    for (index, entry) in entries.iter().enumerate() {
        println!(
            "{:>3}. {} {} [{}] ({})",
            index,
            entry.emoji,
            entry.name,
            entry.cuisine,
            entry.coordinates_text()
        );
        if !entry.note.is_empty() {
            println!("     {}", entry.note);
        }
    }
}
