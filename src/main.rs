// Copyright 2025 Chris Custine
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

mod app;
mod config;
mod map;
mod ui;

use std::error::Error;

use clap::Parser;
use eframe::egui;
use log::{error, info, warn};
use mimalloc::MiMalloc;
use radar_client::MetadataClient;

use app::RadarApp;
use config::{AppConfig, API_URL_ENV};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Live weather radar over a slippy map
#[derive(Parser, Debug)]
#[command(name = "radar-desktop", version, about)]
struct Cli {
    /// Tile server base URL (overrides config and RADAR_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Seconds between metadata polls
    #[arg(long)]
    interval: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Print the config file location and exit
    #[arg(long)]
    print_config_path: bool,
}

fn load_config(cli: &Cli) -> AppConfig {
    let mut config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config, using defaults: {}", e);
            AppConfig::default()
        }
    };

    config.apply_overrides(
        cli.api_url.clone(),
        std::env::var(API_URL_ENV).ok(),
        cli.interval,
    );
    config.sanitize();
    config
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if cli.print_config_path {
        println!("{}", AppConfig::get_config_path()?.display());
        return Ok(());
    }

    info!("Starting Radar Desktop...");

    let config = load_config(&cli);
    info!("Tile server: {}", config.api_base_url);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("radar-io")
        .enable_all()
        .build()?;

    let client = MetadataClient::new(config.api_base_url.clone(), config.request_timeout())?;

    let health_client = client.clone();
    runtime.spawn(async move {
        match health_client.check_health().await {
            Ok(true) => info!("Tile server at {} is healthy", health_client.base_url()),
            Ok(false) => warn!("Tile server at {} reports unhealthy", health_client.base_url()),
            Err(e) => error!("Tile server health check failed: {}", e),
        }
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Radar Desktop"),
        ..Default::default()
    };

    let handle = runtime.handle().clone();
    eframe::run_native(
        "Radar Desktop",
        options,
        Box::new(move |cc| Ok(Box::new(RadarApp::new(cc, config, client, &handle)))),
    )?;

    info!("Radar Desktop exiting");
    Ok(())
}
