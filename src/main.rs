// ScanBoard - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading
// 3. Logging initialisation (debug mode support)
// 4. API client and session store construction
// 5. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` can keep using
// `crate::app::...`, `crate::ui::...` etc.
pub use scanboard::api;
pub use scanboard::app;
pub use scanboard::core;
pub use scanboard::platform;
pub use scanboard::ui;
pub use scanboard::util;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "ScanBoard", version, about)]
struct Cli {
    /// Scan service root URL (overrides [server] base_url).
    #[arg(short = 'u', long = "api-url")]
    api_url: Option<String>,

    /// Directory holding config.toml and the saved session.
    #[arg(short = 'c', long = "config-dir")]
    config_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

/// Everything the GUI needs, resolved before the window opens.
struct Startup {
    controller: app::controller::AppController,
    config: platform::config::AppConfig,
}

fn bootstrap(cli: Cli) -> util::error::Result<Startup> {
    let paths = match cli.config_dir {
        Some(dir) => platform::config::PlatformPaths::rooted_at(dir),
        None => platform::config::PlatformPaths::resolve(),
    };

    let (mut config, config_warnings) = platform::config::load_config(&paths.config_dir);

    // Logging comes after config so [logging] settings apply from the start.
    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "ScanBoard starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    if let Some(url) = cli.api_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }

    let api = api::client::HttpApi::new(&config.base_url, config.request_timeout)?;
    tracing::info!(server = %api.base_url(), "Scan service configured");

    let store = app::session::SessionStore::new(app::session::credential_path(&paths.data_dir));
    let settings = app::scans::PollSettings {
        list_interval: config.list_interval,
        detail_interval: config.detail_interval,
        stop_on_terminal: config.stop_on_terminal,
    };

    let mut controller =
        app::controller::AppController::new(Arc::new(api), store, settings, cli.debug);
    controller.state.warnings = config_warnings.iter().map(|w| w.to_string()).collect();

    Ok(Startup { controller, config })
}

fn main() {
    let cli = Cli::parse();

    let Startup { controller, config } = match bootstrap(cli) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1100.0, 780.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    let server = config.base_url.clone();
    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            ui::theme::apply(&cc.egui_ctx, config.dark_mode, config.font_size);
            Ok(Box::new(gui::ScanBoardApp::new(controller, server)))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch ScanBoard GUI: {e}");
        std::process::exit(1);
    }
}
