//! Canvas Lab binary.
//!
//! ```text
//! canvas-lab [config.json] [--headless]
//! ```
//!
//! Opens the interactive viewer when built with the `egui` feature, otherwise
//! (or with `--headless`) runs the scripted session and prints JSON lines.

use std::io;

use canvas_lab::{headless, LabConfig, LabError};

fn load_config(path: Option<&str>) -> LabConfig {
    let Some(path) = path else {
        return LabConfig::default();
    };
    match LabConfig::load(path) {
        Ok(config) => {
            log::info!("loaded config from {}", path);
            config
        }
        Err(e) => {
            log::warn!("{} ({}), using defaults", e, path);
            LabConfig::default()
        }
    }
}

fn main() -> Result<(), LabError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut headless_mode = false;
    let mut config_path = None;
    for arg in std::env::args().skip(1) {
        if arg == "--headless" {
            headless_mode = true;
        } else {
            config_path = Some(arg);
        }
    }
    let config = load_config(config_path.as_deref());

    #[cfg(feature = "egui")]
    if !headless_mode {
        if let Err(e) = canvas_lab::viewer::run(config.clone()) {
            log::error!("viewer failed: {}", e);
        }
        return Ok(());
    }

    #[cfg(not(feature = "egui"))]
    if !headless_mode {
        log::info!("built without the egui feature, running headless");
    }

    let stdout = io::stdout();
    let status = headless::run(&config, &mut stdout.lock())?;
    log::info!("finished: {}", status);
    Ok(())
}
