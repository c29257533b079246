//! `radiance [config.json]`
//!
//! Opens the probe grid demo. Without an argument the built-in defaults are
//! used. Set `RUST_LOG` to change log verbosity (default `info`).

use radiance::{App, AppConfig, AppError};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    App::run(config)
}
