//! The `orbis` binary: load config, set up logging, open the globe window.

use clap::Parser;
use orbis_app::platform::PlatformDirs;
use orbis_config::{CliArgs, Config};

fn main() {
    let args = CliArgs::parse();

    let dirs = match PlatformDirs::resolve_with_override(args.config.as_deref())
        .and_then(|dirs| dirs.create_dirs().map(|()| dirs))
    {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to initialize platform directories: {e}");
            std::process::exit(1);
        }
    };

    let mut config = match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Using default config: {e}");
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    orbis_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    tracing::info!(
        config = %dirs.config_dir.display(),
        map = %config.landmass.map_path.display(),
        "starting orbis"
    );

    if let Err(e) = orbis_app::run(config) {
        tracing::error!("Event loop failed: {e}");
        std::process::exit(1);
    }
}
