//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orbis command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orbis", about = "Particle globe viewer")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// World map image; red channel 0 marks land.
    #[arg(long)]
    pub map: Option<PathBuf>,

    /// Point sprite image.
    #[arg(long)]
    pub sprite: Option<PathBuf>,

    /// Seed for the land particle split.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Record a point size for every land particle.
    #[arg(long)]
    pub pad_sizes: bool,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(ref map) = args.map {
            self.landmass.map_path = map.clone();
        }
        if let Some(ref sprite) = args.sprite {
            self.landmass.sprite_path = sprite.clone();
        }
        if let Some(seed) = args.seed {
            self.landmass.seed = Some(seed);
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if args.pad_sizes {
            self.landmass.pad_sizes = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            map: Some(PathBuf::from("/tmp/world.png")),
            seed: Some(5),
            pad_sizes: true,
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.landmass.map_path, PathBuf::from("/tmp/world.png"));
        assert_eq!(config.landmass.seed, Some(5));
        assert!(config.landmass.pad_sizes);
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 600);
        assert_eq!(config.landmass.sprite_path, PathBuf::from("assets/dot.png"));
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "orbis",
            "--width",
            "800",
            "--seed",
            "9",
            "--log-level",
            "debug",
            "--pad-sizes",
        ]);
        assert_eq!(args.width, Some(800));
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.pad_sizes);
        assert!(args.map.is_none());
    }
}
