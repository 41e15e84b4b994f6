use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads the optional config file, applies environment
/// overrides (prefix `TINAMP__`) and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("TINAMP")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let viz = &self.visualizer;
        if !viz.fft_size.is_power_of_two() || viz.fft_size < 32 {
            return Err("visualizer.fft_size must be a power of two >= 32".to_string());
        }
        if viz.bars == 0 || viz.bars > viz.fft_size / 2 {
            return Err("visualizer.bars must be between 1 and fft_size / 2".to_string());
        }
        if !(viz.floor < viz.ceiling) {
            return Err("visualizer.floor must be below visualizer.ceiling".to_string());
        }
        if !(viz.gain > 0.0) {
            return Err("visualizer.gain must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.playback.volume) {
            return Err("playback.volume must be within 0.0..=1.0".to_string());
        }
        if self.controls.volume_step <= 0.0 {
            return Err("controls.volume_step must be positive".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `TINAMP_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TINAMP_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/tinamp/config.toml`
/// or `~/.config/tinamp/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("tinamp").join("config.toml"))
}
