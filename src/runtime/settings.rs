use crate::config::Settings;

/// Load settings, falling back to defaults on any load or validation
/// failure. A bad config file should never keep the player from starting.
pub fn load_settings() -> Settings {
    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("tinamp: failed to load config ({e}); using defaults");
            return Settings::default();
        }
    };
    if let Err(e) = settings.validate() {
        eprintln!("tinamp: invalid config ({e}); using defaults");
        return Settings::default();
    }
    settings
}
