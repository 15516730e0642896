use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration by merging defaults, TOML, environment
    /// variables, and JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> Result<AppConfig> {
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file("config/ArbScout.toml"))
            .merge(Env::prefixed("ARB_SCOUT_").split("__"))
            .join(Json::file("config/ArbScout.json"))
            .extract()?;

        Ok(config)
    }

    /// Loads configuration with a specific profile overlay.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_with_profile(profile: &str) -> Result<AppConfig> {
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file("config/ArbScout.toml"))
            .merge(Toml::file(format!("config/ArbScout.{profile}.toml")))
            .merge(Env::prefixed("ARB_SCOUT_").split("__"))
            .join(Json::file("config/ArbScout.json"))
            .extract()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_without_files_yields_defaults() {
        let config = ConfigLoader::load().unwrap();
        assert!((config.scoring.min_viability_score - 0.7).abs() < 1e-9);
        assert!((config.risk.suspicious_profit_percent - 3.5).abs() < 1e-9);
    }
}
