use std::fs;
use std::io;

use anyhow::Context;
use serde::Deserialize;

use water_core::processor::DEFAULT_WATER_GOAL_LITERS;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind_addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Water goal applied to profiles that have none configured, in liters.
    pub water_goal_liters: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            water_goal_liters: DEFAULT_WATER_GOAL_LITERS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub metrics: Option<MetricsConfig>,
    pub defaults: DefaultsConfig,
}

impl AppConfig {
    /// Loads configuration from the file named by `READING_SERVICE_CONFIG`,
    /// falling back to `reading-config.toml`. A missing default file yields
    /// the built-in defaults; a missing explicitly named file is an error.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let explicit = env::var_os("READING_SERVICE_CONFIG");
        let path = explicit
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| "reading-config.toml".to_string());

        match fs::read_to_string(&path) {
            Ok(contents) => {
                let cfg: AppConfig = toml::from_str(&contents)
                    .with_context(|| format!("invalid config file \"{path}\""))?;
                Ok(cfg)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound && explicit.is_none() => {
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("cannot read config file \"{path}\"")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let toml = r#"
[http]
bind_addr = "0.0.0.0:9000"

[metrics]
bind_addr = "0.0.0.0:9001"

[defaults]
water_goal_liters = 2000.0
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("valid config should parse");
        assert_eq!(cfg.http.bind_addr, "0.0.0.0:9000");
        assert_eq!(cfg.metrics.map(|m| m.bind_addr).as_deref(), Some("0.0.0.0:9001"));
        assert_eq!(cfg.defaults.water_goal_liters, 2000.0);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("empty config should parse");
        assert_eq!(cfg.http.bind_addr, "127.0.0.1:8080");
        assert!(cfg.metrics.is_none());
        assert_eq!(cfg.defaults.water_goal_liters, 1500.0);
    }
}
