use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
    pub model: ModelConfig,
    pub data: DataConfig,
    pub tracking: TrackingConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Prometheus metrics configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

/// Where the trained artifact is written and looked up
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub primary_path: String,
    /// Only consulted when nothing exists at `primary_path`
    pub fallback_path: String,
}

/// Pipeline file layout and dataset source
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// URL or local path of the source CSV
    pub source: String,
    pub raw_dir: String,
    pub processed_dir: String,
    pub reports_dir: String,
    pub params_path: String,
    pub download_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub enabled: bool,
    pub project: String,
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub port: u16,
    pub api_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            primary_path: "models/rf_model.json".to_string(),
            fallback_path: "rf_model.json".to_string(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: "https://raw.githubusercontent.com/abideen-olawuwo/water-potability/main/water_potability.csv"
                .to_string(),
            raw_dir: "data/raw".to_string(),
            processed_dir: "data/preprocessing".to_string(),
            reports_dir: "reports".to_string(),
            params_path: "params.yaml".to_string(),
            download_timeout_secs: 60,
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            project: "water-potability-prediction".to_string(),
            dir: "runs".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            port: 8501,
            api_base_url: "http://localhost:8000".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.model.primary_path, "models/rf_model.json");
        assert_eq!(config.model.fallback_path, "rf_model.json");
        assert_eq!(config.data.raw_dir, "data/raw");
        assert_eq!(config.tracking.project, "water-potability-prediction");
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let source = r#"
[server]
port = 9000

[logging]
format = "json"

[model]
primary_path = "/srv/model.json"
"#;
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(matches!(config.logging.format, LogFormat::Json));
        assert_eq!(config.model.primary_path, "/srv/model.json");
        assert_eq!(config.model.fallback_path, "rf_model.json");
        assert_eq!(config.ui.api_base_url, "http://localhost:8000");
    }
}
