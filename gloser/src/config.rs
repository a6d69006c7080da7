//! Application configuration.
//!
//! Configuration is merged from an optional TOML file and `GLOSER_`-prefixed
//! environment variables, with the environment taking precedence. Every field
//! has a default, so the service starts with no configuration at all.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};

use crate::consts;

/// The structure of the main configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API server configuration.
    pub server: ServerConfig,
    /// Outgoing HTTP client configuration.
    pub http: HttpConfig,
    /// Tracing configuration.
    pub tracing: TracingConfig,
    /// Translation augmentation configuration.
    pub translator: TranslatorConfig,
    /// Sound proxy configuration.
    pub sound: SoundConfig,
}

impl Config {
    /// Loads the configuration from the TOML file at `path`, overlaid with
    /// `GLOSER_`-prefixed environment variables.
    ///
    /// The file is optional; nested environment keys use `__` as a separator,
    /// as in `GLOSER_SERVER__LISTEN`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment contains values that do
    /// not fit the structure.
    pub fn load(path: impl AsRef<Path>) -> Result<Config, figment::Error> {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("GLOSER_").split("__"))
            .extract()
    }
}

/// API server configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// The socket address to listen on.
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> ServerConfig {
        ServerConfig {
            listen: consts::DEFAULT_LISTEN_ADDR,
        }
    }
}

/// Outgoing HTTP client configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// The timeout for outgoing requests.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// The `User-Agent` header to send.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> HttpConfig {
        HttpConfig {
            timeout: consts::HTTP_TIMEOUT,
            user_agent: consts::HTTP_USER_AGENT.to_string(),
        }
    }
}

/// Tracing configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Whether to export spans over OTLP.
    pub enabled: bool,
}

/// The available translation providers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorProvider {
    /// The keyless Google Translate web endpoint.
    #[default]
    Google,
    /// An OpenAI-compatible chat completions endpoint.
    Llm,
}

/// Translation augmentation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Whether a translation provider is available at all.
    pub enabled: bool,
    /// Whether lookups without an explicit `translate` parameter are
    /// augmented.
    pub by_default: bool,
    /// The provider to translate with.
    pub provider: TranslatorProvider,
    /// ISO 639-1 code of the language meanings are translated into.
    pub target: String,
    /// API key, required by the `llm` provider.
    pub api_key: Option<String>,
    /// Base URL of the chat completions endpoint.
    pub base_url: String,
    /// Model name to request from the `llm` provider.
    pub model: String,
}

impl Default for TranslatorConfig {
    fn default() -> TranslatorConfig {
        TranslatorConfig {
            enabled: false,
            by_default: true,
            provider: TranslatorProvider::Google,
            target: consts::DEFAULT_TRANSLATION_TARGET.to_string(),
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Sound proxy configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    /// Path of the ffmpeg binary used for transcoding.
    pub ffmpeg: String,
    /// Upstream hosts the proxy is willing to download from.
    pub allowed_hosts: Vec<String>,
}

impl Default for SoundConfig {
    fn default() -> SoundConfig {
        SoundConfig {
            ffmpeg: "ffmpeg".to_string(),
            allowed_hosts: vec![
                "static.ordnet.dk".to_string(),
                "pronounce.spanishdict.com".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_figment() {
        let config: Config = Figment::new().extract().unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.server.listen.port(), 4000);
        assert_eq!(config.http.timeout, Duration::from_secs(30));
        assert!(!config.translator.enabled);
        assert_eq!(config.translator.provider, TranslatorProvider::Google);
        assert_eq!(config.translator.target, "ru");
        assert!(
            config
                .sound
                .allowed_hosts
                .iter()
                .any(|host| host == "static.ordnet.dk")
        );
    }

    #[test]
    fn test_parses_toml_sections() {
        let config: Config = Figment::new()
            .merge(Toml::string(
                r#"
                [server]
                listen = "0.0.0.0:8080"

                [http]
                timeout = "45s"

                [translator]
                enabled = true
                provider = "llm"
                api_key = "sk-test"
                model = "gpt-4o"

                [sound]
                ffmpeg = "/usr/local/bin/ffmpeg"
                "#,
            ))
            .extract()
            .unwrap();

        assert_eq!(config.server.listen.port(), 8080);
        assert_eq!(config.http.timeout, Duration::from_secs(45));
        assert!(config.translator.enabled);
        assert_eq!(config.translator.provider, TranslatorProvider::Llm);
        assert_eq!(config.translator.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.translator.target, "ru");
        assert_eq!(config.sound.ffmpeg, "/usr/local/bin/ffmpeg");
    }
}
