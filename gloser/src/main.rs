//! Service entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use argh::FromArgs;

use gloser::Error;
use gloser::HttpFetcher;
use gloser::WordLookup;
use gloser::config::{Config, TranslatorProvider};
use gloser::http;
use gloser::server::{self, App};
use gloser::tracing;
use gloser::translate::Translator;
use gloser::translate::google::GoogleTranslator;
use gloser::translate::llm::LlmTranslator;

/// Dictionary lookup service for Danish and Spanish words.
#[derive(Debug, FromArgs)]
struct Opts {
    /// path to the configuration file
    #[argh(option, default = "String::from(\"gloser.toml\")")]
    config_path: String,
    /// listen address, overriding the configuration
    #[argh(option)]
    listen: Option<SocketAddr>,
}

/// Builds the configured translation provider, if augmentation is enabled.
fn build_translator(
    config: &Config,
    client: &reqwest::Client,
) -> Result<Option<Box<dyn Translator>>, Error> {
    if !config.translator.enabled {
        return Ok(None);
    }

    let translator: Box<dyn Translator> = match config.translator.provider {
        TranslatorProvider::Google => Box::new(GoogleTranslator::new(
            client.clone(),
            config.translator.target.clone(),
        )),
        TranslatorProvider::Llm => {
            let api_key = config.translator.api_key.clone().ok_or(Error::MissingApiKey)?;

            Box::new(LlmTranslator::new(
                client.clone(),
                config.translator.base_url.clone(),
                api_key,
                config.translator.model.clone(),
                config.translator.target.clone(),
            ))
        }
    };

    Ok(Some(translator))
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Parse command-line arguments
    let opts: Opts = argh::from_env();

    // Load the config file and overlay the environment on top of it
    let mut config = Config::load(&opts.config_path).map_err(|source| Error::LoadConfig {
        path: opts.config_path.clone(),
        source,
    })?;

    if let Some(listen) = opts.listen {
        config.server.listen = listen;
    }

    tracing::try_init(&config.tracing)?;

    println!(
        "{} v{} running",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let client = http::build_client(&config.http);
    let translator = build_translator(&config, &client)?;
    let app = Arc::new(App {
        lookup: WordLookup::new(HttpFetcher::new(client.clone())),
        translator,
        translate_by_default: config.translator.by_default,
        sound: config.sound.clone(),
        client,
    });

    server::serve(&config, app).await?;

    Ok(())
}
