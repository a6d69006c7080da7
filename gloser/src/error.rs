//! Error types

use std::net::SocketAddr;

use miette::Diagnostic;
use thiserror::Error;

/// Application errors for startup and serving.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The configuration file or environment could not be read.
    #[error("Could not load configuration from {path}")]
    LoadConfig {
        /// Path of the configuration file.
        path: String,
        /// The underlying figment error.
        #[source]
        source: figment::Error,
    },
    /// The `llm` translation provider was selected without an API key.
    #[error("The llm translation provider requires translator.api_key to be set")]
    MissingApiKey,
    /// The listen address could not be bound.
    #[error("Could not bind {addr}")]
    Bind {
        /// The address that could not be bound.
        addr: SocketAddr,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The API server stopped unexpectedly.
    #[error("Server error")]
    Serve(#[source] std::io::Error),
}
