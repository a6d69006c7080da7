//! HTTP features

mod client {
    use crate::config::HttpConfig;

    pub use reqwest::Client;

    /// Returns an HTTP client suitable for dictionary scraping.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client fails to build.
    #[must_use]
    pub fn build(config: &HttpConfig) -> Client {
        builder(config).build().expect("could not build http client")
    }

    /// Returns an HTTP client builder with the shared defaults applied.
    ///
    /// Den Danske Ordbog redirects `?select=` lookups and both sites serve
    /// gzip, so redirects and decompression stay enabled.
    pub fn builder(config: &HttpConfig) -> reqwest::ClientBuilder {
        reqwest::ClientBuilder::new()
            .gzip(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
    }
}

/// Builds the shared HTTP client.
///
/// This is equivalent to calling [`client::build`].
pub fn build_client(config: &crate::config::HttpConfig) -> client::Client {
    client::build(config)
}
