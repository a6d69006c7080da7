//! Constants used in various parts of the application.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// The `User-Agent` to use when sending HTTP requests.
///
/// Den Danske Ordbog serves an interstitial to clients it does not recognize
/// as browsers, so this has to look like one.
pub const HTTP_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:141.0) Gecko/20100101 Firefox/141.0";

/// The default timeout for outgoing HTTP requests.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// The default address the API server listens on.
pub const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 4000);

/// The default language that dictionary meanings are translated into.
pub const DEFAULT_TRANSLATION_TARGET: &str = "ru";
