//! The HTTP surface.
//!
//! Thin handlers over the lookup orchestrator, the translation augmentation
//! and the sound proxy. Requests are stateless and the API is anonymous; the
//! permissive CORS layer lets browser frontends call it directly.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
use url::Url;

use crate::Error;
use crate::config::{Config, SoundConfig};
use crate::fetch::HttpFetcher;
use crate::lookup::WordLookup;
use crate::sound::{self, SoundError};
use crate::translate::{Translator, augment};
use crate::word::{SourceLanguage, UnsupportedLanguage, Word};

/// Shared state for all handlers.
pub struct App {
    /// The lookup orchestrator.
    pub lookup: WordLookup<HttpFetcher>,
    /// Translation provider, when augmentation is enabled.
    pub translator: Option<Box<dyn Translator>>,
    /// Whether lookups without an explicit `translate` parameter are
    /// augmented.
    pub translate_by_default: bool,
    /// Sound proxy configuration.
    pub sound: SoundConfig,
    /// Client used for sound downloads.
    pub client: reqwest::Client,
}

/// JSON payload of an error response.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Rejection tuple every handler maps its errors onto.
type Rejection = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Deserialize)]
struct WordsQuery {
    /// Overrides the configured augmentation default.
    translate: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SoundQuery {
    /// Upstream clip URL, as found in a word's `soundUrl`.
    url: String,
    /// The word the clip belongs to; names the download.
    word: String,
}

/// Builds the application router.
pub fn router(app: Arc<App>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/words/{language}/{term}", get(words))
        .route("/api/sound", get(sound_clip))
        .layer(cors)
        .with_state(app)
}

/// Binds the configured address and serves until shutdown.
///
/// # Errors
///
/// Fails when the listen address cannot be bound or the server stops
/// unexpectedly.
pub async fn serve(config: &Config, app: Arc<App>) -> Result<(), Error> {
    let addr = config.server.listen;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| Error::Bind { addr, source })?;

    info!(%addr, "listening");

    axum::serve(listener, router(app)).await.map_err(Error::Serve)
}

async fn health() -> &'static str {
    "OK"
}

async fn words(
    State(app): State<Arc<App>>,
    Path((language, term)): Path<(String, String)>,
    Query(query): Query<WordsQuery>,
) -> Result<Json<Word>, Rejection> {
    let language = language
        .parse::<SourceLanguage>()
        .map_err(|err: UnsupportedLanguage| reject(StatusCode::BAD_REQUEST, err.to_string()))?;

    let mut word = match app.lookup.look_up(language, &term).await {
        Ok(Some(word)) => word,
        Ok(None) => {
            let message = format!("no dictionary entry for {term:?}");

            return Err(reject(StatusCode::NOT_FOUND, message));
        }
        Err(err) => {
            error!(%err, "lookup failed");

            return Err(reject(StatusCode::BAD_GATEWAY, err.to_string()));
        }
    };

    if query.translate.unwrap_or(app.translate_by_default)
        && let Some(translator) = &app.translator
        && let Err(err) = augment(&mut word, translator.as_ref()).await
    {
        // The provider being down should not hide the dictionary entry;
        // serve it untranslated.
        warn!(%err, "could not augment word");
    }

    Ok(Json(word))
}

async fn sound_clip(
    State(app): State<Arc<App>>,
    Query(query): Query<SoundQuery>,
) -> Result<Response, Rejection> {
    let url = Url::parse(&query.url)
        .map_err(|err| reject(StatusCode::BAD_REQUEST, format!("invalid sound url: {err}")))?;

    let sound = sound::fetch_sound(&app.client, &app.sound, &url, &query.word)
        .await
        .map_err(|err| sound_rejection(&err))?;

    let disposition = format!("attachment; filename=\"{}\"", sound.file_name);
    let headers = [
        (header::CONTENT_TYPE, "audio/mpeg".to_string()),
        (header::CONTENT_DISPOSITION, disposition),
    ];

    Ok((headers, sound.bytes).into_response())
}

/// Maps a sound proxy failure onto a response.
fn sound_rejection(err: &SoundError) -> Rejection {
    let status = match err {
        SoundError::HostNotAllowed(_) => StatusCode::BAD_REQUEST,
        SoundError::NotFound => StatusCode::NOT_FOUND,
        SoundError::Request(_) | SoundError::Stage(_) | SoundError::Transcode { .. } => {
            StatusCode::BAD_GATEWAY
        }
    };

    if status == StatusCode::BAD_GATEWAY {
        error!(%err, "sound proxy failed");
    }

    reject(status, err.to_string())
}

fn reject(status: StatusCode, error: String) -> Rejection {
    (status, Json(ErrorResponse { error }))
}
