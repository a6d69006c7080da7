//! Pronunciation sound proxy.
//!
//! Danish clips are MP3 and stream through unchanged; SpanishDict records
//! speaker videos (MP4), which ffmpeg strips down to their audio track.
//! Either way the caller ends up with MP3 bytes named after the word.

use std::path::Path;
use std::process::Stdio;

use futures::StreamExt;
use reqwest::StatusCode;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;
use url::Url;

use crate::config::SoundConfig;

/// A downloaded, normalized pronunciation clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sound {
    /// Suggested download name, always `{word}.mp3`.
    pub file_name: String,
    /// The MP3 payload.
    pub bytes: Vec<u8>,
}

/// Errors that can occur while fetching a clip.
#[derive(Debug, thiserror::Error)]
pub enum SoundError {
    /// The URL points at a host the proxy does not serve.
    #[error("host {0:?} is not a known dictionary sound host")]
    HostNotAllowed(String),
    /// The upstream request failed.
    #[error("request error: {0}")]
    Request(#[source] reqwest::Error),
    /// The upstream answered 404.
    #[error("sound file not found")]
    NotFound,
    /// The clip could not be staged on disk for transcoding.
    #[error("could not stage clip for transcoding: {0}")]
    Stage(#[from] std::io::Error),
    /// ffmpeg did not produce an audio stream.
    #[error("ffmpeg exited with {status}: {stderr}")]
    Transcode {
        /// The exit status.
        status: std::process::ExitStatus,
        /// What ffmpeg printed to stderr.
        stderr: String,
    },
}

/// Fetches the clip at `url` and returns it as MP3 named after `word`.
///
/// The URL has to point at one of the configured dictionary hosts; the proxy
/// is not a general purpose downloader.
///
/// # Errors
///
/// Fails when the host is not allowlisted, the download fails, or ffmpeg
/// cannot extract an audio stream from a video clip.
pub async fn fetch_sound(
    client: &reqwest::Client,
    config: &SoundConfig,
    url: &Url,
    word: &str,
) -> Result<Sound, SoundError> {
    if !is_allowed_host(url, &config.allowed_hosts) {
        let host = url.host_str().unwrap_or_default().to_string();

        return Err(SoundError::HostNotAllowed(host));
    }

    debug!(%url, "downloading sound clip");

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(SoundError::Request)?;

    if response.status() == StatusCode::NOT_FOUND {
        return Err(SoundError::NotFound);
    }

    let response = response.error_for_status().map_err(SoundError::Request)?;

    let bytes = if needs_transcoding(url) {
        transcode_to_mp3(config, response).await?
    } else {
        response.bytes().await.map_err(SoundError::Request)?.to_vec()
    };

    Ok(Sound {
        file_name: format!("{word}.mp3"),
        bytes,
    })
}

/// Whether the URL points at one of the allowlisted dictionary hosts.
fn is_allowed_host(url: &Url, allowed_hosts: &[String]) -> bool {
    url.host_str()
        .is_some_and(|host| allowed_hosts.iter().any(|allowed| allowed.eq_ignore_ascii_case(host)))
}

/// Whether the clip is a video container that must be reduced to audio.
fn needs_transcoding(url: &Url) -> bool {
    Path::new(url.path())
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("mp4"))
}

/// Streams the download into a scratch file and runs ffmpeg over it,
/// collecting the MP3 stream from stdout.
async fn transcode_to_mp3(
    config: &SoundConfig,
    response: reqwest::Response,
) -> Result<Vec<u8>, SoundError> {
    let scratch = tempfile::tempdir()?;
    let input = scratch.path().join("input.mp4");

    let mut file = tokio::fs::File::create(&input).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(SoundError::Request)?;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    drop(file);

    debug!(input = %input.display(), "transcoding clip");

    let output = Command::new(&config.ffmpeg)
        .args(transcode_args(&input))
        .stdin(Stdio::null())
        .output()
        .await?;

    if !output.status.success() {
        return Err(SoundError::Transcode {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output.stdout)
}

/// ffmpeg arguments for stripping a video down to an MP3 stream on stdout.
fn transcode_args(input: &Path) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-i".to_string(),
        input.display().to_string(),
        "-vn".to_string(),
        "-f".to_string(),
        "mp3".to_string(),
        "pipe:1".to_string(),
    ]
}
