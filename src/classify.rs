use std::sync::{Arc, LazyLock};

use regex::Regex;
use reqwest::Client;

use crate::config::SiteConfig;
use crate::stream::StreamDescriptor;
use crate::youtube;

static CHZZK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)[0-9a-f]{32}$").expect("chzzk id pattern"));
static TWITCH_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)t:[a-z0-9_]{4,25}$").expect("twitch id pattern"));
static SOOP_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)(?:[as]c?:)?[a-z0-9]{3,12}$").expect("soop id pattern"));
static YOUTUBE_VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("youtube video id pattern"));

/// Classify one path segment into a stream descriptor.
///
/// Rules are tried top to bottom and the first match wins; the order is part
/// of the contract. Network I/O happens only on the indirect youtube path.
/// Malformed input and resolution failures both yield `None`.
pub async fn classify(
    config: &SiteConfig,
    client: &Client,
    segment: &str,
    host: &str,
    has_capability: bool,
) -> Option<StreamDescriptor> {
    if CHZZK_ID.is_match(segment) {
        return Some(StreamDescriptor::chzzk(segment.to_ascii_lowercase()));
    }

    if TWITCH_ID.is_match(segment) {
        return Some(StreamDescriptor::twitch(segment[2..].to_string(), host));
    }

    if SOOP_ID.is_match(segment) {
        let id = segment.rsplit(':').next().unwrap_or(segment).to_string();
        return Some(StreamDescriptor::soop(id, has_capability));
    }

    if let Some(rest) = segment.strip_prefix("y:") {
        if YOUTUBE_VIDEO_ID.is_match(rest) {
            return Some(StreamDescriptor::youtube(rest.to_string(), None, host));
        }
        let resolved = youtube::resolve_channel(config, client, rest).await?;
        return Some(StreamDescriptor::youtube(
            resolved.video_id,
            resolved.name,
            host,
        ));
    }

    None
}

/// Classify every non-empty path segment concurrently and collect the
/// recognized descriptors in segment order. The join is a barrier: the list
/// is complete (including any indirect resolution) before anything renders.
pub async fn build_descriptors(
    config: &Arc<SiteConfig>,
    client: &Client,
    path: &str,
    host: &str,
    has_capability: bool,
) -> Vec<StreamDescriptor> {
    let mut handles = Vec::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let config = Arc::clone(config);
        let client = client.clone();
        let segment = segment.to_string();
        let host = host.to_string();
        handles.push(tokio::spawn(async move {
            classify(&config, &client, &segment, &host, has_capability).await
        }));
    }

    let mut descriptors = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(Some(descriptor)) => descriptors.push(descriptor),
            Ok(None) => {}
            Err(err) => tracing::debug!(?err, "segment classification task failed"),
        }
    }
    descriptors
}
