use url::Url;

/// Returns `true` when a fetched resource should be treated as an HLS
/// playlist and run through the rewriter.
///
/// Classification is deliberately shallow: the target path's extension or
/// the upstream's declared content type. Variant playlists referenced from a
/// master playlist need no special handling — their rewritten URLs route
/// back through the proxy and re-enter this check on the follow-up request.
pub fn is_playlist(target: &Url, content_type: Option<&str>) -> bool {
    if target.path().to_ascii_lowercase().ends_with(".m3u8") {
        return true;
    }

    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("mpegurl"))
        .unwrap_or(false)
}
