//! Line-oriented M3U8 URL rewriting.
//!
//! Rewrites every externally resolvable reference in a playlist body into a
//! same-origin proxied URL (`<proxy_base>?url=<encoded>`), leaving all other
//! lines untouched. Works on raw text rather than a parsed playlist model so
//! unknown tags survive byte-identical.

use url::Url;

const URI_ATTR: &str = "URI=\"";

/// Rewrite all URL references in `text` to route through `proxy_base`.
///
/// `target_url` is the absolute URL the playlist was fetched from; relative
/// references are resolved against its directory. Lines already pointing at
/// `proxy_base` are left alone, which makes the transform idempotent.
///
/// Input may use `\n` or `\r\n` line endings; output always uses `\n`.
pub fn rewrite_playlist(text: &str, proxy_base: &str, target_url: &str) -> String {
    let base_path = base_path_of(target_url);

    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(|line| rewrite_line(line, proxy_base, &base_path))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The target URL up to and including its final `/`.
fn base_path_of(target_url: &str) -> String {
    match target_url.rfind('/') {
        Some(idx) => target_url[..=idx].to_string(),
        None => target_url.to_string(),
    }
}

fn rewrite_line(line: &str, proxy_base: &str, base_path: &str) -> String {
    // Key/attribute tags (EXT-X-KEY, EXT-X-MEDIA, EXT-X-MAP, ...) carry
    // their references inside quoted URI attributes.
    if line.contains(URI_ATTR) {
        return rewrite_uri_attributes(line, proxy_base, base_path);
    }

    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(proxy_base) {
        return line.to_string();
    }

    match resolve_reference(trimmed, base_path) {
        Some(absolute) => proxied(proxy_base, &absolute),
        // Unresolvable reference: keep the line rather than drop content.
        None => line.to_string(),
    }
}

/// Rewrite every `URI="..."` attribute on a tag line.
///
/// A line may carry more than one attribute; each is rewritten
/// independently. Values that fail to resolve are proxied verbatim, and
/// values already routed through the proxy are kept as-is.
fn rewrite_uri_attributes(line: &str, proxy_base: &str, base_path: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(idx) = rest.find(URI_ATTR) {
        let value_start = idx + URI_ATTR.len();
        out.push_str(&rest[..value_start]);
        rest = &rest[value_start..];

        let Some(end) = rest.find('"') else {
            // Unterminated attribute: leave the remainder untouched.
            break;
        };

        let value = &rest[..end];
        if value.starts_with(proxy_base) {
            out.push_str(value);
        } else {
            let absolute =
                resolve_reference(value, base_path).unwrap_or_else(|| value.to_string());
            out.push_str(&proxied(proxy_base, &absolute));
        }
        rest = &rest[end..];
    }

    out.push_str(rest);
    out
}

/// Resolve a playlist reference to an absolute URL.
///
/// Absolute references pass through, scheme-relative references are upgraded
/// to `https:`, everything else is joined to the playlist's base path.
/// Returns `None` when the base path cannot be parsed or the join fails.
fn resolve_reference(reference: &str, base_path: &str) -> Option<String> {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return Some(reference.to_string());
    }

    if let Some(rest) = reference.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }

    Url::parse(base_path)
        .and_then(|base| base.join(reference))
        .ok()
        .map(|resolved| resolved.to_string())
}

/// Build the proxied form of an absolute URL.
fn proxied(proxy_base: &str, absolute: &str) -> String {
    format!("{}?url={}", proxy_base, urlencoding::encode(absolute))
}
