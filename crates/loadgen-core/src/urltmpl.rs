//! Self-referential URL templating.
//!
//! Rewrites a template containing `$BASE$`, `$PROTOCOL$`, `$HOST$`, `$PORT$`
//! and `$CONTEXTROOT$` against the URL the current request arrived on, so an
//! instance can address itself or a sibling without knowing its externally
//! visible location at build time.

use url::Url;

/// Full resolution pass: `$BASE$` first, then the request-derived
/// placeholders, then an optional http -> https rewrite. Substitution order
/// matters; later steps must not re-trigger earlier placeholders.
pub fn resolve(
    template: &str,
    request_url: &str,
    replacement_base: Option<&str>,
    force_ssl: bool,
) -> String {
    let mut ret = template.to_string();
    if let Some(base) = replacement_base {
        ret = ret.replace("$BASE$", base);
    }
    ret = substitute_request_parts(&ret, request_url);
    if force_ssl {
        ret = ret.replace("http:", "https:");
    }
    ret
}

/// Substitutes protocol, host, port and context-root parsed out of
/// `request_url`. Resolution fails soft: an unparseable request URL leaves
/// the placeholders in place (logged, never an error), since the template
/// itself may still be a usable target.
pub fn substitute_request_parts(template: &str, request_url: &str) -> String {
    let mut ret = template.to_string();
    let parsed = match Url::parse(request_url) {
        Ok(url) => url,
        Err(err) => {
            tracing::warn!(target: "urltmpl", "request url {} did not parse: {}", request_url, err);
            return ret;
        }
    };
    ret = ret.replace("$PROTOCOL$", parsed.scheme());
    ret = ret.replace("$HOST$", parsed.host_str().unwrap_or(""));
    match parsed.port() {
        Some(port) => ret = ret.replace("$PORT$", &port.to_string()),
        // No explicit port: drop the whole token to avoid a dangling colon.
        None => ret = ret.replace(":$PORT$", ""),
    }
    ret = ret.replace("$CONTEXTROOT$", &context_root(parsed.path()));
    ret
}

/// First path segment, and only when a second slash follows it; otherwise
/// empty. "/api/test" -> "api", "/api" -> "", "/" -> "".
fn context_root(path: &str) -> String {
    let Some(rest) = path.strip_prefix('/') else {
        return String::new();
    };
    match rest.find('/') {
        Some(i) if i > 0 => rest[..i].to_string(),
        _ => String::new(),
    }
}
