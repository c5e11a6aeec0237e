//! Helpers for the `redirect_url` query parameter that sends the user back to
//! the page they came from after editing or deleting a transaction.

use axum::http::Uri;
use serde::Deserialize;

/// Only same-site paths are allowed, so a crafted link cannot send the user
/// to another site.
fn is_safe_redirect_url(redirect_url: &str) -> bool {
    redirect_url.starts_with('/') && !redirect_url.starts_with("//")
}

/// The path and query of `raw_url` if it is safe to redirect to.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// Encode `redirect_url` as a `redirect_url=...` query string.
///
/// Returns `None` and logs an error if the URL could not be encoded.
pub fn build_redirect_param(redirect_url: &str) -> Option<String> {
    serde_urlencoded::to_string([("redirect_url", redirect_url)])
        .inspect_err(|error| {
            tracing::error!(
                "Could not set redirect URL {redirect_url} due to encoding error: {error}"
            );
        })
        .ok()
}

/// `url` with `redirect_param` appended as its query string.
pub fn with_redirect_param(url: String, redirect_param: Option<&str>) -> String {
    match redirect_param {
        Some(param) => format!("{url}?{param}"),
        None => url,
    }
}

/// The query parameters for pages and endpoints that redirect afterwards.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

impl RedirectQuery {
    /// The requested redirect target, ignoring unsafe URLs.
    pub fn target(&self) -> Option<String> {
        let raw_url = self.redirect_url.as_deref()?;
        let target = normalize_redirect_url(raw_url);

        if target.is_none() {
            tracing::warn!("Ignoring unsafe redirect URL {raw_url:?}");
        }

        target
    }

    /// The requested redirect target, or `default` if there is none.
    pub fn target_or(&self, default: &str) -> String {
        self.target().unwrap_or_else(|| default.to_owned())
    }

    /// `url` with the redirect target passed along, if there is one.
    pub fn forward_to(&self, url: String) -> String {
        let param = self
            .target()
            .and_then(|target| build_redirect_param(&target));

        with_redirect_param(url, param.as_deref())
    }
}
