use url::Url;

/// Resolves a link href to an absolute URL
///
/// Relative hrefs are joined onto the URL of the page they appeared on.
/// Returns None for a missing, blank or unresolvable href.
pub fn resolve_link(href: Option<&str>, base_url: &Url) -> Option<String> {
    let href = href?.trim();

    if href.is_empty() {
        return None;
    }

    base_url.join(href).ok().map(|url| url.to_string())
}
