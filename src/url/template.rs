use crate::{UrlError, UrlResult};
use url::Url;

/// Placeholder replaced by the page number in the catalog URL template
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Builds the URL of one catalog page
///
/// Every occurrence of `{page}` in the template is replaced by the decimal
/// page number. The result must parse as an HTTP or HTTPS URL.
///
/// # Examples
///
/// ```
/// use listing_harvester::url::page_url;
///
/// let url = page_url("https://example.com/flats/?currency=EUR&page={page}", 3).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/flats/?currency=EUR&page=3");
/// ```
pub fn page_url(template: &str, page: u32) -> UrlResult<Url> {
    if !template.contains(PAGE_PLACEHOLDER) {
        return Err(UrlError::MissingPlaceholder(template.to_string()));
    }

    let url = Url::parse(&template.replace(PAGE_PLACEHOLDER, &page.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    Ok(url)
}
