use serde::Deserialize;

/// Default catalog URL, with `{page}` standing in for the page number
pub const DEFAULT_URL_TEMPLATE: &str = "https://www.olx.ro/imobiliare/apartamente-garsoniere-de-vanzare/bucuresti-ilfov-judet/?currency=EUR&page={page}";

/// Main configuration structure for the harvester
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Catalog and crawl loop configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Page URL template containing a `{page}` placeholder
    #[serde(rename = "url-template")]
    pub url_template: String,

    /// Safety cutoff: the highest page index a run may fetch
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Quiescence window to wait after each fetch (milliseconds)
    #[serde(rename = "settle-ms")]
    pub settle_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            max_pages: 5,
            settle_ms: 500,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "ListingHarvester".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the JSON cursor file
    #[serde(rename = "state-path")]
    pub state_path: String,

    /// Path to the CSV dataset
    #[serde(rename = "dataset-path")]
    pub dataset_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            state_path: "stare.json".to_string(),
            dataset_path: "anunturi.csv".to_string(),
        }
    }
}
