use serde::Deserialize;

/// Main configuration structure for Paper-Chaser
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub auth: AuthConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

/// Credentials used for every API request
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// OAuth 2 bearer token with Drive read scope
    #[serde(rename = "access-token")]
    pub access_token: String,
}

/// HTTP client behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with each request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Optional proxy that all requests are routed through
    #[serde(default)]
    pub proxy: Option<String>,

    /// Skip TLS certificate verification (needed for intercepting proxies)
    #[serde(rename = "accept-invalid-certs", default = "default_true")]
    pub accept_invalid_certs: bool,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            proxy: None,
            accept_invalid_certs: true,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Crawl loop behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Where newly discovered IDs are placed in the frontier
    #[serde(rename = "insertion-order", default)]
    pub insertion_order: InsertionOrder,

    /// Number of children requested per folder listing page
    #[serde(rename = "folder-page-size", default = "default_folder_page_size")]
    pub folder_page_size: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            insertion_order: InsertionOrder::default(),
            folder_page_size: default_folder_page_size(),
        }
    }
}

/// Frontier discipline for newly discovered IDs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsertionOrder {
    /// The most recently discovered ID is crawled next
    #[default]
    DepthFirst,
    /// Discovered IDs wait behind everything already queued
    BreadthFirst,
}

/// Output file locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the results CSV and the crawl state files
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

/// Base URLs of the Google APIs
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_drive_endpoint")]
    pub drive: String,
    #[serde(default = "default_docs_endpoint")]
    pub docs: String,
    #[serde(default = "default_sheets_endpoint")]
    pub sheets: String,
    #[serde(default = "default_slides_endpoint")]
    pub slides: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            drive: default_drive_endpoint(),
            docs: default_docs_endpoint(),
            sheets: default_sheets_endpoint(),
            slides: default_slides_endpoint(),
        }
    }
}

impl EndpointConfig {
    /// Points every API at the same base URL
    pub fn all(base: &str) -> Self {
        Self {
            drive: base.to_string(),
            docs: base.to_string(),
            sheets: base.to_string(),
            slides: base.to_string(),
        }
    }
}

fn default_user_agent() -> String {
    "paperchaser".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_folder_page_size() -> u32 {
    1000
}

fn default_output_directory() -> String {
    ".".to_string()
}

fn default_drive_endpoint() -> String {
    "https://www.googleapis.com".to_string()
}

fn default_docs_endpoint() -> String {
    "https://docs.googleapis.com".to_string()
}

fn default_sheets_endpoint() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_slides_endpoint() -> String {
    "https://slides.googleapis.com".to_string()
}
