use crate::config::types::{
    AuthConfig, Config, CrawlerConfig, EndpointConfig, HttpConfig, OutputConfig,
};
use crate::ConfigError;
use url::Url;

/// Largest page size the Drive v2 children endpoint accepts
const MAX_FOLDER_PAGE_SIZE: u32 = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_auth_config(&config.auth)?;
    validate_http_config(&config.http)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_endpoint_config(&config.endpoints)?;
    Ok(())
}

fn validate_auth_config(config: &AuthConfig) -> Result<(), ConfigError> {
    if config.access_token.trim().is_empty() {
        return Err(ConfigError::Validation(
            "access_token cannot be empty".to_string(),
        ));
    }

    if config.access_token.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(
            "access_token cannot contain whitespace".to_string(),
        ));
    }

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if let Some(proxy) = &config.proxy {
        validate_http_url("proxy", proxy)?;
    }

    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.folder_page_size < 1 || config.folder_page_size > MAX_FOLDER_PAGE_SIZE {
        return Err(ConfigError::Validation(format!(
            "folder_page_size must be between 1 and {}, got {}",
            MAX_FOLDER_PAGE_SIZE, config.folder_page_size
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_endpoint_config(config: &EndpointConfig) -> Result<(), ConfigError> {
    validate_http_url("drive endpoint", &config.drive)?;
    validate_http_url("docs endpoint", &config.docs)?;
    validate_http_url("sheets endpoint", &config.sheets)?;
    validate_http_url("slides endpoint", &config.slides)?;
    Ok(())
}

/// Checks that a value parses as an absolute http(s) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
