use std::env;

use tablekit_core::{Error, Result};

/// Environment variable redirecting the client to a custom endpoint, e.g. DynamoDB Local.
pub const CUSTOM_ENDPOINT_VAR: &str = "USE_CUSTOM_DYNAMODB_ENDPOINT";
/// Fallback endpoint variable understood by the AWS tooling.
pub const AWS_ENDPOINT_VAR: &str = "AWS_ENDPOINT_URL";
pub const AWS_REGION_VAR: &str = "AWS_REGION";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Connection settings for the DynamoDB client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Custom endpoint URL (for local DynamoDB).
    pub endpoint_url: Option<String>,
    /// AWS region.
    pub region: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `USE_CUSTOM_DYNAMODB_ENDPOINT` - endpoint override, falling back to `AWS_ENDPOINT_URL`
    /// - `AWS_REGION` - region (default: "us-east-1")
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Self {
            endpoint_url: non_empty(CUSTOM_ENDPOINT_VAR).or_else(|| non_empty(AWS_ENDPOINT_VAR)),
            region: non_empty(AWS_REGION_VAR).unwrap_or_else(|| DEFAULT_REGION.to_string()),
        }
    }

    /// Applies explicit settings, e.g. command line flags, on top of `self`.
    pub fn with_overrides(mut self, endpoint_url: Option<String>, region: Option<String>) -> Self {
        if let Some(url) = endpoint_url {
            self.endpoint_url = Some(url);
        }
        if let Some(region) = region {
            self.region = region;
        }
        self
    }

    /// Rejects endpoint overrides that are not HTTP(S) URLs.
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.endpoint_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "endpoint URL must start with http:// or https://, got {url:?}"
                )));
            }
        }
        Ok(())
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Custom DynamoDB endpoint ({})", url),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::from_lookup(lookup(&[]));

        assert_eq!(config.endpoint_url, None);
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.target_display(), "AWS DynamoDB (region: us-east-1)");
    }

    #[test]
    fn test_custom_endpoint_takes_precedence() {
        let config = Config::from_lookup(lookup(&[
            ("USE_CUSTOM_DYNAMODB_ENDPOINT", "http://localhost:8000"),
            ("AWS_ENDPOINT_URL", "http://localhost:4566"),
            ("AWS_REGION", "eu-west-1"),
        ]));

        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(
            config.target_display(),
            "Custom DynamoDB endpoint (http://localhost:8000)"
        );
    }

    #[test]
    fn test_falls_back_to_aws_endpoint_and_ignores_blank_values() {
        let config = Config::from_lookup(lookup(&[
            ("USE_CUSTOM_DYNAMODB_ENDPOINT", " "),
            ("AWS_ENDPOINT_URL", "http://localhost:4566"),
            ("AWS_REGION", ""),
        ]));

        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert_eq!(config.region, DEFAULT_REGION);
    }

    #[test]
    fn test_overrides_win_over_environment() {
        let env = lookup(&[
            ("AWS_ENDPOINT_URL", "http://localhost:4566"),
            ("AWS_REGION", "eu-west-1"),
        ]);

        let config = Config::from_lookup(&env).with_overrides(None, None);
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert_eq!(
            config.target_display(),
            "Custom DynamoDB endpoint (http://localhost:4566)"
        );

        let config = Config::from_lookup(&env).with_overrides(
            Some("http://localhost:8000".to_string()),
            Some("ap-south-1".to_string()),
        );
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.region, "ap-south-1");
    }

    #[test]
    fn test_validate_endpoint_scheme() {
        let mut config = Config::from_lookup(lookup(&[]));
        assert!(config.validate().is_ok());

        config.endpoint_url = Some("localhost:8000".to_string());
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: endpoint URL must start with http:// or https://, got \"localhost:8000\""
        );
    }
}
