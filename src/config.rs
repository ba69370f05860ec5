use std::path::PathBuf;
use std::time::Duration;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Listing defaults applied to paginated requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit_default: i64,
    pub offset_default: i64,
    pub limit_max: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit_default: 100,
            offset_default: 0,
            limit_max: 1000,
        }
    }
}

/// Credentials and location of one S3 bucket
#[derive(Debug, Clone, Default)]
pub struct BucketConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket: String,
    /// Overrides `https://s3.{region}.amazonaws.com`
    pub endpoint: Option<String>,
}

impl BucketConfig {
    fn from_env(suffix: &str) -> Self {
        Self {
            access_key_id: env_or(&format!("AWS_ACCESS_KEY_ID_{suffix}"), ""),
            secret_access_key: env_or(&format!("AWS_SECRET_ACCESS_KEY_{suffix}"), ""),
            region: env_or(&format!("AWS_REGION_{suffix}"), "eu-west-1"),
            bucket: env_or(&format!("AWS_BUCKET_{suffix}"), ""),
            endpoint: env_opt(&format!("AWS_ENDPOINT_{suffix}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    // Remote services
    pub micro_api_url: String,
    pub micro_request_timeout_secs: u64,
    pub billing_service_name: String,
    pub tax_service_name: String,
    pub geo_service_name: String,
    pub reporter_service_name: String,
    // Auth1
    pub auth1_issuer: String,
    pub auth1_client_id: String,
    pub auth1_client_secret: String,
    pub auth1_redirect_url: String,
    pub disable_auth_middleware: bool,
    // Public addressing
    pub http_scheme: String,
    pub host: String,
    pub allow_origin: String,
    pub cookie_domain: String,
    pub customer_token_cookies_lifetime: i64,
    pub order_inline_form_url_mask: String,
    pub payment_form_js_library_url: String,
    pub websocket_url: String,
    pub pagination: Pagination,
    pub agreement_bucket: BucketConfig,
    pub reporter_bucket: BucketConfig,
    pub route_dump_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3001".to_string(),
            micro_api_url: "http://127.0.0.1:8081".to_string(),
            micro_request_timeout_secs: 5,
            billing_service_name: "p1paybilling".to_string(),
            tax_service_name: "p1paytax".to_string(),
            geo_service_name: "p1paygeoip".to_string(),
            reporter_service_name: "p1payreporter".to_string(),
            auth1_issuer: String::new(),
            auth1_client_id: String::new(),
            auth1_client_secret: String::new(),
            auth1_redirect_url: String::new(),
            disable_auth_middleware: false,
            http_scheme: "https".to_string(),
            host: "localhost".to_string(),
            allow_origin: "*".to_string(),
            cookie_domain: String::new(),
            customer_token_cookies_lifetime: 2_592_000,
            order_inline_form_url_mask: String::new(),
            payment_form_js_library_url: String::new(),
            websocket_url: String::new(),
            pagination: Pagination::default(),
            agreement_bucket: BucketConfig::default(),
            reporter_bucket: BucketConfig::default(),
            route_dump_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            listen_addr: env_or("LISTEN_ADDR", &defaults.listen_addr),
            micro_api_url: env_or("MICRO_API_URL", &defaults.micro_api_url),
            micro_request_timeout_secs: env_parse(
                "MICRO_REQUEST_TIMEOUT_SECS",
                defaults.micro_request_timeout_secs,
            ),
            billing_service_name: env_or("BILLING_SERVICE_NAME", &defaults.billing_service_name),
            tax_service_name: env_or("TAX_SERVICE_NAME", &defaults.tax_service_name),
            geo_service_name: env_or("GEO_SERVICE_NAME", &defaults.geo_service_name),
            reporter_service_name: env_or(
                "REPORTER_SERVICE_NAME",
                &defaults.reporter_service_name,
            ),
            auth1_issuer: env_or("AUTH1_ISSUER", ""),
            auth1_client_id: env_or("AUTH1_CLIENTID", ""),
            auth1_client_secret: env_or("AUTH1_CLIENTSECRET", ""),
            auth1_redirect_url: env_or("AUTH1_REDIRECTURL", ""),
            disable_auth_middleware: env_parse("DISABLE_AUTH_MIDDLEWARE", false),
            http_scheme: env_or("HTTP_SCHEME", &defaults.http_scheme),
            host: env_or("HOST", &defaults.host),
            allow_origin: env_or("ALLOW_ORIGIN", &defaults.allow_origin),
            cookie_domain: env_or("COOKIE_DOMAIN", ""),
            customer_token_cookies_lifetime: env_parse(
                "CUSTOMER_TOKEN_COOKIES_LIFETIME",
                defaults.customer_token_cookies_lifetime,
            ),
            order_inline_form_url_mask: env_or("ORDER_INLINE_FORM_URL_MASK", ""),
            payment_form_js_library_url: env_or("PAYMENT_FORM_JS_LIBRARY_URL", ""),
            websocket_url: env_or("WEBSOCKET_URL", ""),
            pagination: Pagination {
                limit_default: env_parse("LIMIT_DEFAULT", defaults.pagination.limit_default),
                offset_default: env_parse("OFFSET_DEFAULT", defaults.pagination.offset_default),
                limit_max: env_parse("LIMIT_MAX", defaults.pagination.limit_max),
            },
            agreement_bucket: BucketConfig::from_env("AGREEMENT"),
            reporter_bucket: BucketConfig::from_env("REPORTER"),
            route_dump_path: env_opt("ROUTE_DUMP_PATH").map(PathBuf::from),
        }
    }

    pub fn micro_request_timeout(&self) -> Duration {
        Duration::from_secs(self.micro_request_timeout_secs)
    }

    /// Allowed CORS origins; `None` means any origin.
    pub fn allowed_origins(&self) -> Option<Vec<String>> {
        let origins: Vec<String> = self
            .allow_origin
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            None
        } else {
            Some(origins)
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_addr.is_empty() {
            return Err("LISTEN_ADDR cannot be empty".to_string());
        }

        if !self.micro_api_url.starts_with("http://") && !self.micro_api_url.starts_with("https://")
        {
            return Err("MICRO_API_URL must start with http:// or https://".to_string());
        }

        if self.micro_request_timeout_secs == 0 {
            return Err("MICRO_REQUEST_TIMEOUT_SECS must be positive".to_string());
        }

        if !self.disable_auth_middleware && self.auth1_issuer.is_empty() {
            return Err("AUTH1_ISSUER is required unless DISABLE_AUTH_MIDDLEWARE=true".to_string());
        }

        let page = &self.pagination;
        if page.limit_default < 1 || page.limit_max < page.limit_default {
            return Err("LIMIT_DEFAULT must be between 1 and LIMIT_MAX".to_string());
        }

        if page.offset_default < 0 {
            return Err("OFFSET_DEFAULT cannot be negative".to_string());
        }

        if self.customer_token_cookies_lifetime <= 0 {
            return Err("CUSTOMER_TOKEN_COOKIES_LIFETIME must be positive".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            auth1_issuer: "https://auth1.example.com".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config_with_issuer_is_valid() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_issuer_required_when_auth_enabled() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let config = Config {
            disable_auth_middleware: true,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_micro_url() {
        let config = Config {
            micro_api_url: "127.0.0.1:8081".to_string(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_limits_out_of_range() {
        let config = Config {
            pagination: Pagination {
                limit_default: 2000,
                ..Pagination::default()
            },
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_allowed_origins() {
        assert_eq!(valid_config().allowed_origins(), None);

        let config = Config {
            allow_origin: "https://a.example.com, https://b.example.com".to_string(),
            ..valid_config()
        };
        assert_eq!(
            config.allowed_origins(),
            Some(vec![
                "https://a.example.com".to_string(),
                "https://b.example.com".to_string()
            ])
        );
    }
}
