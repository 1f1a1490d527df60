//! # Application State
//!
//! Configuration and shared, read-only state for the Axum application.
//! Built once at startup and cloned into each request; nothing is mutated
//! after construction.

use pay_affirm::AffirmClient;
use pay_core::{BoxedFinancingProvider, MerchantProfile};
use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Scheme for URLs handed to the provider and shopper
    pub public_scheme: String,
    /// Explicit merchant profile path (`MERCHANT_PROFILE`)
    pub merchant_profile: Option<String>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            public_scheme: std::env::var("PUBLIC_SCHEME").unwrap_or_else(|_| "https".to_string()),
            merchant_profile: std::env::var("MERCHANT_PROFILE").ok(),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            public_scheme: "https".to_string(),
            merchant_profile: None,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Financing provider client
    pub provider: BoxedFinancingProvider,
    /// Merchant identity stamped onto checkout objects
    pub merchant: Arc<MerchantProfile>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by Affirm
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let merchant = load_merchant_profile(config.merchant_profile.as_deref())?;

        let client = AffirmClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Affirm: {}", e))?;

        Ok(Self::with_provider(Arc::new(client), merchant, config))
    }

    /// Assemble state from parts (tests, embedding)
    pub fn with_provider(
        provider: BoxedFinancingProvider,
        merchant: MerchantProfile,
        config: AppConfig,
    ) -> Self {
        Self {
            provider,
            merchant: Arc::new(merchant),
            config,
        }
    }
}

/// Load the merchant profile from an explicit path or `config/merchant.toml`
fn load_merchant_profile(explicit: Option<&str>) -> anyhow::Result<MerchantProfile> {
    if let Some(path) = explicit {
        let profile = MerchantProfile::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path, e))?;
        tracing::info!("Loaded merchant profile from {}", path);
        return Ok(profile);
    }

    let config_paths = [
        "config/merchant.toml",
        "../config/merchant.toml",
        "../../config/merchant.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let profile = MerchantProfile::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded merchant profile from {}", path);
            return Ok(profile);
        }
    }

    tracing::warn!("No merchant profile found, using defaults");
    Ok(MerchantProfile::default())
}
