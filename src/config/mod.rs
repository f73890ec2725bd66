use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub upi: UpiConfig,
    pub receipt: ReceiptConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Identity is delegated to a managed provider; we only hold the shared
/// secret needed to verify the tokens it issues.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
}

/// Payee side of the UPI payment-request deep link.
#[derive(Debug, Deserialize, Clone)]
pub struct UpiConfig {
    pub payee_vpa: String,
    pub payee_name: String,
    pub currency: String,
}

/// Branding lines printed on the PDF receipt.
#[derive(Debug, Deserialize, Clone)]
pub struct ReceiptConfig {
    pub business_name: String,
    pub address_line: String,
    pub support_email: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MediaConfig {
    #[serde(default)]
    pub enabled: bool,
    pub cloud_name: Option<String>,
    /// Override for tests and self-hosted mirrors; defaults to the public
    /// Cloudinary API host.
    pub api_base: Option<String>,
    /// Unsigned upload presets tried in order. Order matters: the first
    /// entry is the primary profile, later entries are fallbacks for when
    /// the primary is misconfigured on the media host.
    #[serde(default)]
    pub upload_presets: Vec<String>,
    pub default_folder: Option<String>,
    pub max_file_size_bytes: Option<usize>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.base_url", "http://localhost:8080")?
            .set_default("database.max_connections", 10)?
            .set_default("auth.jwt_issuer", "repset")?
            .set_default("upi.currency", "INR")?
            .set_default("receipt.business_name", "Repset Fitness")?
            .set_default("receipt.address_line", "")?
            .set_default("receipt.support_email", "")?
            .set_default("media.enabled", false)?
            .set_default(
                "media.upload_presets",
                vec!["repset_unsigned".to_string(), "ml_default".to_string()],
            )?
            .set_default("media.max_file_size_bytes", 10 * 1024 * 1024)?
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (with REPSET__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("REPSET").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://repset.db".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                jwt_secret: "change-me-in-production".to_string(),
                jwt_issuer: "repset".to_string(),
            },
            upi: UpiConfig {
                payee_vpa: "repsetfitness@okaxis".to_string(),
                payee_name: "Repset Fitness".to_string(),
                currency: "INR".to_string(),
            },
            receipt: ReceiptConfig {
                business_name: "Repset Fitness".to_string(),
                address_line: "14 MG Road, Bengaluru".to_string(),
                support_email: "support@repset.fit".to_string(),
            },
            media: MediaConfig {
                enabled: false,
                cloud_name: None,
                api_base: None,
                upload_presets: vec!["repset_unsigned".to_string(), "ml_default".to_string()],
                default_folder: None,
                max_file_size_bytes: Some(10 * 1024 * 1024),
            },
        }
    }
}
