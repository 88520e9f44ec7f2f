use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tenant the registration records are filed under in this deployment
pub const DEFAULT_TENANT_ID: &str = "Amazon";

/// Main configuration structure for idv-register
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Backend endpoints and client behaviour
    pub remote: RemoteConfig,
    /// Constants baked into the registration workflow
    pub workflow: WorkflowConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// GraphQL endpoint URL
    pub graphql_endpoint: String,
    /// Base URL blob uploads are PUT under
    pub storage_endpoint: String,
    /// User-pool token sent as the Authorization header (can be set via env var)
    pub auth_token: Option<String>,
    /// Sustained request rate
    pub requests_per_second: u32,
    /// Burst capacity
    pub burst_capacity: u32,
    /// Transport timeout; unset means requests may wait indefinitely
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Company/tenant identifier written into every record
    pub tenant_id: String,
    /// Storage prefix for face images; the key is `<prefix><userId>.jpg`
    pub face_image_prefix: String,
    /// Content type used for the face image upload
    pub face_image_content_type: String,
    /// Registration status recorded before verification succeeds
    pub initial_registration_status: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON formatted logs
    pub json_logs: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            graphql_endpoint: "http://localhost:20002/graphql".to_string(),
            storage_endpoint: "http://localhost:20005/storage".to_string(),
            auth_token: None, // Will be read from env var or .idv-register-rc
            requests_per_second: 5,
            burst_capacity: 10,
            request_timeout_seconds: None,
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            face_image_prefix: "regimages/".to_string(),
            face_image_content_type: "image/jpeg".to_string(),
            initial_registration_status: "error-initialentry".to_string(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: true,
        }
    }
}

impl WorkflowConfig {
    /// Deterministic object-store key for a user's face image
    pub fn face_image_key(&self, user_id: &str) -> String {
        format!("{}{}.jpg", self.face_image_prefix, user_id)
    }
}

impl RegistrationConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (idv-register.toml, .idv-register-rc)
    /// 3. Environment variables (prefixed with IDV_REGISTER_)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();

        if Path::new("idv-register.toml").exists() {
            builder = builder.add_source(File::with_name("idv-register"));
        }

        if Path::new(".idv-register-rc").exists() {
            builder = builder.add_source(File::new(".idv-register-rc", config::FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("IDV_REGISTER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut loaded: RegistrationConfig = builder.build()?.try_deserialize()?;

        if loaded.remote.auth_token.is_none() {
            if let Ok(token) = std::env::var("IDV_REGISTER_AUTH_TOKEN") {
                loaded.remote.auth_token = Some(token);
            }
        }

        Ok(loaded)
    }

    /// Load configuration from an explicit file, still honouring env overrides
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let loaded = Config::builder()
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix("IDV_REGISTER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(loaded)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}
