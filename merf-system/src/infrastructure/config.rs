use anyhow::bail;
use serde::Deserialize;

#[derive(Default, Clone, Deserialize, Debug)]
pub struct MerfConfig {
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl MerfConfig {
    /// Rejects combinations the workflows can't run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.features.review && !self.features.reference_numbers {
            bail!("features.review requires features.reference_numbers.");
        }
        if self.features.review && self.admin.password.is_empty() {
            bail!("admin.password must be set when features.review is on.");
        }
        if !self.mail.recipients.is_empty() && self.mail.sender.is_empty() {
            bail!("mail.sender must be set when mail.recipients isn't empty.");
        }
        if self.mail.max_attempts == 0 {
            bail!("mail.max_attempts must be at least 1.");
        }
        if self.storage.allowed_extension.trim().is_empty() {
            bail!("storage.allowed_extension can't be empty.");
        }
        Ok(())
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct HostConfig {
    #[serde(default = "HostConfig::default_address")]
    pub bind_address: String,
    #[serde(default = "HostConfig::default_port")]
    pub bind_port: u16,
    /// Total multipart size accepted per submission, in MiB.
    #[serde(default = "HostConfig::default_upload_limit_mb")]
    pub upload_limit_mb: usize,
}

impl HostConfig {
    fn default_address() -> String {
        "0.0.0.0".to_string()
    }
    fn default_port() -> u16 {
        8080
    }
    fn default_upload_limit_mb() -> usize {
        50
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            bind_address: Self::default_address(),
            bind_port: Self::default_port(),
            upload_limit_mb: Self::default_upload_limit_mb(),
        }
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct StorageConfig {
    #[serde(default = "StorageConfig::default_record_file")]
    pub record_file: String,
    #[serde(default = "StorageConfig::default_memorandum_dir")]
    pub memorandum_dir: String,
    #[serde(default = "StorageConfig::default_activity_matrix_dir")]
    pub activity_matrix_dir: String,
    #[serde(default = "StorageConfig::default_allowed_extension")]
    pub allowed_extension: String,
}

impl StorageConfig {
    fn default_record_file() -> String {
        "data/merf_requests.jsonl".to_string()
    }
    fn default_memorandum_dir() -> String {
        "uploads/memorandum".to_string()
    }
    fn default_activity_matrix_dir() -> String {
        "uploads/activity_matrix".to_string()
    }
    fn default_allowed_extension() -> String {
        "pdf".to_string()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            record_file: Self::default_record_file(),
            memorandum_dir: Self::default_memorandum_dir(),
            activity_matrix_dir: Self::default_activity_matrix_dir(),
            allowed_extension: Self::default_allowed_extension(),
        }
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct FeatureConfig {
    #[serde(default = "default_true")]
    pub reference_numbers: bool,
    #[serde(default = "default_true")]
    pub review: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            reference_numbers: true,
            review: true,
        }
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct MailConfig {
    #[serde(default = "MailConfig::default_host")]
    pub host: String,
    #[serde(default = "MailConfig::default_port")]
    pub port: u16,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    /// Deliver through the background outbox instead of inline.
    #[serde(default = "default_true")]
    pub outbox: bool,
    #[serde(default = "MailConfig::default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "MailConfig::default_retry_interval_secs")]
    pub retry_interval_secs: u64,
}

impl MailConfig {
    fn default_host() -> String {
        "smtp.gmail.com".to_string()
    }
    fn default_port() -> u16 {
        465
    }
    fn default_max_attempts() -> u32 {
        3
    }
    fn default_retry_interval_secs() -> u64 {
        30
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            sender: Default::default(),
            password: Default::default(),
            recipients: Default::default(),
            outbox: true,
            max_attempts: Self::default_max_attempts(),
            retry_interval_secs: Self::default_retry_interval_secs(),
        }
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct AdminConfig {
    #[serde(default)]
    pub password: String,
    #[serde(default = "AdminConfig::default_session_ttl_minutes")]
    pub session_ttl_minutes: i64,
}

impl AdminConfig {
    fn default_session_ttl_minutes() -> i64 {
        30
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: Default::default(),
            session_ttl_minutes: Self::default_session_ttl_minutes(),
        }
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct TelemetryConfig {
    /// Default filter directive, `RUST_LOG` takes precedence.
    #[serde(default = "TelemetryConfig::default_level")]
    pub level: String,
    #[serde(default)]
    pub enable_debug_logging: bool,
}

impl TelemetryConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            enable_debug_logging: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Layers `config.yaml`, yaml files named on the command line and
/// `MERF__SECTION__KEY` environment variables.
pub fn build_config() -> anyhow::Result<MerfConfig> {
    let args: Vec<String> = std::env::args().collect();
    let mut config = config::Config::builder().add_source(
        config::File::with_name("config")
            .required(false)
            .format(config::FileFormat::Yaml),
    );
    for arg in args {
        if arg.ends_with("yaml") || arg.ends_with("yml") {
            config = config.add_source(
                config::File::from(std::path::Path::new(arg.as_str()))
                    .format(config::FileFormat::Yaml)
                    .required(false),
            );
        }
    }
    config = config.add_source(
        config::Environment::with_prefix("MERF")
            .separator("__")
            .try_parsing(true)
            .list_separator(";")
            .with_list_parse_key("mail.recipients"),
    );
    let config = config.build()?.try_deserialize::<MerfConfig>()?;
    config.validate()?;
    Ok(config)
}
