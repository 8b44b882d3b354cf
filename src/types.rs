// Install configuration snapshot as supplied by the wizard form.
// Credential-bearing records are tagged unions on `credentialMode`, so only the
// selected variant's fields survive deserialization.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_POSTGRES_PORT: &str = "5432";
pub const DEFAULT_SSL_MODE: &str = "require";
pub const DEFAULT_SASL_MECHANISM: &str = "PLAIN";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InstallMode {
    /// Proof of concept with real cloud storage and databases
    #[default]
    Poc,
    /// Full production deployment with HA and autoscaling
    Production,
}

impl InstallMode {
    /// Both modes talk to external Postgres and Kafka.
    pub fn requires_backing_services(self) -> bool {
        matches!(self, InstallMode::Poc | InstallMode::Production)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InstallMode::Poc => "poc",
            InstallMode::Production => "production",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    #[default]
    Aws,
    Gcp,
    Azure,
}

impl CloudProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Gcp => "gcp",
            CloudProvider::Azure => "azure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StorageConfig {
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub region: String,
    /// Custom endpoint for S3-compatible stores
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
        }
    }
}

/// AWS credential strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "credentialMode", rename_all = "snake_case")]
pub enum AwsCredentials {
    /// Chart creates a secret from inline access keys.
    #[serde(rename_all = "camelCase")]
    Create {
        #[serde(default)]
        access_key_id: String,
        #[serde(default)]
        secret_access_key: String,
    },
    /// Chart mounts a secret that already exists in the cluster.
    #[serde(rename_all = "camelCase")]
    Existing {
        #[serde(default)]
        existing_secret_name: String,
    },
    /// IRSA / EKS Pod Identity; nothing is mounted.
    #[default]
    Eks,
}

impl AwsCredentials {
    pub fn mode(&self) -> &'static str {
        match self {
            AwsCredentials::Create { .. } => "create",
            AwsCredentials::Existing { .. } => "existing",
            AwsCredentials::Eks => "eks",
        }
    }
}

/// GCP credential strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "credentialMode", rename_all = "snake_case")]
pub enum GcpCredentials {
    /// GKE Workload Identity; nothing is mounted.
    #[default]
    WorkloadIdentity,
    #[serde(rename_all = "camelCase")]
    ServiceAccount {
        #[serde(default)]
        service_account_json: String,
    },
    #[serde(rename_all = "camelCase")]
    Existing {
        #[serde(default)]
        existing_secret_name: String,
    },
}

impl GcpCredentials {
    pub fn mode(&self) -> &'static str {
        match self {
            GcpCredentials::WorkloadIdentity => "workload_identity",
            GcpCredentials::ServiceAccount { .. } => "service_account",
            GcpCredentials::Existing { .. } => "existing",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureConfig {
    pub storage_account_name: String,
    pub storage_account_key: String,
    pub container_name: String,
}

/// Where a Postgres password comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "credentialMode", rename_all = "snake_case")]
pub enum PostgresCredentials {
    Create {
        #[serde(default)]
        password: String,
    },
    #[serde(rename_all = "camelCase")]
    Existing {
        #[serde(default)]
        existing_secret_name: String,
    },
}

impl Default for PostgresCredentials {
    fn default() -> Self {
        PostgresCredentials::Create {
            password: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostgresConfig {
    #[serde(default)]
    pub host: String,
    /// Kept as text because the form edits it as text; must parse to 1..=65535.
    #[serde(default = "default_postgres_port")]
    pub port: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub username: String,
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
    #[serde(flatten)]
    pub credentials: PostgresCredentials,
}

impl PostgresConfig {
    pub fn with_database(database: &str) -> Self {
        Self {
            host: String::new(),
            port: default_postgres_port(),
            database: database.to_string(),
            username: String::new(),
            ssl_mode: default_ssl_mode(),
            credentials: PostgresCredentials::default(),
        }
    }
}

/// Where the Kafka SASL credentials come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "credentialMode", rename_all = "snake_case")]
pub enum KafkaCredentials {
    Create {
        #[serde(default)]
        username: String,
        #[serde(default)]
        password: String,
    },
    #[serde(rename_all = "camelCase")]
    Existing {
        #[serde(default)]
        existing_secret_name: String,
    },
}

impl Default for KafkaCredentials {
    fn default() -> Self {
        KafkaCredentials::Create {
            username: String::new(),
            password: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KafkaConfig {
    /// Comma-joined host:port list
    #[serde(default)]
    pub brokers: String,
    #[serde(default = "default_sasl_mechanism")]
    pub sasl_mechanism: String,
    #[serde(default = "default_true")]
    pub use_tls: bool,
    #[serde(flatten)]
    pub credentials: KafkaCredentials,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            brokers: String::new(),
            sasl_mechanism: default_sasl_mechanism(),
            use_tls: true,
            credentials: KafkaCredentials::default(),
        }
    }
}

/// One immutable snapshot of the whole wizard form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ValuesConfig {
    #[serde(alias = "installType")]
    pub install_mode: InstallMode,
    pub cloud_provider: CloudProvider,
    pub organization_id: String,
    pub collector_name: String,
    /// Primary Lakerunner API key
    pub api_key: String,
    /// Separate key handed to the bundled Grafana
    pub grafana_api_key: String,
    /// Cardinal Cloud key used for self-monitoring telemetry
    pub cardinal_api_key: String,
    pub storage: StorageConfig,
    pub aws: AwsCredentials,
    pub gcp: GcpCredentials,
    pub azure: AzureConfig,
    pub lrdb: PostgresConfig,
    pub configdb: PostgresConfig,
    pub kafka: KafkaConfig,
    pub enable_keda: bool,
    pub enable_grafana: bool,
    pub enable_cardinal_monitoring: bool,
    pub enable_collector: bool,
}

impl Default for ValuesConfig {
    fn default() -> Self {
        Self {
            install_mode: InstallMode::Poc,
            cloud_provider: CloudProvider::Aws,
            organization_id: String::new(),
            collector_name: String::new(),
            api_key: String::new(),
            grafana_api_key: String::new(),
            cardinal_api_key: String::new(),
            storage: StorageConfig::default(),
            aws: AwsCredentials::default(),
            gcp: GcpCredentials::default(),
            azure: AzureConfig::default(),
            lrdb: PostgresConfig::with_database("lakerunner"),
            configdb: PostgresConfig::with_database("configdb"),
            kafka: KafkaConfig::default(),
            enable_keda: true,
            enable_grafana: true,
            enable_cardinal_monitoring: false,
            enable_collector: true,
        }
    }
}

impl ValuesConfig {
    /// Starting form for an install mode. Grafana is on for POC and off for production.
    pub fn for_install_mode(install_mode: InstallMode) -> Self {
        Self {
            install_mode,
            enable_grafana: install_mode == InstallMode::Poc,
            ..Self::default()
        }
    }
}

fn default_postgres_port() -> String {
    DEFAULT_POSTGRES_PORT.to_string()
}

fn default_ssl_mode() -> String {
    DEFAULT_SSL_MODE.to_string()
}

fn default_sasl_mechanism() -> String {
    DEFAULT_SASL_MECHANISM.to_string()
}

fn default_true() -> bool {
    true
}
