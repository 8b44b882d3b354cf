//! Renders a complete install configuration into a Lakerunner `values.yaml`.
//!
//! The compiler re-runs the completeness gate itself and returns `None` for
//! anything that fails it. It never emits a partial manifest.

use tracing::debug;

use crate::policy::Policy;
use crate::render::{Document, Mapping, Node, Section};
use crate::types::{
    AwsCredentials, CloudProvider, GcpCredentials, InstallMode, KafkaConfig, KafkaCredentials,
    PostgresConfig, PostgresCredentials, ValuesConfig,
};
use crate::validate::{self, parse_port};

pub const HEADER: [&str; 2] = [
    "Lakerunner Values Configuration",
    "Generated by Cardinal Install Wizard",
];

pub const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
pub const OTLP_HEADERS_ENV: &str = "OTEL_EXPORTER_OTLP_HEADERS";

/// Ingest roles scaled out in production, in emission order.
pub const INGEST_ROLES: [&str; 3] = ["ingestLogs", "ingestMetrics", "ingestTraces"];
pub const QUERY_ROLE: &str = "queryApi";

#[derive(Debug, Clone, Default)]
pub struct ValuesCompiler {
    policy: Policy,
}

impl ValuesCompiler {
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Same gate the compiler applies, under this compiler's policy.
    pub fn is_complete(&self, config: &ValuesConfig) -> bool {
        validate::check_with(config, &self.policy).is_ok()
    }

    /// Returns the manifest text, or `None` when the configuration is incomplete.
    pub fn compile(&self, config: &ValuesConfig) -> Option<String> {
        if let Err(reason) = validate::check_with(config, &self.policy) {
            debug!(%reason, "configuration incomplete, no manifest emitted");
            return None;
        }
        let document = self.document(config)?;
        debug!(
            provider = config.cloud_provider.as_str(),
            install_mode = config.install_mode.as_str(),
            sections = document.sections.len(),
            "compiled values manifest"
        );
        Some(document.to_yaml())
    }

    fn document(&self, config: &ValuesConfig) -> Option<Document> {
        let mut doc = Document {
            header: HEADER.iter().map(|s| s.to_string()).collect(),
            sections: Vec::new(),
        };

        doc.push(Section::new(Mapping::new().with("global", self.global(config))));
        doc.push(Section::new(Mapping::new().with("apiKeys", self.api_keys(config))));
        doc.push(Section::new(Mapping::new().with("cloudProvider", cloud_provider(config))));
        doc.push(Section::new(Mapping::new().with("storageProfiles", storage_profiles(config))));

        if config.install_mode.requires_backing_services() {
            doc.push(Section::new(Mapping::new().with("database", postgres(&config.lrdb)?)));
            doc.push(Section::new(Mapping::new().with("configdb", postgres(&config.configdb)?)));
            doc.push(Section::new(Mapping::new().with("kafka", kafka(&config.kafka))));
        }

        if config.install_mode == InstallMode::Production {
            let mut ingest = Mapping::new();
            for role in INGEST_ROLES {
                ingest.push(role, replicas(self.policy.ingest_replicas));
            }
            doc.push(Section::commented("Production replica settings", ingest));
            doc.push(Section::new(
                Mapping::new().with(QUERY_ROLE, replicas(self.policy.query_replicas)),
            ));
        }

        doc.push(Section::new(Mapping::new().with("grafana", grafana(config))));
        doc.push(Section::new(
            Mapping::new().with("collector", Mapping::new().with("enabled", config.enable_collector)),
        ));
        Some(doc)
    }

    fn global(&self, config: &ValuesConfig) -> Mapping {
        let mode = if config.enable_keda { "keda" } else { "disabled" };
        let mut global = Mapping::new().with("autoscaling", Mapping::new().with("mode", mode));
        if config.enable_cardinal_monitoring {
            global.push("env", Node::Seq(self.otlp_env(config.cardinal_api_key.trim())));
        }
        global
    }

    fn otlp_env(&self, api_key: &str) -> Vec<Node> {
        let header = format!("{}={}", self.policy.otlp_api_key_header, api_key);
        vec![
            env_var(OTLP_ENDPOINT_ENV, self.policy.otlp_endpoint.as_str()),
            env_var(OTLP_HEADERS_ENV, header),
        ]
    }

    fn api_keys(&self, config: &ValuesConfig) -> Mapping {
        let mut keys = vec![Node::from(config.api_key.as_str())];
        if let Some(grafana_key) = grafana_key(config) {
            keys.push(grafana_key.into());
        }
        let org = Mapping::new()
            .with("organization_id", config.organization_id.trim())
            .with("keys", Node::Seq(keys));
        Mapping::new()
            .with("source", "config")
            .with("secretName", self.policy.api_keys_secret_name.as_str())
            .with("create", true)
            .with("yaml", Node::Seq(vec![org.into()]))
    }
}

/// Compiles with the default policy.
pub fn compile(config: &ValuesConfig) -> Option<String> {
    ValuesCompiler::default().compile(config)
}

fn env_var(name: &str, value: impl Into<Node>) -> Node {
    Mapping::new().with("name", name).with("value", value).into()
}

fn replicas(count: u32) -> Mapping {
    Mapping::new().with("replicas", count)
}

fn grafana_key(config: &ValuesConfig) -> Option<&str> {
    if config.enable_grafana && !config.grafana_api_key.trim().is_empty() {
        Some(config.grafana_api_key.as_str())
    } else {
        None
    }
}

fn cloud_provider(config: &ValuesConfig) -> Mapping {
    let provider = config.cloud_provider;
    let block = match provider {
        CloudProvider::Aws => {
            let base = Mapping::new().with("region", config.storage.region.as_str());
            aws_credentials(base, &config.aws)
        }
        CloudProvider::Gcp => gcp_credentials(&config.gcp),
        CloudProvider::Azure => Mapping::new()
            .with("storageAccountName", config.azure.storage_account_name.as_str())
            .with("storageAccountKey", config.azure.storage_account_key.as_str()),
    };
    Mapping::new()
        .with("provider", provider.as_str())
        .with(provider.as_str(), block)
}

fn aws_credentials(base: Mapping, aws: &AwsCredentials) -> Mapping {
    match aws {
        AwsCredentials::Create {
            access_key_id,
            secret_access_key,
        } => base
            .with("inject", true)
            .with("create", true)
            .with("accessKeyId", access_key_id.as_str())
            .with("secretAccessKey", secret_access_key.as_str()),
        AwsCredentials::Existing { existing_secret_name } => base
            .with("inject", true)
            .with("create", false)
            .with("secretName", existing_secret_name.as_str()),
        // IRSA / Pod Identity
        AwsCredentials::Eks => base.with("inject", false).with("create", false),
    }
}

fn gcp_credentials(gcp: &GcpCredentials) -> Mapping {
    match gcp {
        GcpCredentials::WorkloadIdentity => Mapping::new().with("inject", false).with("create", false),
        GcpCredentials::Existing { existing_secret_name } => Mapping::new()
            .with("inject", true)
            .with("create", false)
            .with("secretName", existing_secret_name.as_str()),
        GcpCredentials::ServiceAccount { service_account_json } => Mapping::new()
            .with("inject", true)
            .with("create", true)
            .with("serviceAccountJson", Node::Literal(service_account_json.clone())),
    }
}

fn storage_profiles(config: &ValuesConfig) -> Mapping {
    let bucket = match config.cloud_provider {
        CloudProvider::Azure => config.azure.container_name.as_str(),
        CloudProvider::Aws | CloudProvider::Gcp => config.storage.bucket.as_str(),
    };
    let mut profile = Mapping::new()
        .with("organization_id", config.organization_id.trim())
        .with("collector_name", config.collector_name.trim())
        .with("cloud_provider", config.cloud_provider.as_str())
        .with("region", config.storage.region.as_str())
        .with("bucket", bucket);
    if let Some(endpoint) = config.storage.endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
        profile.push("endpoint", endpoint);
    }
    Mapping::new()
        .with("source", "config")
        .with("create", true)
        .with("yaml", Node::Seq(vec![profile.into()]))
}

// The chart nests both databases' connection settings under `lrdb`.
fn postgres(pg: &PostgresConfig) -> Option<Mapping> {
    let port = parse_port(&pg.port)?;
    let (mut section, password) = match &pg.credentials {
        PostgresCredentials::Create { password } => {
            (Mapping::new().with("create", true), Some(password.as_str()))
        }
        PostgresCredentials::Existing { existing_secret_name } => (
            Mapping::new()
                .with("create", false)
                .with("secretName", existing_secret_name.as_str()),
            None,
        ),
    };
    let mut conn = Mapping::new()
        .with("host", pg.host.as_str())
        .with("port", port)
        .with("name", pg.database.as_str())
        .with("username", pg.username.as_str());
    if let Some(password) = password {
        conn.push("password", password);
    }
    conn.push("sslMode", pg.ssl_mode.as_str());
    section.push("lrdb", conn);
    Some(section)
}

fn kafka(kafka: &KafkaConfig) -> Mapping {
    let mut section = Mapping::new();
    let mut sasl = Mapping::new()
        .with("enabled", true)
        .with("mechanism", kafka.sasl_mechanism.as_str());
    match &kafka.credentials {
        KafkaCredentials::Create { username, password } => {
            section.push("create", true);
            sasl.push("username", username.as_str());
            sasl.push("password", password.as_str());
        }
        KafkaCredentials::Existing { existing_secret_name } => {
            section.push("create", false);
            section.push("secretName", existing_secret_name.as_str());
        }
    }
    section
        .with("brokers", kafka.brokers.as_str())
        .with("sasl", sasl)
        .with("tls", Mapping::new().with("enabled", kafka.use_tls))
}

fn grafana(config: &ValuesConfig) -> Mapping {
    let mut section = Mapping::new().with("enabled", config.enable_grafana);
    if let Some(key) = grafana_key(config) {
        section.push("cardinal", Mapping::new().with("apiKey", key));
    }
    section
}
