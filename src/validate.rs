//! Completeness gate for install configurations.
//!
//! Pure functions only. A configuration that fails here never reaches the
//! compiler, so every rule is phrased as "is this field usable", not as an
//! error the caller has to recover from.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::policy::Policy;
use crate::types::{
    AwsCredentials, CloudProvider, GcpCredentials, KafkaConfig, KafkaCredentials, PostgresConfig,
    PostgresCredentials, ValuesConfig,
};

/// Canonical 8-4-4-4-12 hex form, any case.
pub static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("valid regex")
});

/// Collector name the chart reserves for itself.
pub const RESERVED_COLLECTOR_NAME: &str = "default";

/// First field that keeps a configuration from compiling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Incomplete {
    #[error("collectorName must be non-empty and must not be \"default\"")]
    CollectorName,

    #[error("organizationId must be a UUID")]
    OrganizationId,

    #[error("apiKey is required")]
    ApiKey,

    #[error("grafanaApiKey is required when Grafana is enabled")]
    GrafanaApiKey,

    #[error("storage.bucket is required")]
    StorageBucket,

    #[error("storage.region is required")]
    StorageRegion,

    #[error("aws.{field} is required for credential mode {mode}")]
    Aws {
        field: &'static str,
        mode: &'static str,
    },

    #[error("gcp.{field} is required for credential mode {mode}")]
    Gcp {
        field: &'static str,
        mode: &'static str,
    },

    #[error("{database}.{field} is required")]
    Postgres {
        database: &'static str,
        field: &'static str,
    },

    #[error("{database}.port must be an integer between 1 and 65535")]
    PostgresPort { database: &'static str },

    #[error("kafka.{field} is required")]
    Kafka { field: &'static str },

    #[error("cardinalApiKey must be at least {min_len} characters when Cardinal monitoring is enabled")]
    CardinalApiKey { min_len: usize },
}

pub fn is_valid_collector_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case(RESERVED_COLLECTOR_NAME)
}

pub fn is_valid_uuid(uuid: &str) -> bool {
    UUID_RE.is_match(uuid.trim())
}

/// Parses a TCP port written as text. Zero is rejected.
pub fn parse_port(port: &str) -> Option<u16> {
    port.trim().parse::<u16>().ok().filter(|p| *p != 0)
}

pub fn is_valid_port(port: &str) -> bool {
    parse_port(port).is_some()
}

fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

fn require(value: &str, missing: Incomplete) -> Result<(), Incomplete> {
    if present(value) {
        Ok(())
    } else {
        Err(missing)
    }
}

fn check_collector_name(config: &ValuesConfig) -> Result<(), Incomplete> {
    if is_valid_collector_name(&config.collector_name) {
        Ok(())
    } else {
        Err(Incomplete::CollectorName)
    }
}

fn check_organization_id(config: &ValuesConfig) -> Result<(), Incomplete> {
    if is_valid_uuid(&config.organization_id) {
        Ok(())
    } else {
        Err(Incomplete::OrganizationId)
    }
}

fn check_api_key(config: &ValuesConfig) -> Result<(), Incomplete> {
    require(&config.api_key, Incomplete::ApiKey)
}

fn check_grafana(config: &ValuesConfig) -> Result<(), Incomplete> {
    if config.enable_grafana {
        require(&config.grafana_api_key, Incomplete::GrafanaApiKey)?;
    }
    Ok(())
}

fn check_storage(config: &ValuesConfig) -> Result<(), Incomplete> {
    require(&config.storage.bucket, Incomplete::StorageBucket)?;
    require(&config.storage.region, Incomplete::StorageRegion)
}

fn check_cloud_credentials(config: &ValuesConfig) -> Result<(), Incomplete> {
    match config.cloud_provider {
        CloudProvider::Aws => check_aws(&config.aws),
        CloudProvider::Gcp => check_gcp(&config.gcp),
        // Azure credentials are not checked yet; the provider is reserved.
        CloudProvider::Azure => Ok(()),
    }
}

fn check_aws(aws: &AwsCredentials) -> Result<(), Incomplete> {
    let mode = aws.mode();
    match aws {
        AwsCredentials::Create {
            access_key_id,
            secret_access_key,
        } => {
            require(access_key_id, Incomplete::Aws { field: "accessKeyId", mode })?;
            require(secret_access_key, Incomplete::Aws { field: "secretAccessKey", mode })
        }
        AwsCredentials::Existing { existing_secret_name } => {
            require(existing_secret_name, Incomplete::Aws { field: "existingSecretName", mode })
        }
        AwsCredentials::Eks => Ok(()),
    }
}

fn check_gcp(gcp: &GcpCredentials) -> Result<(), Incomplete> {
    let mode = gcp.mode();
    match gcp {
        GcpCredentials::WorkloadIdentity => Ok(()),
        GcpCredentials::ServiceAccount { service_account_json } => require(
            service_account_json,
            Incomplete::Gcp { field: "serviceAccountJson", mode },
        ),
        GcpCredentials::Existing { existing_secret_name } => {
            require(existing_secret_name, Incomplete::Gcp { field: "existingSecretName", mode })
        }
    }
}

fn check_postgres(database: &'static str, pg: &PostgresConfig) -> Result<(), Incomplete> {
    let missing = |field| Incomplete::Postgres { database, field };
    require(&pg.host, missing("host"))?;
    if !is_valid_port(&pg.port) {
        return Err(Incomplete::PostgresPort { database });
    }
    require(&pg.database, missing("database"))?;
    require(&pg.username, missing("username"))?;
    match &pg.credentials {
        PostgresCredentials::Create { password } => require(password, missing("password")),
        PostgresCredentials::Existing { existing_secret_name } => {
            require(existing_secret_name, missing("existingSecretName"))
        }
    }
}

fn check_kafka(kafka: &KafkaConfig) -> Result<(), Incomplete> {
    let missing = |field| Incomplete::Kafka { field };
    require(&kafka.brokers, missing("brokers"))?;
    match &kafka.credentials {
        KafkaCredentials::Create { username, password } => {
            require(username, missing("username"))?;
            require(password, missing("password"))
        }
        KafkaCredentials::Existing { existing_secret_name } => {
            require(existing_secret_name, missing("existingSecretName"))
        }
    }
}

fn check_backing_services(config: &ValuesConfig) -> Result<(), Incomplete> {
    if !config.install_mode.requires_backing_services() {
        return Ok(());
    }
    check_postgres("lrdb", &config.lrdb)?;
    check_postgres("configdb", &config.configdb)?;
    check_kafka(&config.kafka)
}

fn check_cardinal_monitoring(config: &ValuesConfig, policy: &Policy) -> Result<(), Incomplete> {
    if config.enable_cardinal_monitoring
        && config.cardinal_api_key.trim().chars().count() < policy.min_cardinal_api_key_len
    {
        return Err(Incomplete::CardinalApiKey {
            min_len: policy.min_cardinal_api_key_len,
        });
    }
    Ok(())
}

/// Runs every rule in order and stops at the first failure.
pub fn check_with(config: &ValuesConfig, policy: &Policy) -> Result<(), Incomplete> {
    check_collector_name(config)?;
    check_organization_id(config)?;
    check_api_key(config)?;
    check_grafana(config)?;
    check_storage(config)?;
    check_cloud_credentials(config)?;
    check_backing_services(config)?;
    check_cardinal_monitoring(config, policy)
}

pub fn check(config: &ValuesConfig) -> Result<(), Incomplete> {
    check_with(config, &Policy::default())
}

pub fn is_complete(config: &ValuesConfig) -> bool {
    check(config).is_ok()
}

/// Every failing rule, one entry per rule group, for reporting back to the form.
pub fn diagnose_with(config: &ValuesConfig, policy: &Policy) -> Vec<Incomplete> {
    let mut problems = Vec::new();
    let results = [
        check_collector_name(config),
        check_organization_id(config),
        check_api_key(config),
        check_grafana(config),
        check_storage(config),
        check_cloud_credentials(config),
    ];
    problems.extend(results.into_iter().filter_map(Result::err));
    if config.install_mode.requires_backing_services() {
        let results = [
            check_postgres("lrdb", &config.lrdb),
            check_postgres("configdb", &config.configdb),
            check_kafka(&config.kafka),
        ];
        problems.extend(results.into_iter().filter_map(Result::err));
    }
    if let Err(e) = check_cardinal_monitoring(config, policy) {
        problems.push(e);
    }
    problems
}
