// End-to-end checks over the public API: snapshot JSON in, values.yaml out.

use lakerunner_values::types::{
    AwsCredentials, CloudProvider, GcpCredentials, InstallMode, KafkaCredentials,
    PostgresCredentials,
};
use lakerunner_values::{compile, is_complete, ValuesCompiler, ValuesConfig};
use proptest::prelude::*;

const ORG_ID: &str = "b3a870ae-2c05-42b9-b073-572e718ad39d";

fn base_snapshot() -> ValuesConfig {
    let json = r#"{
        "installMode": "poc",
        "cloudProvider": "aws",
        "organizationId": "b3a870ae-2c05-42b9-b073-572e718ad39d",
        "collectorName": "test-collector",
        "apiKey": "chq_test123456789012345678901234",
        "grafanaApiKey": "chq_grafana123456789012345678901",
        "storage": { "bucket": "test-bucket", "region": "us-east-1" },
        "aws": { "credentialMode": "eks" },
        "lrdb": {
            "credentialMode": "create",
            "host": "lakerunner-db.example.com",
            "port": "5432",
            "database": "lakerunner",
            "username": "lakerunner",
            "password": "testpassword123",
            "sslMode": "require"
        },
        "configdb": {
            "credentialMode": "create",
            "host": "config-db.example.com",
            "port": "5432",
            "database": "configdb",
            "username": "lakerunner",
            "password": "testpassword456",
            "sslMode": "require"
        },
        "kafka": {
            "credentialMode": "create",
            "brokers": "kafka-1:9092,kafka-2:9092",
            "saslMechanism": "SCRAM-SHA-256",
            "username": "kafka-user",
            "password": "kafkapassword789",
            "useTls": true
        },
        "enableKeda": true,
        "enableGrafana": true,
        "enableCardinalMonitoring": false,
        "enableCollector": true
    }"#;
    serde_json::from_str(json).unwrap()
}

fn parse(yaml: &str) -> serde_yaml::Value {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn scenario_a_aws_eks_poc() {
    let config = base_snapshot();
    let yaml = compile(&config).unwrap();
    assert!(yaml.contains("  aws:\n    region: \"us-east-1\"\n    inject: false\n    create: false\n"));
    assert!(!yaml.contains("accessKeyId"));
    assert!(!yaml.contains("secretAccessKey"));
}

#[test]
fn scenario_b_aws_existing_production() {
    let mut config = base_snapshot();
    config.install_mode = InstallMode::Production;
    config.aws = AwsCredentials::Existing {
        existing_secret_name: "aws-credentials".to_string(),
    };
    config.lrdb.credentials = PostgresCredentials::Existing {
        existing_secret_name: "lrdb-credentials".to_string(),
    };
    let doc = parse(&compile(&config).unwrap());
    assert_eq!(doc["cloudProvider"]["aws"]["secretName"], "aws-credentials");
    assert_eq!(doc["database"]["create"], false);
    assert_eq!(doc["database"]["secretName"], "lrdb-credentials");
    for role in ["ingestLogs", "ingestMetrics", "ingestTraces"] {
        assert_eq!(doc[role]["replicas"], 3);
    }
    assert_eq!(doc["queryApi"]["replicas"], 2);
}

#[test]
fn scenario_c_keda_disabled() {
    let mut config = base_snapshot();
    config.enable_keda = false;
    let yaml = compile(&config).unwrap();
    assert!(yaml.contains("    mode: \"disabled\"\n"));
    assert!(!yaml.contains("keda"));
}

#[test]
fn scenario_d_cardinal_key_floor() {
    let mut config = base_snapshot();
    config.enable_cardinal_monitoring = true;
    config.cardinal_api_key = "123456789".to_string();
    assert_eq!(compile(&config), None);

    config.cardinal_api_key = "1234567890".to_string();
    let yaml = compile(&config).unwrap();
    assert!(yaml.contains("https://otelhttp.intake.us-east-2.aws.cardinalhq.io"));
    let doc = parse(&yaml);
    let env = doc["global"]["env"].as_sequence().unwrap();
    assert_eq!(env.len(), 2);
    assert_eq!(env[1]["name"], "OTEL_EXPORTER_OTLP_HEADERS");
    assert_eq!(env[1]["value"], "x-cardinalhq-api-key=1234567890");
}

#[test]
fn scenario_e_gcp_workload_identity_without_bucket() {
    let mut config = base_snapshot();
    config.cloud_provider = CloudProvider::Gcp;
    config.gcp = GcpCredentials::WorkloadIdentity;
    config.storage.bucket.clear();
    assert_eq!(compile(&config), None);
    assert!(!is_complete(&config));
}

#[test]
fn snake_case_keys_only_where_the_chart_expects_them() {
    let yaml = compile(&base_snapshot()).unwrap();
    let doc = parse(&yaml);
    let profile = &doc["storageProfiles"]["yaml"][0];
    assert_eq!(profile["organization_id"], ORG_ID);
    assert_eq!(profile["collector_name"], "test-collector");
    assert_eq!(profile["cloud_provider"], "aws");
    assert_eq!(doc["apiKeys"]["yaml"][0]["organization_id"], ORG_ID);
    assert!(doc["database"]["lrdb"].get("sslMode").is_some());
    assert!(doc["apiKeys"].get("secretName").is_some());
}

#[test]
fn populated_inactive_variants_do_not_leak() {
    let json = r#"{
        "cloudProvider": "aws",
        "aws": {
            "credentialMode": "eks",
            "accessKeyId": "AKIALEAK",
            "secretAccessKey": "leaked-secret",
            "existingSecretName": "leaked-name"
        },
        "gcp": {
            "credentialMode": "workload_identity",
            "serviceAccountJson": "{\"leak\": true}"
        }
    }"#;
    let partial: ValuesConfig = serde_json::from_str(json).unwrap();
    let mut config = base_snapshot();
    config.aws = partial.aws;
    config.gcp = partial.gcp;
    let yaml = compile(&config).unwrap();
    assert!(!yaml.contains("AKIALEAK"));
    assert!(!yaml.contains("leaked"));
    assert!(!yaml.contains("leak"));
}

#[test]
fn api_key_list_has_one_or_two_entries() {
    let mut config = base_snapshot();
    let doc = parse(&compile(&config).unwrap());
    assert_eq!(doc["apiKeys"]["yaml"][0]["keys"].as_sequence().unwrap().len(), 2);
    config.enable_grafana = false;
    let doc = parse(&compile(&config).unwrap());
    assert_eq!(doc["apiKeys"]["yaml"][0]["keys"].as_sequence().unwrap().len(), 1);
}

fn text_field() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        Just("value".to_string()),
        Just("default".to_string()),
        "[a-z]{1,12}",
    ]
}

fn org_id() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(ORG_ID.to_string()),
        Just("not-a-uuid".to_string()),
        Just(String::new()),
    ]
}

fn port() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("5432".to_string()),
        Just("0".to_string()),
        Just("65536".to_string()),
        Just("abc".to_string()),
        (1u32..=65535).prop_map(|p| p.to_string()),
    ]
}

fn aws() -> impl Strategy<Value = AwsCredentials> {
    prop_oneof![
        Just(AwsCredentials::Eks),
        (text_field(), text_field()).prop_map(|(access_key_id, secret_access_key)| {
            AwsCredentials::Create {
                access_key_id,
                secret_access_key,
            }
        }),
        text_field().prop_map(|existing_secret_name| AwsCredentials::Existing {
            existing_secret_name
        }),
    ]
}

fn gcp() -> impl Strategy<Value = GcpCredentials> {
    prop_oneof![
        Just(GcpCredentials::WorkloadIdentity),
        text_field().prop_map(|service_account_json| GcpCredentials::ServiceAccount {
            service_account_json
        }),
        text_field().prop_map(|existing_secret_name| GcpCredentials::Existing {
            existing_secret_name
        }),
    ]
}

fn postgres_credentials() -> impl Strategy<Value = PostgresCredentials> {
    prop_oneof![
        text_field().prop_map(|password| PostgresCredentials::Create { password }),
        text_field().prop_map(|existing_secret_name| PostgresCredentials::Existing {
            existing_secret_name
        }),
    ]
}

fn kafka_credentials() -> impl Strategy<Value = KafkaCredentials> {
    prop_oneof![
        (text_field(), text_field())
            .prop_map(|(username, password)| KafkaCredentials::Create { username, password }),
        text_field().prop_map(|existing_secret_name| KafkaCredentials::Existing {
            existing_secret_name
        }),
    ]
}

fn snapshot() -> impl Strategy<Value = ValuesConfig> {
    let identity = (
        prop_oneof![Just(InstallMode::Poc), Just(InstallMode::Production)],
        prop_oneof![
            Just(CloudProvider::Aws),
            Just(CloudProvider::Gcp),
            Just(CloudProvider::Azure)
        ],
        org_id(),
        text_field(),
        text_field(),
        text_field(),
        prop_oneof![Just(String::new()), Just("short".to_string()), Just("long-enough-key".to_string())],
    );
    let storage_and_cloud = (text_field(), text_field(), aws(), gcp());
    let backing = (
        (text_field(), port(), text_field(), postgres_credentials()),
        (text_field(), port(), postgres_credentials()),
        (text_field(), kafka_credentials(), any::<bool>()),
    );
    let toggles = any::<(bool, bool, bool, bool)>();

    (identity, storage_and_cloud, backing, toggles).prop_map(
        |(
            (install_mode, cloud_provider, organization_id, collector_name, api_key, grafana_api_key, cardinal_api_key),
            (bucket, region, aws, gcp),
            ((lrdb_host, lrdb_port, lrdb_user, lrdb_creds), (cdb_host, cdb_port, cdb_creds), (brokers, kafka_creds, use_tls)),
            (enable_keda, enable_grafana, enable_cardinal_monitoring, enable_collector),
        )| {
            let mut config = ValuesConfig {
                install_mode,
                cloud_provider,
                organization_id,
                collector_name,
                api_key,
                grafana_api_key,
                cardinal_api_key,
                aws,
                gcp,
                enable_keda,
                enable_grafana,
                enable_cardinal_monitoring,
                enable_collector,
                ..ValuesConfig::default()
            };
            config.storage.bucket = bucket;
            config.storage.region = region;
            config.lrdb.host = lrdb_host;
            config.lrdb.port = lrdb_port;
            config.lrdb.username = lrdb_user.clone();
            config.lrdb.credentials = lrdb_creds;
            config.configdb.host = cdb_host;
            config.configdb.port = cdb_port;
            config.configdb.username = lrdb_user;
            config.configdb.credentials = cdb_creds;
            config.kafka.brokers = brokers;
            config.kafka.credentials = kafka_creds;
            config.kafka.use_tls = use_tls;
            config
        },
    )
}

proptest! {
    #[test]
    fn compile_agrees_with_gate(config in snapshot()) {
        let compiler = ValuesCompiler::default();
        let yaml = compiler.compile(&config);
        prop_assert_eq!(yaml.is_some(), is_complete(&config));
        prop_assert_eq!(yaml.is_some(), compiler.is_complete(&config));
        prop_assert_eq!(&yaml, &compiler.compile(&config));
        if let Some(yaml) = yaml {
            let parsed: Result<serde_yaml::Value, _> = serde_yaml::from_str(&yaml);
            prop_assert!(parsed.is_ok());
            prop_assert!(!config.api_key.trim().is_empty());
            prop_assert_eq!(yaml.contains("OTEL_EXPORTER_OTLP_ENDPOINT"), config.enable_cardinal_monitoring);
            prop_assert_eq!(yaml.contains("replicas:"), config.install_mode == InstallMode::Production);
        }
    }
}
