// Reference data for providers and credential modes (list_credential_modes).

use serde_json::{Map as JsonMap, Value};

pub fn list_credential_modes_json() -> String {
    let modes: JsonMap<String, Value> = default_credential_modes();
    serde_json::to_string_pretty(&modes).unwrap_or_else(|_| default_credential_modes_raw().to_string())
}

fn default_credential_modes() -> JsonMap<String, Value> {
    serde_json::from_str(default_credential_modes_raw()).unwrap_or_default()
}

fn default_credential_modes_raw() -> &'static str {
    r#"{
  "installModes": {
    "poc": {
      "description": "Proof of concept with real cloud storage and databases",
      "requires": ["lrdb", "configdb", "kafka"]
    },
    "production": {
      "description": "Full production deployment with HA and autoscaling",
      "requires": ["lrdb", "configdb", "kafka"],
      "adds": ["ingestLogs.replicas", "ingestMetrics.replicas", "ingestTraces.replicas", "queryApi.replicas"]
    }
  },
  "cloudProviders": {
    "aws": {
      "create": {
        "description": "Create a secret from inline access keys",
        "required_fields": ["accessKeyId", "secretAccessKey"],
        "inject": true,
        "create": true
      },
      "existing": {
        "description": "Mount an existing Kubernetes secret",
        "required_fields": ["existingSecretName"],
        "inject": true,
        "create": false
      },
      "eks": {
        "description": "Use IRSA / EKS Pod Identity; no secret is mounted",
        "required_fields": [],
        "inject": false,
        "create": false
      }
    },
    "gcp": {
      "workload_identity": {
        "description": "Use GKE Workload Identity; no secret is mounted",
        "required_fields": [],
        "inject": false,
        "create": false
      },
      "service_account": {
        "description": "Create a secret from an inline service account JSON key",
        "required_fields": ["serviceAccountJson"],
        "inject": true,
        "create": true
      },
      "existing": {
        "description": "Mount an existing secret holding GOOGLE_APPLICATION_CREDENTIALS",
        "required_fields": ["existingSecretName"],
        "inject": true,
        "create": false
      }
    },
    "azure": {
      "reserved": {
        "description": "Storage account credentials; not validated yet",
        "required_fields": [],
        "optional_fields": ["storageAccountName", "storageAccountKey", "containerName"]
      }
    }
  },
  "postgres": {
    "create": {
      "required_fields": ["host", "port", "database", "username", "password"],
      "optional_fields": ["sslMode"]
    },
    "existing": {
      "required_fields": ["host", "port", "database", "username", "existingSecretName"],
      "optional_fields": ["sslMode"]
    }
  },
  "kafka": {
    "create": {
      "required_fields": ["brokers", "username", "password"],
      "optional_fields": ["saslMechanism", "useTls"]
    },
    "existing": {
      "required_fields": ["brokers", "existingSecretName"],
      "optional_fields": ["saslMechanism", "useTls"]
    }
  },
  "features": {
    "enableKeda": "Autoscale workloads with KEDA (global.autoscaling.mode)",
    "enableGrafana": "Deploy Grafana; requires grafanaApiKey",
    "enableCardinalMonitoring": "Send Lakerunner telemetry to Cardinal; requires cardinalApiKey of 10+ characters",
    "enableCollector": "Deploy the OTel collector"
  }
}"#
}
