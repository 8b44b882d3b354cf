// Install commands shown next to a generated values.yaml.

use crate::types::ValuesConfig;

pub const CHART_REF: &str = "oci://public.ecr.aws/cardinalhq.io/lakerunner";
pub const RELEASE_NAME: &str = "lakerunner";
pub const NAMESPACE: &str = "lakerunner";
pub const KEDA_DOCS_URL: &str = "https://keda.sh/docs/latest/deploy/";

pub fn helm_install_command() -> String {
    format!(
        "helm install {RELEASE_NAME} {CHART_REF} \\\n  --values values.yaml \\\n  --namespace {NAMESPACE} --create-namespace\n"
    )
}

/// Step-by-step install notes as shell comments and commands.
/// KEDA comes first when autoscaling depends on it; Grafana access is added when enabled.
pub fn install_instructions(config: &ValuesConfig) -> String {
    let mut out = String::new();
    if config.enable_keda {
        out.push_str("# Step 1: Install KEDA (required)\n");
        out.push_str(&format!("# Follow the official KEDA installation guide: {KEDA_DOCS_URL}\n\n"));
        out.push_str("# Step 2: Install Lakerunner\n");
    } else {
        out.push_str("# Install Lakerunner\n");
    }
    out.push_str("# Save the above values.yaml, then run:\n");
    out.push_str(&helm_install_command());
    if config.enable_grafana {
        out.push_str("\n# Access Grafana\n");
        out.push_str("# Port-forward to access Grafana locally:\n");
        out.push_str(&format!("kubectl port-forward -n {NAMESPACE} svc/grafana 3000:3000\n"));
        out.push_str("# Then access Grafana at: http://localhost:3000\n");
    }
    out
}
