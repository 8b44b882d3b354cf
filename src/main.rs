//! Lakerunner values MCP server: check install configurations and generate values.yaml.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use lakerunner_values::tools;
use lakerunner_values::types::{InstallMode, ValuesConfig};
use lakerunner_values::{Policy, ValuesCompiler};
use rmcp::{
    handler::server::ServerHandler,
    model::{CallToolResult, Content},
    tool, tool_handler, tool_router,
    transport::stdio,
    ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server settings from `LAKERUNNER_WIZARD_*` environment variables.
///   - `LAKERUNNER_WIZARD_POLICY_FILE`  JSON policy override (optional)
#[derive(Debug, Deserialize)]
struct Config {
    #[serde(default)]
    policy_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct GenerateParams {
    /// Full install configuration snapshot
    config: ValuesConfig,
    /// Append helm/kubectl install commands after the manifest
    #[serde(default)]
    include_instructions: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct CheckParams {
    /// Full install configuration snapshot
    config: ValuesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct DefaultParams {
    /// Install mode: poc or production (default poc)
    #[serde(default)]
    install_mode: Option<InstallMode>,
}

#[derive(Clone)]
struct ValuesMcpService {
    compiler: Arc<ValuesCompiler>,
    tool_router: rmcp::handler::server::tool::ToolRouter<Self>,
}

#[tool_router]
impl ValuesMcpService {
    fn new(compiler: ValuesCompiler) -> Self {
        Self {
            compiler: Arc::new(compiler),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Generate a Lakerunner Helm values.yaml from a complete install configuration")]
    async fn generate_values_yaml(
        &self,
        params: rmcp::handler::server::wrapper::Parameters<GenerateParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let p = params.0;
        match tools::values::generate_values_yaml(&self.compiler, &p.config, p.include_instructions) {
            Ok(out) => Ok(CallToolResult::success(vec![Content::text(out)])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e)])),
        }
    }

    #[tool(description = "Check whether an install configuration is complete enough to generate values.yaml")]
    async fn check_values_config(
        &self,
        params: rmcp::handler::server::wrapper::Parameters<CheckParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        match tools::values::check_values_config(&self.compiler, &params.0.config) {
            Ok(()) => Ok(CallToolResult::success(vec![Content::text("Configuration is complete.")])),
            Err(errors) => Ok(CallToolResult::error(vec![Content::text(format!(
                "Configuration incomplete:\n- {}",
                errors.join("\n- ")
            ))])),
        }
    }

    #[tool(description = "Return the default install configuration for poc or production as JSON")]
    async fn default_values_config(
        &self,
        params: rmcp::handler::server::wrapper::Parameters<DefaultParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let install_mode = params.0.install_mode.unwrap_or_default();
        match tools::values::default_values_config_json(install_mode) {
            Ok(out) => Ok(CallToolResult::success(vec![Content::text(out)])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e)])),
        }
    }

    #[tool(description = "Generate a new organization id and Lakerunner/Grafana API keys")]
    async fn generate_identifiers(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        match tools::identifiers::generate_identifiers_json() {
            Ok(out) => Ok(CallToolResult::success(vec![Content::text(out)])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e)])),
        }
    }

    #[tool(description = "List cloud providers, credential modes and the fields each one requires")]
    async fn list_credential_modes(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        let out = tools::reference::list_credential_modes_json();
        Ok(CallToolResult::success(vec![Content::text(out)]))
    }
}

#[tool_handler]
impl ServerHandler for ValuesMcpService {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo::new(
            rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
        )
        .with_instructions(
            "MCP for Lakerunner: check install configurations and generate Helm values.yaml.",
        )
    }
}

fn load_policy(config: &Config) -> Result<Policy> {
    match &config.policy_file {
        Some(path) => {
            let policy = Policy::from_json_file(path)?;
            info!(path = %path.display(), "loaded policy override");
            Ok(policy)
        }
        None => Ok(Policy::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the MCP transport, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config: Config = envy::prefixed("LAKERUNNER_WIZARD_")
        .from_env()
        .context("failed to load config from LAKERUNNER_WIZARD_* env vars")?;
    let policy = load_policy(&config)?;

    info!(version = env!("CARGO_PKG_VERSION"), "lakerunner-values-mcp starting");
    let service = ValuesMcpService::new(ValuesCompiler::new(policy));
    let server = service
        .serve(stdio())
        .await
        .context("failed to start MCP server on stdio")?;
    server.waiting().await?;
    Ok(())
}
