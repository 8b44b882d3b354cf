// Generate and check Lakerunner values manifests.

use tracing::{debug, info};

use crate::compile::ValuesCompiler;
use crate::tools::instructions::install_instructions;
use crate::types::{InstallMode, ValuesConfig};
use crate::validate;

pub const INCOMPLETE_MESSAGE: &str =
    "Configuration incomplete: fill in every required field to generate values.yaml.";

/// Compiles `config` into values.yaml text, optionally followed by install commands.
/// Returns the first missing field when the configuration is incomplete.
pub fn generate_values_yaml(
    compiler: &ValuesCompiler,
    config: &ValuesConfig,
    include_instructions: bool,
) -> Result<String, String> {
    let Some(yaml) = compiler.compile(config) else {
        let reason = validate::check_with(config, compiler.policy())
            .err()
            .map(|e| e.to_string())
            .unwrap_or_default();
        info!(%reason, "values.yaml not generated");
        return Err(format!("{INCOMPLETE_MESSAGE}\n- {reason}"));
    };
    info!(
        provider = config.cloud_provider.as_str(),
        install_mode = config.install_mode.as_str(),
        bytes = yaml.len(),
        "values.yaml generated"
    );
    if !include_instructions {
        return Ok(yaml);
    }
    let mut out = yaml;
    out.push_str("\n# ---\n");
    out.push_str(&install_instructions(config));
    Ok(out)
}

/// Checks completeness, listing every failing rule.
pub fn check_values_config(
    compiler: &ValuesCompiler,
    config: &ValuesConfig,
) -> Result<(), Vec<String>> {
    let problems = validate::diagnose_with(config, compiler.policy());
    debug!(problems = problems.len(), "checked values config");
    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems.into_iter().map(|p| p.to_string()).collect())
    }
}

/// Default form contents for the given install mode, as pretty JSON.
pub fn default_values_config_json(install_mode: InstallMode) -> Result<String, String> {
    let config = ValuesConfig::for_install_mode(install_mode);
    serde_json::to_string_pretty(&config).map_err(|e| e.to_string())
}
