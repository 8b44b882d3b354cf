// Fresh organization ids and API keys for the form's "generate" buttons.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

pub const API_KEY_PREFIX: &str = "chq_";
pub const API_KEY_RANDOM_LEN: usize = 32;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedIdentifiers {
    pub organization_id: String,
    pub api_key: String,
    pub grafana_api_key: String,
}

pub fn generate_organization_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn generate_api_key() -> String {
    generate_api_key_with(&mut rand::thread_rng())
}

pub fn generate_api_key_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = rng
        .sample_iter(&Alphanumeric)
        .take(API_KEY_RANDOM_LEN)
        .map(char::from)
        .collect();
    format!("{API_KEY_PREFIX}{suffix}")
}

pub fn generate_identifiers() -> GeneratedIdentifiers {
    GeneratedIdentifiers {
        organization_id: generate_organization_id(),
        api_key: generate_api_key(),
        grafana_api_key: generate_api_key(),
    }
}

pub fn generate_identifiers_json() -> Result<String, String> {
    serde_json::to_string_pretty(&generate_identifiers()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::is_valid_uuid;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_organization_id_passes_uuid_rule() {
        assert!(is_valid_uuid(&generate_organization_id()));
    }

    #[test]
    fn test_api_key_shape() {
        let key = generate_api_key();
        assert!(key.starts_with(API_KEY_PREFIX));
        assert_eq!(key.len(), API_KEY_PREFIX.len() + API_KEY_RANDOM_LEN);
        assert!(key[API_KEY_PREFIX.len()..].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = generate_api_key_with(&mut StdRng::seed_from_u64(7));
        let b = generate_api_key_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_generated_keys_differ() {
        let ids = generate_identifiers();
        assert_ne!(ids.api_key, ids.grafana_api_key);
        let json: serde_json::Value = serde_json::from_str(&generate_identifiers_json().unwrap()).unwrap();
        assert!(json["organizationId"].is_string());
    }
}
