use jsonwebtoken::{Algorithm, DecodingKey, TokenData, Validation, decode, decode_header};
use moka::future::Cache;
use std::sync::Arc;
use tracing::debug;

use super::jwt::Claims;

#[derive(Clone)]
struct JwkComponents {
    x: String,
    y: String,
    algorithm: Algorithm,
}

/// Fetches and caches the Supabase project's JWKS so every request does not
/// round-trip to the auth service. Keys rotate rarely; an hour of TTL is
/// plenty.
#[derive(Clone)]
pub struct JwksCache {
    keys: Arc<Cache<String, JwkComponents>>,
    jwks_url: String,
    client: reqwest::Client,
    anon_key: String,
}

impl JwksCache {
    pub fn new(project_ref: &str, anon_key: &str) -> Self {
        let keys = Arc::new(
            Cache::builder()
                .time_to_live(std::time::Duration::from_secs(3600))
                .max_capacity(10)
                .build(),
        );

        Self {
            keys,
            jwks_url: format!("https://{project_ref}.supabase.co/auth/v1/.well-known/jwks.json"),
            client: reqwest::Client::new(),
            anon_key: anon_key.to_string(),
        }
    }

    async fn fetch_jwks(&self) -> Result<serde_json::Value, String> {
        debug!("Fetching JWKS from {}", self.jwks_url);

        let response = self
            .client
            .get(&self.jwks_url)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| format!("Failed to fetch JWKS: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Failed to fetch JWKS: HTTP {status}"));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse JWKS JSON: {e}"))
    }

    async fn key_components(&self, kid: &str) -> Result<JwkComponents, String> {
        if let Some(cached) = self.keys.get(kid).await {
            return Ok(cached);
        }

        let jwks = self.fetch_jwks().await?;
        let keys = jwks["keys"].as_array().ok_or("No keys in JWKS")?;

        let jwk = keys
            .iter()
            .find(|k| k["kid"].as_str() == Some(kid))
            .ok_or(format!("Key with kid={kid} not found in JWKS"))?;

        let x = jwk["x"].as_str().ok_or("Missing 'x' in JWK")?.to_string();
        let y = jwk["y"].as_str().ok_or("Missing 'y' in JWK")?.to_string();

        let algorithm = match jwk["alg"].as_str().unwrap_or("ES256") {
            "ES384" => Algorithm::ES384,
            _ => Algorithm::ES256,
        };

        let components = JwkComponents { x, y, algorithm };
        self.keys.insert(kid.to_string(), components.clone()).await;

        Ok(components)
    }

    pub async fn validate_token(&self, token: &str) -> Result<TokenData<Claims>, String> {
        let header = decode_header(token).map_err(|e| format!("Failed to decode header: {e}"))?;
        let kid = header.kid.ok_or("No 'kid' in token header")?;

        let components = self.key_components(&kid).await?;

        let decoding_key = DecodingKey::from_ec_components(&components.x, &components.y)
            .map_err(|e| format!("Failed to create decoding key: {e}"))?;

        let mut validation = Validation::new(components.algorithm);
        validation.validate_aud = false;

        decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| format!("Token validation failed: {e}"))
    }
}
