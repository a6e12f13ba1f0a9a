use sea_orm::DatabaseConnection;
use std::time::Duration;

use crate::db;
use crate::error::ApiError;
use crate::gateways::GatewayError;
use crate::models::contracts;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the contract-document render service.
///
/// The renderer turns contract terms into a PDF and returns a hosted URL.
/// It is invoked after activation; a render failure is logged by the caller
/// and never undoes the activation that already committed.
#[derive(Clone)]
pub struct DocumentRenderer {
    http: reqwest::Client,
    render_url: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct RenderResponse {
    url: String,
}

impl DocumentRenderer {
    pub fn new(render_url: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build document renderer HTTP client");

        Self { http, render_url }
    }

    /// Reads `DOCUMENT_RENDER_URL`; unset means document generation is skipped.
    pub fn from_env() -> Self {
        Self::new(std::env::var("DOCUMENT_RENDER_URL").ok())
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Render the contract document and store its URL on the contract row.
    ///
    /// Returns `Ok(None)` when rendering is not configured.
    pub async fn generate_for_contract(
        &self,
        db: &DatabaseConnection,
        contract: &contracts::Model,
    ) -> Result<Option<String>, ApiError> {
        let Some(render_url) = &self.render_url else {
            tracing::debug!(contract_id = %contract.id, "document rendering disabled, skipping");
            return Ok(None);
        };

        // Party and requirement names for the template.
        let company = db::companies::get_company_by_id(db, contract.company_id).await?;
        let client = db::users::get_user_by_id(db, contract.client_id).await?;
        let requirement =
            db::requirements::get_requirement_by_id(db, contract.requirement_id).await?;

        let body = serde_json::json!({
            "template": contract.service_type,
            "project_id": contract.project_id,
            "project_name": requirement.as_ref().map(|r| r.title.clone()),
            "client_name": client.and_then(|u| u.display_name),
            "company_name": company.map(|c| c.name),
            "location": contract.location,
            "amount": contract.amount,
            "advance_percent": contract.advance_percent,
            "duration_days": contract.duration_days,
            "scope_summary": contract.scope_summary,
        });

        let response = self
            .http
            .post(render_url)
            .json(&body)
            .send()
            .await
            .map_err(GatewayError::from)?;

        if !response.status().is_success() {
            return Err(ApiError::Gateway(GatewayError::InvalidResponse(format!(
                "document render returned HTTP {}",
                response.status()
            ))));
        }

        let rendered: RenderResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        db::contracts::set_contract_file(db, contract.id, rendered.url.clone()).await?;

        Ok(Some(rendered.url))
    }
}
