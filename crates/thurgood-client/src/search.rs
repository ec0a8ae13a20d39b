use thurgood_core::models::{RawSearchResponse, SearchOutcome, SearchQuery};
use thurgood_core::ClientResult;
use validator::Validate;

use crate::{segment, ApiClient, RequestSpec};

impl ApiClient {
    /// Search a vault. Defaults to hybrid retrieval and 10 results; `top_k`
    /// is clamped into 1..=100 before sending.
    pub async fn search(&self, query: &SearchQuery) -> ClientResult<SearchOutcome> {
        query.validate()?;
        let body = query.request_body();

        tracing::debug!(
            vault_id = %query.vault_id,
            method = %body.method,
            top_k = body.top_k,
            "Searching vault"
        );

        let raw: RawSearchResponse = self
            .execute_json(
                RequestSpec::post(format!("/vault/{}/search", segment(&query.vault_id)))
                    .json_body(&body)?,
            )
            .await?;

        Ok(raw.normalize(body.method, &query.text))
    }
}
