use thurgood_core::models::{ResearchModel, ResearchReport, ResearchRequest};
use thurgood_core::ClientResult;
use validator::Validate;

use crate::{ApiClient, RequestSpec};

impl ApiClient {
    /// Run a research task. The deadline follows the model tier.
    pub async fn research(
        &self,
        instructions: &str,
        model: ResearchModel,
    ) -> ClientResult<ResearchReport> {
        let request = ResearchRequest {
            instructions: instructions.trim().to_string(),
            model,
        };
        request.validate()?;

        self.execute_json(
            RequestSpec::post("/search/v1/research")
                .json_body(&request)?
                .timeout(model.timeout()),
        )
        .await
    }
}
