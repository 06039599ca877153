use tracing::{debug, info, warn};

use crate::client::{DynGenerationClient, GenerateContentRequest, GenerateContentResponse};
use crate::error::RelayError;

use super::credential::strip_bearer;
use super::prompt::compose_prompt;
use super::types::{GeneratedPlan, StudyPlanRequest};

/// Turns one study-plan request into one upstream generation call.
///
/// Holds no per-request state, so a single instance can serve concurrent
/// requests.
#[derive(Clone)]
pub struct PlanRelay {
    client: DynGenerationClient,
    markdown: bool,
}

impl PlanRelay {
    pub fn new(client: DynGenerationClient, markdown: bool) -> Self {
        Self { client, markdown }
    }

    pub async fn generate_plan(
        &self,
        request: &StudyPlanRequest,
        credential: &str,
    ) -> Result<GeneratedPlan, RelayError> {
        let api_key = strip_bearer(credential);
        if api_key.trim().is_empty() {
            return Err(RelayError::MissingCredential);
        }

        let validated = request.validate()?;
        let prompt = compose_prompt(&validated, self.markdown);
        debug!(
            prompt_len = prompt.len(),
            subjects = %validated.subjects,
            "composed study plan prompt"
        );

        let upstream = GenerateContentRequest::from_prompt(prompt);
        let response = self.client.generate_content(api_key, &upstream).await?;

        let plan_text = extract_plan_text(response).inspect_err(|err| {
            warn!(error = %err, "upstream returned an unusable response");
        })?;
        info!(plan_len = plan_text.len(), "study plan generated");

        Ok(GeneratedPlan { plan_text })
    }
}

/// First candidate, first part, returned untouched.
pub fn extract_plan_text(response: GenerateContentResponse) -> Result<String, RelayError> {
    let block_reason = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason);

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| match block_reason {
            Some(reason) => {
                RelayError::malformed(format!("no candidates (prompt blocked: {reason})"))
            }
            None => RelayError::malformed("no candidates"),
        })?;

    let content = match (candidate.content, candidate.finish_reason) {
        (Some(content), _) => content,
        (None, Some(reason)) => {
            return Err(RelayError::malformed(format!(
                "candidate has no content (finish reason: {reason})"
            )));
        }
        (None, None) => return Err(RelayError::malformed("candidate has no content")),
    };

    let text = content
        .parts
        .into_iter()
        .next()
        .ok_or_else(|| RelayError::malformed("candidate content has no parts"))?
        .text
        .ok_or_else(|| RelayError::malformed("first content part has no text"))?;

    if text.is_empty() {
        return Err(RelayError::malformed("first content part is empty"));
    }

    Ok(text)
}
