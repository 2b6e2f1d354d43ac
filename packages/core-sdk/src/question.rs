use crate::{
    credential::Credential,
    error::{AttemptError, ServiceError},
    models::QuestionResult,
    resolver::{self, Resolved},
    upstream::{ChatPrompt, UpstreamClient},
};

const SCENARIO_INSTRUCTION: &str = "Generate a single, spicy, real-life moral dilemma scenario. \
Make it provocative, fun to answer, and psychologically revealing. Keep it under 100 words. \
Output only the scenario text, nothing else.";

/**
 * \brief Obtain a fresh dilemma, falling back across providers and models.
 * \param api_key  caller key as received; blank counts as missing
 * \param provider requested provider id (unknown ids go straight to the default chain)
 */
pub async fn generate(
    client: &UpstreamClient,
    api_key: Option<&str>,
    provider: &str,
) -> Result<QuestionResult, ServiceError> {
    let credential = Credential::from_input(api_key).ok_or(ServiceError::CredentialMissing)?;
    let prompt = ChatPrompt::system(SCENARIO_INSTRUCTION);

    match resolver::resolve(client, provider, &credential, &prompt, |content| {
        let question = content.trim();
        if question.is_empty() {
            return Err(AttemptError::Rejected("blank scenario".to_string()));
        }
        Ok(question.to_string())
    })
    .await
    {
        Ok(Resolved {
            value,
            provider,
            model,
            ..
        }) => Ok(QuestionResult {
            question: value,
            model: model.to_string(),
            provider: provider.id().to_string(),
        }),
        Err(exhausted) => Err(ServiceError::Exhausted {
            attempts: exhausted.failures.len(),
        }),
    }
}
