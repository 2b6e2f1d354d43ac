use serde_json::Value;

use crate::{
    catalog::Provider,
    credential::Credential,
    error::AttemptError,
    upstream::{ChatPrompt, UpstreamClient},
};

/** \brief Single model used by the server-keyed prompt endpoint. */
pub const PROMPT_MODEL: &str = "meta-llama/llama-3.2-3b-instruct:free";

pub const FALLBACK_PROMPT: &str = "How might you show empathy in a challenging situation today?";

const PROMPT_INSTRUCTION: &str = "Generate one morally ambiguous empathy scenario in exactly 2 sentences. \
Make it spicy and challenging (e.g., \"Your friend is failing, but their failure makes you look better. \
What do you say?\"). Return only the scenario text.";

/**
 * \brief Short empathy prompt generated with the operator's own OpenRouter key.
 *
 * No fallback chain: one model, one attempt. Blank or null content degrades
 * to `FALLBACK_PROMPT`; a reply without `choices[0].message` is an error,
 * as are transport and status failures.
 */
pub async fn generate(
    client: &UpstreamClient,
    server_key: &Credential,
) -> Result<String, AttemptError> {
    let prompt = ChatPrompt {
        temperature: Some(0.9),
        max_tokens: Some(50),
        ..ChatPrompt::default()
    }
    .with_user(PROMPT_INSTRUCTION);

    let v = client
        .send(Provider::OpenRouter, PROMPT_MODEL, server_key, &prompt)
        .await?;
    let message = v
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .ok_or(AttemptError::MissingContent)?;

    let text = message
        .get("content")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or("");
    if text.is_empty() {
        return Ok(FALLBACK_PROMPT.to_string());
    }
    Ok(text.to_string())
}
