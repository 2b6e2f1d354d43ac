use serde_json::Value;

use crate::{
    credential::Credential,
    error::{AttemptError, ServiceError},
    models::{Assessment, ScenarioRequest},
    resolver,
    upstream::{ChatPrompt, UpstreamClient},
};

const MIRROR_INSTRUCTION: &str = r#"You are a ruthless psychological mirror. Do not teach. Do not coddle. Output a JSON with scores (0-100) for Empathy, Honesty, Wisdom, and a 1-sentence Brutal Verdict.

OUTPUT FORMAT (JSON ONLY):
{
  "empathy": (0-100 score),
  "honesty": (0-100 score),
  "wisdom": (0-100 score),
  "verdict": "A single, sharp, brutal sentence analyzing their character."
}"#;

pub const DEGRADED_VERDICT: &str =
    "Error: All models failed. Please check your API key or try again later.";

impl Assessment {
    /** \brief Zero-score result returned when every candidate failed. */
    pub fn degraded() -> Self {
        Self {
            empathy: 0,
            honesty: 0,
            wisdom: 0,
            verdict: DEGRADED_VERDICT.to_string(),
        }
    }
}

/**
 * \brief Score one answer.
 *
 * Only a missing key or an empty answer is an error. Exhausting every
 * candidate yields `Assessment::degraded()`.
 */
pub async fn analyze(
    client: &UpstreamClient,
    api_key: Option<&str>,
    provider: &str,
    request: &ScenarioRequest,
) -> Result<Assessment, ServiceError> {
    let credential = Credential::from_input(api_key).ok_or(ServiceError::CredentialMissing)?;
    if request.user_response.is_empty() {
        return Err(ServiceError::ResponseMissing);
    }

    let prompt = ChatPrompt::system(MIRROR_INSTRUCTION)
        .with_user(format!(
            "Scenario: {}\n\nUser Response: {}",
            request.scenario, request.user_response
        ))
        .json();

    match resolver::resolve(client, provider, &credential, &prompt, parse_assessment).await {
        Ok(resolved) => Ok(resolved.value),
        Err(exhausted) => {
            tracing::warn!(
                attempts = exhausted.failures.len(),
                "analysis exhausted, returning degraded assessment"
            );
            Ok(Assessment::degraded())
        }
    }
}

/**
 * \brief Parse model content into an assessment.
 *
 * Tolerates a surrounding Markdown code fence and fractional scores;
 * scores are rounded and clamped to [0, 100].
 */
pub fn parse_assessment(content: &str) -> Result<Assessment, AttemptError> {
    let v: Value = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| AttemptError::Rejected(format!("content is not JSON: {}", e)))?;

    let verdict = v
        .get("verdict")
        .and_then(Value::as_str)
        .ok_or_else(|| AttemptError::Rejected("missing verdict".to_string()))?;

    Ok(Assessment {
        empathy: score(&v, "empathy")?,
        honesty: score(&v, "honesty")?,
        wisdom: score(&v, "wisdom")?,
        verdict: verdict.to_string(),
    })
}

fn score(v: &Value, key: &str) -> Result<u8, AttemptError> {
    let n = v
        .get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| AttemptError::Rejected(format!("missing numeric {}", key)))?;
    Ok(n.round().clamp(0.0, 100.0) as u8)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string ("json") on the opening fence line
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_content_round_trips() {
        let a = parse_assessment(r#"{"empathy":80,"honesty":60,"wisdom":90,"verdict":"X"}"#)
            .unwrap();
        assert_eq!(
            a,
            Assessment {
                empathy: 80,
                honesty: 60,
                wisdom: 90,
                verdict: "X".to_string(),
            }
        );
    }

    #[test]
    fn fenced_content_is_accepted() {
        let content = "```json\n{\"empathy\": 10, \"honesty\": 20, \"wisdom\": 30, \"verdict\": \"meh\"}\n```";
        let a = parse_assessment(content).unwrap();
        assert_eq!((a.empathy, a.honesty, a.wisdom), (10, 20, 30));
        assert_eq!(a.verdict, "meh");
    }

    #[test]
    fn scores_are_rounded_and_clamped() {
        let a = parse_assessment(
            r#"{"empathy":72.6,"honesty":140,"wisdom":-3,"verdict":"bold"}"#,
        )
        .unwrap();
        assert_eq!((a.empathy, a.honesty, a.wisdom), (73, 100, 0));
    }

    #[test]
    fn incomplete_or_prose_content_is_rejected() {
        assert!(matches!(
            parse_assessment("You seem nice."),
            Err(AttemptError::Rejected(_))
        ));
        assert!(matches!(
            parse_assessment(r#"{"empathy":1,"honesty":2,"verdict":"no wisdom"}"#),
            Err(AttemptError::Rejected(_))
        ));
        assert!(matches!(
            parse_assessment(r#"{"empathy":"high","honesty":2,"wisdom":3,"verdict":"v"}"#),
            Err(AttemptError::Rejected(_))
        ));
    }

    #[test]
    fn degraded_result_is_all_zero() {
        let d = Assessment::degraded();
        assert_eq!((d.empathy, d.honesty, d.wisdom), (0, 0, 0));
        assert_eq!(d.verdict, DEGRADED_VERDICT);
    }
}
