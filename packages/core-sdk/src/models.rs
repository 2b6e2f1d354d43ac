use serde::{Deserialize, Serialize};

/**
 * \brief Chat message, aligned with the OpenAI chat message shape.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /** \brief Role: system/user/assistant */
    pub role: String,
    /** \brief Content */
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/**
 * \brief A freshly generated dilemma plus where it came from.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
    /** \brief Scenario text, trimmed. */
    pub question: String,
    /** \brief Model that produced it. */
    pub model: String,
    /** \brief Provider id that produced it. */
    pub provider: String,
}

/**
 * \brief Personality score for one answer. Scores are always within [0, 100].
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub empathy: u8,
    pub honesty: u8,
    pub wisdom: u8,
    pub verdict: String,
}

/**
 * \brief Scenario and the user's free-text answer to it.
 */
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRequest {
    #[serde(default)]
    pub scenario: String,
    #[serde(default)]
    pub user_response: String,
}
