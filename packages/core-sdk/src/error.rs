use thiserror::Error;

/**
 * \brief Why a single (provider, model) attempt did not produce usable content.
 *
 * Every variant is non-fatal to the fallback chain; the resolver moves on
 * to the next candidate regardless of which one occurred.
 */
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response body is not valid JSON: {0}")]
    Decode(String),

    #[error("response has no message content")]
    MissingContent,

    #[error("content rejected: {0}")]
    Rejected(String),
}

/** \brief Provider id outside the closed set of supported providers. */
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported provider: {0}")]
pub struct UnsupportedProvider(pub String);

/** \brief Terminal outcomes of the question/analysis services. */
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("API_KEY_MISSING")]
    CredentialMissing,

    #[error("No response provided")]
    ResponseMissing,

    #[error("All models failed. Please check your API key or try again later.")]
    Exhausted { attempts: usize },
}
