//! Ordered multi-provider fallback: first usable response wins.

use crate::{
    catalog::{fallback_chain, Candidate, Provider},
    credential::Credential,
    error::AttemptError,
    telemetry,
    upstream::{ChatPrompt, UpstreamClient},
};

/** \brief A candidate that was tried and did not yield usable content. */
#[derive(Debug)]
pub struct AttemptFailure {
    pub provider: Provider,
    pub model: &'static str,
    pub error: AttemptError,
}

/** \brief Content accepted from the first successful candidate. */
#[derive(Debug)]
pub struct Resolved<T> {
    pub value: T,
    pub provider: Provider,
    pub model: &'static str,
    /** \brief Candidates that failed before this one. */
    pub failures: Vec<AttemptFailure>,
}

/** \brief Every candidate in the chain failed. */
#[derive(Debug)]
pub struct Exhausted {
    pub failures: Vec<AttemptFailure>,
}

/**
 * \brief Walk the fallback chain for `requested`, one attempt per candidate.
 *
 * `accept` turns raw message content into the caller's value; returning an
 * error from it counts as an attempt failure, same as a bad HTTP status.
 * Attempts are strictly sequential and never repeated.
 */
pub async fn resolve<T, F>(
    client: &UpstreamClient,
    requested: &str,
    credential: &Credential,
    prompt: &ChatPrompt,
    mut accept: F,
) -> Result<Resolved<T>, Exhausted>
where
    F: FnMut(&str) -> Result<T, AttemptError>,
{
    let chain = fallback_chain(requested);
    let mut failures = Vec::new();

    if Provider::lookup(requested).is_none() {
        tracing::warn!(requested, "unrecognized provider, using default chain only");
    }

    for Candidate { provider, model } in chain {
        tracing::debug!(%provider, model, "attempting upstream");
        let outcome = client
            .complete(provider, model, credential, prompt)
            .await
            .and_then(|content| accept(content.as_str()));

        match outcome {
            Ok(value) => {
                tracing::info!(%provider, model, failed = failures.len(), "upstream succeeded");
                telemetry::log_attempt(provider, model, None);
                return Ok(Resolved {
                    value,
                    provider,
                    model,
                    failures,
                });
            }
            Err(error) => {
                tracing::warn!(%provider, model, %error, "upstream attempt failed");
                telemetry::log_attempt(provider, model, Some(&error));
                failures.push(AttemptFailure {
                    provider,
                    model,
                    error,
                });
            }
        }
    }

    tracing::error!(attempts = failures.len(), "all upstream candidates failed");
    Err(Exhausted { failures })
}
