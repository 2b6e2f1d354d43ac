//! Static table of supported providers and the free-tier models tried for each.

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::error::UnsupportedProvider;

/**
 * \brief Closed set of hosted chat-completion vendors.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenRouter,
    Together,
    Groq,
}

/** \brief Provider used for the secondary fallback chain. */
pub const DEFAULT_PROVIDER: Provider = Provider::OpenRouter;

/**
 * \brief Provider id -> models in priority order.
 */
pub static CATALOG: &[(Provider, &[&str])] = &[
    (
        Provider::OpenRouter,
        &[
            "allenai/olmo-3.1-32b-think:free",
            "xiaomi/mimo-v2-flash:free",
            "nvidia/nemotron-3-nano-30b-a3b:free",
            "meta-llama/llama-3.2-3b-instruct:free",
        ],
    ),
    (
        Provider::Together,
        &["meta-llama/Llama-3.3-70B-Instruct-Turbo"],
    ),
    (
        Provider::Groq,
        &["llama3-8b-8192", "llama3-70b-8192", "mixtral-8x7b-32768"],
    ),
];

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::OpenRouter, Provider::Together, Provider::Groq];

    /** \brief Wire id as sent by the client. */
    pub fn id(self) -> &'static str {
        match self {
            Provider::OpenRouter => "openrouter",
            Provider::Together => "together",
            Provider::Groq => "groq",
        }
    }

    /**
     * \brief Models to attempt for this provider, in declared order.
     */
    pub fn models(self) -> &'static [&'static str] {
        CATALOG
            .iter()
            .find(|(p, _)| *p == self)
            .map(|(_, models)| *models)
            .unwrap_or(&[])
    }

    /**
     * \brief Lenient lookup used by the resolver; unknown ids yield `None`.
     */
    pub fn lookup(id: &str) -> Option<Provider> {
        id.parse().ok()
    }
}

impl FromStr for Provider {
    type Err = UnsupportedProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openrouter" => Ok(Provider::OpenRouter),
            "together" => Ok(Provider::Together),
            "groq" => Ok(Provider::Groq),
            _ => Err(UnsupportedProvider(s.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/**
 * \brief One (provider, model) pair in a fallback chain.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub provider: Provider,
    pub model: &'static str,
}

/**
 * \brief Full ordered attempt sequence for a requested provider id.
 *
 * The requested provider's models come first (none if the id is unknown),
 * followed by the default provider's models unless the request already
 * named the default.
 */
pub fn fallback_chain(requested: &str) -> Vec<Candidate> {
    let primary = Provider::lookup(requested);
    let mut chain = Vec::new();

    if let Some(provider) = primary {
        chain.extend(candidates(provider));
    }
    if primary != Some(DEFAULT_PROVIDER) {
        chain.extend(candidates(DEFAULT_PROVIDER));
    }
    chain
}

fn candidates(provider: Provider) -> impl Iterator<Item = Candidate> {
    provider
        .models()
        .iter()
        .map(move |model| Candidate { provider, model })
}
