use std::time::Duration;

use anyhow::Result;
use reqwest::header::{HeaderName, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};

use crate::{catalog::Provider, credential::Credential, error::AttemptError, models::Message};

const ERROR_BODY_EXCERPT: usize = 200;

/**
 * \brief Chat-completion base URLs per provider, plus the referer OpenRouter expects.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub openrouter: String,
    pub together: String,
    pub groq: String,
    pub referer: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            openrouter: "https://openrouter.ai/api/v1".to_string(),
            together: "https://api.together.xyz/v1".to_string(),
            groq: "https://api.groq.com/openai/v1".to_string(),
            referer: "http://localhost:3001".to_string(),
        }
    }
}

impl Endpoints {
    pub fn base(&self, provider: Provider) -> &str {
        match provider {
            Provider::OpenRouter => &self.openrouter,
            Provider::Together => &self.together,
            Provider::Groq => &self.groq,
        }
    }

}

/**
 * \brief Provider-independent content of one chat-completion call.
 */
#[derive(Debug, Clone, Default)]
pub struct ChatPrompt {
    pub messages: Vec<Message>,
    /** \brief Ask for `response_format: {"type": "json_object"}`. */
    pub json_mode: bool,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ChatPrompt {
    pub fn system(instruction: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(instruction)],
            ..Self::default()
        }
    }

    pub fn with_user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::user(content));
        self
    }

    pub fn json(mut self) -> Self {
        self.json_mode = true;
        self
    }
}

/**
 * \brief Fully resolved outbound request; building one performs no I/O.
 */
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub url: String,
    pub headers: Vec<(HeaderName, String)>,
    pub body: Value,
}

impl UpstreamRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.as_str().eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/**
 * \brief Maps (provider, model, prompt) to the concrete wire request.
 *
 * The only provider-specific difference today is OpenRouter's `HTTP-Referer`.
 */
pub fn build_request(
    endpoints: &Endpoints,
    provider: Provider,
    model: &str,
    credential: &Credential,
    prompt: &ChatPrompt,
) -> UpstreamRequest {
    let url = format!(
        "{}/chat/completions",
        endpoints.base(provider).trim_end_matches('/')
    );

    let mut headers = vec![
        (AUTHORIZATION, credential.bearer()),
        (CONTENT_TYPE, "application/json".to_string()),
    ];
    match provider {
        Provider::OpenRouter => headers.push((
            HeaderName::from_static("http-referer"),
            endpoints.referer.clone(),
        )),
        Provider::Together | Provider::Groq => {}
    }

    let mut body = json!({
        "model": model,
        "messages": prompt.messages,
    });
    if prompt.json_mode {
        body["response_format"] = json!({"type": "json_object"});
    }
    if let Some(t) = prompt.temperature {
        body["temperature"] = json!(t);
    }
    if let Some(n) = prompt.max_tokens {
        body["max_tokens"] = json!(n);
    }

    UpstreamRequest { url, headers, body }
}

/**
 * \brief Shared HTTP client that performs single chat-completion attempts.
 */
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl UpstreamClient {
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoints })
    }

    /**
     * \brief One POST to one model; returns the first choice's message content.
     */
    pub async fn complete(
        &self,
        provider: Provider,
        model: &str,
        credential: &Credential,
        prompt: &ChatPrompt,
    ) -> Result<String, AttemptError> {
        let v = self.send(provider, model, credential, prompt).await?;
        extract_openai_content(&v).ok_or(AttemptError::MissingContent)
    }

    /**
     * \brief One POST to one model; returns the decoded success body as-is.
     */
    pub async fn send(
        &self,
        provider: Provider,
        model: &str,
        credential: &Credential,
        prompt: &ChatPrompt,
    ) -> Result<Value, AttemptError> {
        let req = build_request(&self.endpoints, provider, model, credential, prompt);

        let mut builder = self.http.post(&req.url);
        for (name, value) in &req.headers {
            builder = builder.header(name.clone(), value);
        }
        let resp = builder.json(&req.body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            return Err(AttemptError::Status {
                status,
                body: text.chars().take(ERROR_BODY_EXCERPT).collect(),
            });
        }

        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| AttemptError::Decode(e.to_string()))
    }
}

/**
 * \brief `choices[0].message.content`, treating an empty string as absent.
 */
pub fn extract_openai_content(v: &Value) -> Option<String> {
    v.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> Credential {
        Credential::from_input(Some("sk-test")).unwrap()
    }

    #[test]
    fn openrouter_request_carries_referer() {
        let prompt = ChatPrompt::system("be brief");
        let req = build_request(
            &Endpoints::default(),
            Provider::OpenRouter,
            "xiaomi/mimo-v2-flash:free",
            &key(),
            &prompt,
        );
        assert_eq!(req.url, "https://openrouter.ai/api/v1/chat/completions");
        assert_eq!(req.header("authorization"), Some("Bearer sk-test"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("http-referer"), Some("http://localhost:3001"));
        assert_eq!(req.headers[0].0, AUTHORIZATION);
        assert_eq!(req.headers[1].0, CONTENT_TYPE);
        assert_eq!(req.body["model"], "xiaomi/mimo-v2-flash:free");
        assert_eq!(req.body["messages"][0]["role"], "system");
        assert!(req.body.get("response_format").is_none());
    }

    #[test]
    fn groq_and_together_have_no_referer() {
        for (provider, url) in [
            (Provider::Groq, "https://api.groq.com/openai/v1/chat/completions"),
            (Provider::Together, "https://api.together.xyz/v1/chat/completions"),
        ] {
            let req = build_request(
                &Endpoints::default(),
                provider,
                "m",
                &key(),
                &ChatPrompt::system("s"),
            );
            assert_eq!(req.url, url);
            assert!(req.header("http-referer").is_none());
        }
    }

    #[test]
    fn json_mode_and_sampling_options_land_in_body() {
        let mut prompt = ChatPrompt::system("rate").with_user("answer").json();
        prompt.temperature = Some(0.5);
        prompt.max_tokens = Some(50);
        let req = build_request(&Endpoints::default(), Provider::Groq, "m", &key(), &prompt);
        assert_eq!(req.body["response_format"]["type"], "json_object");
        assert_eq!(req.body["messages"][1]["content"], "answer");
        assert_eq!(req.body["temperature"], 0.5);
        assert_eq!(req.body["max_tokens"], 50);
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let endpoints = Endpoints {
            groq: "http://127.0.0.1:9000/groq/".to_string(),
            ..Endpoints::default()
        };
        let req = build_request(&endpoints, Provider::Groq, "m", &key(), &ChatPrompt::system("s"));
        assert_eq!(req.url, "http://127.0.0.1:9000/groq/chat/completions");
    }

    #[test]
    fn content_extraction() {
        let ok = json!({"choices": [{"message": {"content": "hi"}}]});
        assert_eq!(extract_openai_content(&ok).as_deref(), Some("hi"));
        let empty = json!({"choices": [{"message": {"content": ""}}]});
        assert_eq!(extract_openai_content(&empty), None);
        assert_eq!(extract_openai_content(&json!({"choices": []})), None);
    }
}
