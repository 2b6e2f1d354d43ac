use std::fmt;

/**
 * \brief Caller-supplied API key, passed through unmodified to the upstream
 * `Authorization` header. Never stored and never logged.
 */
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /**
     * \brief Accepts the raw request field; missing or empty keys are absent.
     * Whitespace is not trimmed; `"  "` is a key like any other.
     */
    pub fn from_input(raw: Option<&str>) -> Option<Self> {
        raw.filter(|k| !k.is_empty())
            .map(|k| Credential(k.to_string()))
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_empty_keys_are_absent() {
        assert!(Credential::from_input(None).is_none());
        assert!(Credential::from_input(Some("")).is_none());
    }

    #[test]
    fn whitespace_key_is_present() {
        let cred = Credential::from_input(Some("   ")).unwrap();
        assert_eq!(cred.bearer(), "Bearer    ");
    }

    #[test]
    fn key_is_passed_through_unmodified() {
        let cred = Credential::from_input(Some(" sk-or-v1 ")).unwrap();
        assert_eq!(cred.bearer(), "Bearer  sk-or-v1 ");
    }

    #[test]
    fn debug_output_is_redacted() {
        let cred = Credential::from_input(Some("sk-secret")).unwrap();
        assert!(!format!("{cred:?}").contains("sk-secret"));
    }
}
