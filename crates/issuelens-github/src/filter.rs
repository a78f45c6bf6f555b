//! Author denylist

/// Logins that open automated dependency-update issues
pub const DEFAULT_DENIED_AUTHORS: [&str; 2] = ["renovate-bot", "forking-renovate[bot]"];

/// Drops issues whose author login contains a denied substring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorFilter {
    denied: Vec<String>,
}

impl AuthorFilter {
    /// Filter with a custom denylist
    pub fn new<I, S>(denied: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            denied: denied.into_iter().map(Into::into).collect(),
        }
    }

    /// Filter that lets every author through
    pub fn allow_all() -> Self {
        Self { denied: Vec::new() }
    }

    /// Whether an issue by `login` should be kept
    pub fn allows(&self, login: &str) -> bool {
        !self.denied.iter().any(|d| login.contains(d.as_str()))
    }

    /// The denied substrings
    pub fn denied(&self) -> &[String] {
        &self.denied
    }
}

impl Default for AuthorFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DENIED_AUTHORS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_denies_renovate() {
        let filter = AuthorFilter::default();
        assert!(!filter.allows("renovate-bot"));
        assert!(!filter.allows("forking-renovate[bot]"));
        assert!(!filter.allows("acme-renovate-bot-2"));
        assert!(filter.allows("octocat"));
        assert!(filter.allows("renovate"));
    }

    #[test]
    fn test_allow_all() {
        let filter = AuthorFilter::allow_all();
        assert!(filter.allows("renovate-bot"));
        assert!(filter.denied().is_empty());
    }
}
