//! Authentication Request Matcher
//!
//! Decides, from the request path alone, whether a request must carry a
//! session.

use platform::path_pattern::PathPattern;

#[derive(Debug, Clone)]
pub struct AuthenticationRequestMatcher {
    exempt: Vec<PathPattern>,
}

impl AuthenticationRequestMatcher {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            exempt: patterns
                .into_iter()
                .map(|p| PathPattern::new(p.as_ref()))
                .collect(),
        }
    }

    /// True unless `path` matches at least one exempt pattern
    pub fn requires_authentication(&self, path: &str) -> bool {
        !self.exempt.iter().any(|pattern| pattern.matches(path))
    }
}
