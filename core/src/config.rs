//! # Configuration
//!
//! Knobs for a proof session. Defaults can be overridden from the
//! environment with `MPF_SEARCH_DEPTH` and `MPF_EXTEND_SEARCH`.

/// Number of rounds the default logic search runs before giving up.
pub const DEFAULT_SEARCH_DEPTH: usize = 4;

/// Configuration of a `System`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Depth bound of every default `LogicSearch`.
    pub search_depth: usize,
    /// Add rules created by `System::define` to the default searches.
    pub extend_search_on_define: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            search_depth: DEFAULT_SEARCH_DEPTH,
            extend_search_on_define: true,
        }
    }
}

impl Config {
    /// Default configuration, overridden by environment variables.
    pub fn from_env() -> Self {
        let mut c = Config::default();
        if let Some(n) = env_parse("MPF_SEARCH_DEPTH") {
            c.search_depth = n;
        }
        if let Some(b) = env_parse("MPF_EXTEND_SEARCH") {
            c.extend_search_on_define = b;
        }
        crate::logdebug!("config from env: {:?}", c);
        c
    }

    /// Change the search depth.
    pub fn search_depth(mut self, n: usize) -> Self {
        self.search_depth = n;
        self
    }

    pub fn extend_search_on_define(mut self, b: bool) -> Self {
        self.extend_search_on_define = b;
        self
    }
}

fn env_parse<T: std::str::FromStr>(var: &str) -> Option<T> {
    std::env::var(var).ok().and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_builder() {
        let c = Config::default().search_depth(2).extend_search_on_define(false);
        assert_eq!(c.search_depth, 2);
        assert!(!c.extend_search_on_define);
        assert_eq!(Config::default().search_depth, DEFAULT_SEARCH_DEPTH);
    }

    #[test]
    fn test_env_parse() {
        std::env::set_var("MPF_TEST_CONFIG_DEPTH", " 7 ");
        assert_eq!(env_parse::<usize>("MPF_TEST_CONFIG_DEPTH"), Some(7));
        std::env::set_var("MPF_TEST_CONFIG_DEPTH", "seven");
        assert_eq!(env_parse::<usize>("MPF_TEST_CONFIG_DEPTH"), None);
        assert_eq!(env_parse::<bool>("MPF_TEST_CONFIG_UNSET"), None);
    }
}
