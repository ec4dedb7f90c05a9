use std::env;
use std::fmt;

/// Runtime environment, read from `NODE_ENV`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppEnv {
    #[default]
    Development,
    Production,
    Test,
}

impl AppEnv {
    /// Reads `NODE_ENV`. Missing or unrecognized values fall back to
    /// [`AppEnv::Development`] with a warning.
    pub fn from_env() -> Self {
        let (env, unknown) = Self::resolve(env::var("NODE_ENV").ok().as_deref());
        if let Some(value) = unknown {
            warn_unknown(&value);
        }
        env
    }

    /// Resolves a raw `NODE_ENV` value without logging. An unrecognized value
    /// is handed back next to the fallback so it can be reported once a
    /// subscriber is installed.
    pub fn resolve(value: Option<&str>) -> (Self, Option<String>) {
        match value {
            Some(value) => match Self::parse(value) {
                Some(env) => (env, None),
                None => (AppEnv::Development, Some(value.to_string())),
            },
            None => (AppEnv::Development, None),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" => Some(AppEnv::Development),
            "production" => Some(AppEnv::Production),
            "test" => Some(AppEnv::Test),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppEnv::Development => "development",
            AppEnv::Production => "production",
            AppEnv::Test => "test",
        }
    }

    pub fn is_production(&self) -> bool {
        *self == AppEnv::Production
    }

    pub fn is_development(&self) -> bool {
        *self == AppEnv::Development
    }
}

pub fn warn_unknown(value: &str) {
    tracing::warn!(node_env = %value, "Unknown NODE_ENV, using development");
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
