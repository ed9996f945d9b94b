//! Resolution of credential documents from a file, an inline string, or the environment.
//!
//! The signing engine never looks at the environment itself; it only accepts a
//! [`CredentialContext`]. This loader is the collaborator that turns "wherever the credentials
//! live" into that context.

use {
    crate::{constants::*, CredentialContext, SigningError},
    log::debug,
    std::{
        fmt::{Debug, Formatter, Result as FmtResult},
        fs,
        path::PathBuf,
    },
};

/// Function used to look up environment variables.
pub type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves a service account key document with the precedence path > inline JSON > environment.
///
/// The environment is consulted through an injectable lookup function, so tests can supply a
/// fixed mapping instead of mutating the process environment. Within the environment,
/// `GOOGLE_APPLICATION_CREDENTIALS_JSON` (inline JSON) is preferred over
/// `GOOGLE_APPLICATION_CREDENTIALS` (a file path). Empty values count as absent.
pub struct CredentialLoader {
    path: Option<PathBuf>,
    json: Option<String>,
    env_lookup: EnvLookup,
}

impl Default for CredentialLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialLoader {
    /// Create a loader that falls back to the process environment.
    pub fn new() -> Self {
        Self {
            path: None,
            json: None,
            env_lookup: Box::new(|name: &str| std::env::var(name).ok()),
        }
    }

    /// Read the credential document from this file. Takes precedence over everything else.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Use this credential document. Takes precedence over the environment.
    pub fn with_json(mut self, json: impl Into<String>) -> Self {
        self.json = Some(json.into());
        self
    }

    /// Replace the environment lookup.
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env_lookup = Box::new(lookup);
        self
    }

    /// Resolve the credential document text.
    ///
    /// Fails with [`SigningError::Auth`] if no source yields anything, and with
    /// [`SigningError::IO`] if a chosen file cannot be read.
    pub fn resolve_json(&self) -> Result<String, SigningError> {
        if let Some(path) = self.path.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            debug!("Reading credentials from path {}", path.display());
            return Ok(fs::read_to_string(path)?);
        }

        if let Some(json) = self.json.as_ref().filter(|j| !j.trim().is_empty()) {
            debug!("Using inline credentials");
            return Ok(json.clone());
        }

        if let Some(json) = self.env_var(ENV_CREDENTIALS_JSON) {
            debug!("Using credentials from {}", ENV_CREDENTIALS_JSON);
            return Ok(json);
        }

        if let Some(path) = self.env_var(ENV_CREDENTIALS_PATH) {
            debug!("Reading credentials from {}={}", ENV_CREDENTIALS_PATH, path);
            return Ok(fs::read_to_string(path)?);
        }

        Err(SigningError::Auth(format!(
            "No credentials found: supply a path, inline JSON, or set {} or {}",
            ENV_CREDENTIALS_JSON, ENV_CREDENTIALS_PATH
        )))
    }

    /// Resolve the credential document and build a [`CredentialContext`] from it.
    pub fn load(&self) -> Result<CredentialContext, SigningError> {
        CredentialContext::from_json(&self.resolve_json()?)
    }

    fn env_var(&self, name: &str) -> Option<String> {
        (self.env_lookup)(name).filter(|value| !value.trim().is_empty())
    }
}

impl Debug for CredentialLoader {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CredentialLoader")
            .field("path", &self.path)
            .field("json", &self.json.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use {
        crate::{CredentialLoader, SigningError},
        std::collections::HashMap,
    };

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test_log::test]
    fn test_nothing_resolvable() {
        let loader = CredentialLoader::new().with_env_lookup(no_env);
        match loader.resolve_json() {
            Err(SigningError::Auth(msg)) => assert!(msg.starts_with("No credentials found")),
            other => panic!("Expected Auth error; got {:?}", other),
        }

        match loader.load() {
            Err(SigningError::Auth(_)) => (),
            other => panic!("Expected Auth error; got {:?}", other),
        }

        // Empty values are treated as absent.
        let loader = CredentialLoader::new().with_json("  ").with_path("").with_env_lookup(|_| Some(String::new()));
        assert!(matches!(loader.resolve_json(), Err(SigningError::Auth(_))));
    }

    #[test_log::test]
    fn test_inline_beats_environment() {
        let loader = CredentialLoader::new().with_json("{\"inline\": true}").with_env_lookup(|_| Some("{}".to_string()));
        assert_eq!(loader.resolve_json().unwrap(), "{\"inline\": true}");
    }

    #[test_log::test]
    fn test_environment_json_beats_environment_path() {
        let env: HashMap<&str, &str> = [
            ("GOOGLE_APPLICATION_CREDENTIALS_JSON", "{\"env\": true}"),
            ("GOOGLE_APPLICATION_CREDENTIALS", "/does/not/exist.json"),
        ]
        .into_iter()
        .collect();
        let loader = CredentialLoader::new().with_env_lookup(move |name| env.get(name).map(|v| v.to_string()));
        assert_eq!(loader.resolve_json().unwrap(), "{\"env\": true}");
    }

    #[test_log::test]
    fn test_path_beats_inline() {
        let loader = CredentialLoader::new()
            .with_path("/does/not/exist/credentials.json")
            .with_json("{\"inline\": true}")
            .with_env_lookup(no_env);
        match loader.resolve_json() {
            Err(SigningError::IO(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("Expected IO error; got {:?}", other),
        }
    }

    #[test_log::test]
    fn test_debug_redacts_json() {
        let loader = CredentialLoader::new().with_json("{\"private_key\": \"secret\"}");
        let debug = format!("{:?}", loader);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
