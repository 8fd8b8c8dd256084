use std::env;
use std::fmt;
use std::io::{BufRead, Write};

use tracing::debug;
use url::Url;

/// Translator service region used when `TRANSLATOR_REGION` is not set.
const DEFAULT_REGION: &str = "westeurope";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid knowledge base endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("{0} must not be empty")]
    Missing(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Immutable service credentials, resolved once at startup and passed by
/// reference into each client constructor.
///
/// Resolution order per value: environment variable (`KB_ENDPOINT`,
/// `KB_API_KEY`, `TRANSLATOR_API_KEY`, `TRANSLATOR_REGION`) → interactive
/// console prompt. The region falls back to a fixed default instead of
/// prompting.
#[derive(Clone)]
pub struct Credentials {
    pub kb_endpoint: Url,
    pub kb_key: String,
    pub translator_key: String,
    pub translator_region: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("kb_endpoint", &self.kb_endpoint.as_str())
            .field("kb_key", &"[REDACTED]")
            .field("translator_key", &"[REDACTED]")
            .field("translator_region", &self.translator_region)
            .finish()
    }
}

impl Credentials {
    pub fn resolve<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Self, ConfigError> {
        let endpoint = resolve_value(
            input,
            out,
            "KB_ENDPOINT",
            "Please enter the knowledge base endpoint URL:",
        )?;
        let kb_key = resolve_value(
            input,
            out,
            "KB_API_KEY",
            "Please enter the knowledge base API key:",
        )?;
        let translator_key = resolve_value(
            input,
            out,
            "TRANSLATOR_API_KEY",
            "Please enter the translator service key:",
        )?;
        let translator_region = from_env("TRANSLATOR_REGION").unwrap_or_else(|| {
            debug!(region = DEFAULT_REGION, "using default translator region");
            DEFAULT_REGION.to_string()
        });

        Ok(Self {
            kb_endpoint: Url::parse(&endpoint)?,
            kb_key,
            translator_key,
            translator_region,
        })
    }
}

fn from_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn resolve_value<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    name: &'static str,
    prompt: &str,
) -> Result<String, ConfigError> {
    if let Some(value) = from_env(name) {
        debug!(name, "credential taken from environment");
        return Ok(value);
    }
    prompt_value(input, out, name, prompt)
}

fn prompt_value<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    name: &'static str,
    prompt: &str,
) -> Result<String, ConfigError> {
    writeln!(out, "{prompt}")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let value = line.trim();
    if value.is_empty() {
        return Err(ConfigError::Missing(name));
    }
    Ok(value.to_string())
}
