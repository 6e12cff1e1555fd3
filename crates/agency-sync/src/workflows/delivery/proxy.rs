use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::transport::HttpTransport;
use crate::config::{ConfigError, GeneralSettings};

/// Line after which the proxy auto-config document lists the egress proxies.
pub const DISCOVERY_MARKER: &str =
    "//******   Use the Standard Zscaler proxies if not internal or exception   ******";

static STRIP_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

/// How outbound requests pick their egress proxies for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyMode {
    None,
    System,
    Discover,
}

impl FromStr for ProxyMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "system" => Ok(Self::System),
            "zscaler" | "discover" => Ok(Self::Discover),
            other => Err(format!(
                "unknown proxy mode '{other}', expected zscaler, system or none"
            )),
        }
    }
}

impl fmt::Display for ProxyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProxyMode::None => "none",
            ProxyMode::System => "system",
            ProxyMode::Discover => "zscaler",
        };
        f.write_str(label)
    }
}

/// Resolved egress for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyRoute {
    /// One attempt without a proxy.
    Direct,
    /// One attempt per candidate, in order. An empty list means no attempt at all.
    Candidates(Vec<String>),
}

impl ProxyRoute {
    pub fn resolve(
        mode: ProxyMode,
        settings: &GeneralSettings,
        transport: &dyn HttpTransport,
    ) -> Result<Self, ConfigError> {
        match mode {
            ProxyMode::None => Ok(Self::Direct),
            ProxyMode::System => {
                let proxy = settings
                    .proxy_ip
                    .clone()
                    .ok_or(ConfigError::MissingSetting("settings.proxy_ip"))?;
                Ok(Self::Candidates(vec![proxy]))
            }
            ProxyMode::Discover => {
                let url = settings
                    .proxy_discovery_url
                    .as_deref()
                    .ok_or(ConfigError::MissingSetting("settings.proxy_discovery_url"))?;
                Ok(Self::Candidates(discover(url, transport)))
            }
        }
    }
}

fn discover(url: &str, transport: &dyn HttpTransport) -> Vec<String> {
    let document = match transport.get_text(url) {
        Ok(document) => document,
        Err(err) => {
            tracing::error!(%url, error = %err, "proxy discovery request failed");
            return Vec::new();
        }
    };
    tracing::debug!(%url, "proxy discovery document received");

    let proxies = parse_discovery_document(&document);
    if proxies.is_empty() {
        tracing::error!(
            %url,
            "no proxies found in discovery document, the document format may have changed"
        );
    }
    proxies
}

/// Extracts `PROXY host:port` entries from the first non-empty line after the marker.
pub fn parse_discovery_document(document: &str) -> Vec<String> {
    let Some(strip) = STRIP_PATTERN
        .get_or_init(|| Regex::new(r#"\s|[;}"]|DIRECT|return"#).ok())
        .as_ref()
    else {
        tracing::error!("proxy strip pattern failed to compile");
        return Vec::new();
    };

    let mut lines = document.lines();
    if !lines.any(|line| line.contains(DISCOVERY_MARKER)) {
        return Vec::new();
    }

    for line in lines {
        let stripped = strip.replace_all(line, "");
        if stripped.is_empty() {
            continue;
        }
        tracing::debug!(line = %stripped, "proxy list line found");
        return stripped
            .split("PROXY")
            .filter(|candidate| !candidate.is_empty())
            .map(str::to_string)
            .collect();
    }

    Vec::new()
}
