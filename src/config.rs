use http::Uri;
use std::{env, str::FromStr, time::Duration};
use tracing::warn;

use crate::error::AppError;

/// Where diagnostic records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Console,
    Tracing,
}

impl FromStr for SinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" | "stdout" => Ok(SinkKind::Console),
            "tracing" | "log" => Ok(SinkKind::Tracing),
            other => Err(other.to_string()),
        }
    }
}

/// Settings for the outbound client.
#[derive(Debug, Clone)]
pub struct ForwardConfig {
    /// Limit on connecting and receiving the response head. The body is not
    /// bounded, so long downloads and streams are relayed in full.
    pub timeout: Duration,
    pub pool_idle_timeout: Duration,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub host: String,
    pub worker_threads: usize,
    pub upstream: Option<Uri>,
    pub forward: ForwardConfig,
    pub sinks: Vec<SinkKind>,
}

impl AppConfig {
    /// Reads the process environment. `main` loads `.env` into it beforehand.
    pub fn new() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let upstream = match lookup("UPSTREAM_URL").filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(parse_upstream(raw.trim())?),
            None => None,
        };

        let sinks = match lookup("DIAGNOSTIC_SINKS") {
            Some(raw) => parse_sinks(&raw),
            None => vec![SinkKind::Console],
        };

        let worker_threads = parse_or(&lookup, "WORKER_THREADS", num_cpus::get()).max(1);

        Ok(Self {
            port: parse_or(&lookup, "PORT", 3000),
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            worker_threads,
            upstream,
            forward: ForwardConfig {
                timeout: Duration::from_secs(parse_or(&lookup, "FORWARD_TIMEOUT_SECS", 30)),
                pool_idle_timeout: Duration::from_secs(parse_or(
                    &lookup,
                    "POOL_IDLE_TIMEOUT_SECS",
                    30,
                )),
            },
            sinks,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display + Copy,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        None => default,
    }
}

/// An upstream is a scheme, an authority and an optional path prefix. A query
/// or fragment cannot be joined with request paths, so both are refused.
fn parse_upstream(raw: &str) -> Result<Uri, AppError> {
    let invalid = || AppError::InvalidUpstream(raw.to_string());
    if raw.contains('#') {
        return Err(invalid());
    }

    let uri: Uri = raw.parse().map_err(|_| invalid())?;
    match (uri.scheme_str(), uri.authority()) {
        (Some("http") | Some("https"), Some(_)) if uri.query().is_none() => Ok(uri),
        _ => Err(invalid()),
    }
}

fn parse_sinks(raw: &str) -> Vec<SinkKind> {
    let mut sinks = Vec::new();
    for part in raw.split(',').filter(|p| !p.trim().is_empty()) {
        match part.parse::<SinkKind>() {
            Ok(kind) if !sinks.contains(&kind) => sinks.push(kind),
            Ok(_) => {}
            Err(unknown) => warn!("Ignoring unknown diagnostic sink '{}'", unknown),
        }
    }
    sinks
}
