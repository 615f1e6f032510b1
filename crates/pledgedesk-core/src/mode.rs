//! Backend mode selection.
//!
//! The dashboard runs either against the real API (`Networked`) or fully in
//! process (`Simulated`) on preview and local hosts. The choice is resolved
//! once per process and then passed down, so every component of a running
//! instance agrees on which backend is active.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Hostname fragment of preview deployments
const PREVIEW_HOST_PATTERN: &str = "vercel.app";

/// Loopback hosts that indicate a local run
const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1"];

static PROCESS_MODE: OnceLock<Mode> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Networked,
    Simulated,
}

impl Mode {
    /// Decide the mode from host signals.
    ///
    /// Preview hosts, loopback hosts, development builds and runs with no
    /// host at all get the simulated backend.
    pub fn detect(signals: &HostSignals) -> Mode {
        if signals.development {
            return Mode::Simulated;
        }
        match signals.hostname.as_deref() {
            None => Mode::Simulated,
            Some(host) => {
                let host = host.to_ascii_lowercase();
                if host.contains(PREVIEW_HOST_PATTERN) || LOCAL_HOSTS.contains(&host.as_str()) {
                    Mode::Simulated
                } else {
                    Mode::Networked
                }
            }
        }
    }

    pub fn is_simulated(self) -> bool {
        self == Mode::Simulated
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Networked => "networked",
            Mode::Simulated => "simulated",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "networked" | "network" | "live" => Ok(Mode::Networked),
            "simulated" | "simulation" | "preview" | "mock" => Ok(Mode::Simulated),
            other => Err(format!("unknown mode: {}", other)),
        }
    }
}

/// Host facts the mode is derived from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSignals {
    pub hostname: Option<String>,
    pub development: bool,
}

/// Resolve the process-wide mode, evaluating `decide` only on the first call.
///
/// Later calls return the memoized value and ignore their closure.
pub fn resolve_once(decide: impl FnOnce() -> Mode) -> Mode {
    *PROCESS_MODE.get_or_init(|| {
        let mode = decide();
        info!(%mode, "Backend mode resolved");
        mode
    })
}

/// The mode resolved for this process, if any
pub fn resolved() -> Option<Mode> {
    PROCESS_MODE.get().copied()
}
