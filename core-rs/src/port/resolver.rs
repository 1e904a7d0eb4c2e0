/**
 * resolver.rs
 * Preferred-port resolution with optional auto-switch
 *
 * Outcomes:
 * - Preferred port free                 → Direct
 * - Busy, auto-switch disabled          → InUse
 * - Busy, free port in switch window    → Switched
 * - Busy, whole switch window occupied  → Exhausted
 *
 * The switch window starts at preferred+1 and covers `switch_window` ports.
 * The same value drives the scan and the range shown in the message.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use tracing::debug;

use super::probe::probe;
use super::scan::{scan_with, PortRange, DEFAULT_SCAN_ATTEMPTS};

/// Ports scanned after a busy preferred port
pub const SWITCH_WINDOW: u16 = DEFAULT_SCAN_ATTEMPTS;

/// Outcome of resolving a preferred port
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Preferred port is available
    Direct { port: u16 },
    /// Preferred port is busy and auto-switch is disabled
    InUse { requested: u16 },
    /// Preferred port is busy; switched to the first free port after it
    Switched { requested: u16, port: u16 },
    /// Preferred port is busy and nothing in the switch window is free.
    /// `range` is None when no port follows the preferred one.
    Exhausted {
        requested: u16,
        range: Option<PortRange>,
    },
}

impl Resolution {
    /// Port to use, or None if resolution failed
    pub fn port(&self) -> Option<u16> {
        match *self {
            Resolution::Direct { port } | Resolution::Switched { port, .. } => Some(port),
            Resolution::InUse { .. } | Resolution::Exhausted { .. } => None,
        }
    }

    /// Port the caller asked for
    pub fn requested(&self) -> u16 {
        match *self {
            Resolution::Direct { port } => port,
            Resolution::InUse { requested }
            | Resolution::Switched { requested, .. }
            | Resolution::Exhausted { requested, .. } => requested,
        }
    }

    /// True when the returned port differs from the requested one
    pub fn switched(&self) -> bool {
        matches!(self, Resolution::Switched { .. })
    }

    pub fn is_resolved(&self) -> bool {
        self.port().is_some()
    }

    /// Human-readable explanation, present only on switch or failure
    ///
    /// Informational only; branch on `port()` and `switched()` instead.
    pub fn message(&self) -> Option<String> {
        match self {
            Resolution::Direct { .. } => None,
            Resolution::InUse { requested } => Some(format!(
                "Port {} is already in use. Change the configured port or enable auto-switch.",
                requested
            )),
            Resolution::Switched { requested, port } => Some(format!(
                "Port {} is in use, automatically switched to {}.",
                requested, port
            )),
            Resolution::Exhausted {
                requested,
                range: Some(range),
            } => Some(format!(
                "Port {} is in use and no available ports found in range {}.",
                requested, range
            )),
            Resolution::Exhausted {
                requested,
                range: None,
            } => Some(format!(
                "Port {} is in use and no available ports found after {}.",
                requested, requested
            )),
        }
    }

    /// Flattened `{port, switched, message}` record, port -1 on failure
    pub fn report(&self) -> ResolutionReport {
        ResolutionReport {
            port: self.port().map(i32::from).unwrap_or(-1),
            switched: self.switched(),
            message: self.message(),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => f.write_str(&message),
            None => write!(f, "Port {} is available.", self.requested()),
        }
    }
}

/// Serializable resolution record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub port: i32,
    pub switched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Resolves preferred ports against the loopback interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolver {
    switch_window: u16,
}

impl Default for Resolver {
    fn default() -> Self {
        Resolver {
            switch_window: SWITCH_WINDOW,
        }
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver scanning `switch_window` ports after a busy preferred port
    ///
    /// A window of 0 is raised to 1; a busy preferred port always gets at
    /// least one candidate after it.
    pub fn with_switch_window(switch_window: u16) -> Self {
        Resolver {
            switch_window: switch_window.max(1),
        }
    }

    pub fn switch_window(&self) -> u16 {
        self.switch_window
    }

    /// Resolve `preferred`, probing real sockets
    pub async fn resolve(&self, preferred: u16, auto_switch: bool) -> Resolution {
        self.resolve_with(preferred, auto_switch, probe).await
    }

    /// Resolve `preferred` using a caller-supplied probe
    pub async fn resolve_with<F, Fut>(
        &self,
        preferred: u16,
        auto_switch: bool,
        mut probe_fn: F,
    ) -> Resolution
    where
        F: FnMut(u16) -> Fut,
        Fut: Future<Output = bool>,
    {
        if probe_fn(preferred).await {
            debug!(port = preferred, "preferred port available");
            return Resolution::Direct { port: preferred };
        }

        if !auto_switch {
            debug!(port = preferred, "preferred port in use, auto-switch disabled");
            return Resolution::InUse {
                requested: preferred,
            };
        }

        let range = preferred
            .checked_add(1)
            .and_then(|start| PortRange::from_start(start, self.switch_window));

        let found = match range {
            Some(range) => scan_with(range.start, self.switch_window, &mut probe_fn).await,
            None => None,
        };

        match found {
            Some(port) => {
                debug!(requested = preferred, port, "preferred port in use, switched");
                Resolution::Switched {
                    requested: preferred,
                    port,
                }
            }
            None => {
                debug!(requested = preferred, "no available port in switch window");
                Resolution::Exhausted {
                    requested: preferred,
                    range,
                }
            }
        }
    }
}

/// Resolve `preferred` with the default switch window
pub async fn resolve(preferred: u16, auto_switch: bool) -> Resolution {
    Resolver::default().resolve(preferred, auto_switch).await
}

/// `resolve` with auto-switch enabled
pub async fn resolve_preferred(preferred: u16) -> Resolution {
    resolve(preferred, true).await
}
