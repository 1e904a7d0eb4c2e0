/**
 * scan.rs
 * Sequential forward scan for the first available port
 *
 * Candidates: start, start+1, ..., start+max_attempts-1
 * - Strictly ascending, one probe at a time
 * - Stops at the first available port
 * - Clamped at 65535 (no wrap-around)
 */

use std::fmt;
use std::future::Future;
use std::ops::RangeInclusive;
use tracing::debug;

use super::probe::probe;

/// Default number of ports a scan covers
pub const DEFAULT_SCAN_ATTEMPTS: u16 = 50;

/// Inclusive range of ports covered by a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
}

impl PortRange {
    /// Range of `attempts` ports beginning at `start`, clamped at 65535
    ///
    /// # Returns
    /// None when `attempts` is zero
    pub fn from_start(start: u16, attempts: u16) -> Option<Self> {
        if attempts == 0 {
            return None;
        }
        let end = (u32::from(start) + u32::from(attempts) - 1).min(u32::from(u16::MAX));
        Some(PortRange {
            start,
            end: end as u16,
        })
    }

    /// Check if port is within this range
    pub fn contains(&self, port: u16) -> bool {
        port >= self.start && port <= self.end
    }

    /// Number of ports in the range
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            usize::from(self.end - self.start) + 1
        }
    }

    /// True when `end` is below `start`
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Ports in ascending order
    pub fn ports(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Find the first available port at or after `start`
///
/// # Arguments
/// * `start` - First port to probe
/// * `max_attempts` - Number of consecutive ports to try
///
/// # Returns
/// First available port, or None if every probe failed
pub async fn scan(start: u16, max_attempts: u16) -> Option<u16> {
    scan_with(start, max_attempts, probe).await
}

/// `scan` with the default attempt budget
pub async fn scan_default(start: u16) -> Option<u16> {
    scan(start, DEFAULT_SCAN_ATTEMPTS).await
}

/// Scan using a caller-supplied probe
///
/// Each probe is awaited before the next port is tried. The task yields
/// before every candidate so an enclosing `tokio::time::timeout` can fire
/// mid-scan.
pub async fn scan_with<F, Fut>(start: u16, max_attempts: u16, mut probe_fn: F) -> Option<u16>
where
    F: FnMut(u16) -> Fut,
    Fut: Future<Output = bool>,
{
    let range = PortRange::from_start(start, max_attempts)?;

    for port in range.ports() {
        tokio::task::yield_now().await;
        if probe_fn(port).await {
            debug!(port, range = %range, "scan found available port");
            return Some(port);
        }
    }

    debug!(range = %range, "scan exhausted");
    None
}
