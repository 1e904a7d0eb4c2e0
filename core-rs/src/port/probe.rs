/**
 * probe.rs
 * Single-port availability check on the loopback interface
 *
 * A port is "available" when a listening socket can be bound to
 * 127.0.0.1:<port>. The listener is dropped before the probe returns,
 * so the port is only held for the duration of the check.
 *
 * Check-then-use is racy: another process may take the port between
 * the probe returning and the caller binding it.
 */

use std::net::{Ipv4Addr, SocketAddrV4};
use tokio::net::TcpListener;
use tracing::debug;

/// Address every probe binds to. Probes never touch external interfaces.
pub const LOOPBACK: Ipv4Addr = Ipv4Addr::LOCALHOST;

/// Test if a port is available on the loopback interface
///
/// Any bind error (address in use, permission denied, ...) is reported
/// as `false`; the error kind is only logged.
///
/// # Example
/// ```no_run
/// # async fn run() {
/// if portscout::probe(8080).await {
///     println!("8080 is free");
/// }
/// # }
/// ```
pub async fn probe(port: u16) -> bool {
    match TcpListener::bind(SocketAddrV4::new(LOOPBACK, port)).await {
        Ok(listener) => {
            drop(listener);
            debug!(port, "port available");
            true
        }
        Err(e) => {
            debug!(port, error = %e, kind = ?e.kind(), "port unavailable");
            false
        }
    }
}
