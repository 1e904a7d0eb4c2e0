// Port Resolution Contract Tests
//
// These tests verify INVARIANTS of probe/scan/resolve that callers depend on.
// Each test documents what breaks downstream if the invariant changes.
//
// Real sockets are bound on 127.0.0.1:0 to create occupied ports. Tests that
// need a specific layout of free and busy ports use a substituted probe.

use std::collections::HashSet;
use std::future::ready;

use portscout::{probe, resolve, scan, scan_with, Resolution, Resolver, DEFAULT_SCAN_ATTEMPTS};
use tokio::net::TcpListener;

async fn occupy() -> (TcpListener, u16) {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

async fn free_port() -> u16 {
    let (listener, port) = occupy().await;
    drop(listener);
    port
}

/// Resolve 8080 against a simulated host where `busy` ports are taken
async fn resolve_simulated(busy: &HashSet<u16>, auto_switch: bool) -> Resolution {
    Resolver::default()
        .resolve_with(8080, auto_switch, |port| ready(!busy.contains(&port)))
        .await
}

/// WHY: Probe must report free ports as free and held ports as taken
/// BREAKS: Every caller decision built on top of probe
#[tokio::test]
async fn probe_reflects_socket_occupancy() {
    let port = free_port().await;
    assert!(probe(port).await, "free port {} reported busy", port);

    let (_held, busy) = occupy().await;
    assert!(!probe(busy).await, "held port {} reported free", busy);
}

/// WHY: Probe must release its socket before returning
/// BREAKS: Second probe (and the caller's own bind) would fail on a leaked socket
#[tokio::test]
async fn probe_is_idempotent_on_free_port() {
    let port = free_port().await;

    assert!(probe(port).await);
    assert!(probe(port).await);
}

/// WHY: Scan stops at the first free port and never probes beyond it
/// BREAKS: Deterministic port choice; extra probes transiently occupy ports
#[tokio::test]
async fn scan_returns_first_free_in_ascending_order() {
    let start = 20000u16;
    let first_free = start + 7;
    let mut probed = Vec::new();

    let found = scan_with(start, DEFAULT_SCAN_ATTEMPTS, |port| {
        probed.push(port);
        ready(port == first_free || port == first_free + 3)
    })
    .await;

    assert_eq!(found, Some(first_free));
    assert_eq!(probed, (start..=first_free).collect::<Vec<_>>());
    assert!(probed.iter().all(|&p| p <= first_free));
}

/// WHY: Scan reports failure when the whole range is occupied
/// BREAKS: Callers would be handed a port that is in use
#[tokio::test]
async fn scan_exhaustion_returns_none() {
    let mut count = 0u16;
    let found = scan_with(20000, 10, |_| {
        count += 1;
        ready(false)
    })
    .await;

    assert_eq!(found, None);
    assert_eq!(count, 10, "every port in the range must be probed exactly once");
}

/// WHY: A scan over a single held port reports nothing free
#[tokio::test]
async fn scan_of_single_held_port_is_none() {
    let (_held, busy) = occupy().await;

    assert_eq!(scan(busy, 1).await, None);
}

/// WHY: Scan on real sockets must step over held ports to the next free one
/// BREAKS: Callers would be handed a port another listener owns
#[tokio::test]
async fn scan_skips_adjacent_held_ports() {
    let (_first, busy) = occupy().await;
    if busy > u16::MAX - 2 {
        eprintln!("Ephemeral port {} too close to 65535; skipping.", busy);
        return;
    }
    let Ok(_second) = TcpListener::bind(("127.0.0.1", busy + 1)).await else {
        eprintln!("Port {} already taken; skipping.", busy + 1);
        return;
    };

    match scan(busy, 3).await {
        Some(port) => assert_eq!(port, busy + 2),
        None => eprintln!("Port {} already taken; skipping.", busy + 2),
    }
}

/// WHY: A free preferred port is used as-is
#[tokio::test]
async fn resolve_available_preferred() {
    let resolution = resolve_simulated(&HashSet::new(), true).await;

    assert_eq!(resolution.port(), Some(8080));
    assert!(!resolution.switched());
    assert_eq!(resolution.message(), None);

    let report = resolution.report();
    assert_eq!((report.port, report.switched), (8080, false));
}

/// WHY: With auto-switch off a busy preferred port is a failure, not a switch
/// BREAKS: Callers that pinned their port would silently move
#[tokio::test]
async fn resolve_busy_without_auto_switch_fails() {
    let busy: HashSet<u16> = [8080].into_iter().collect();
    let resolution = resolve_simulated(&busy, false).await;

    let report = resolution.report();
    assert_eq!(report.port, -1);
    assert!(!report.switched);
    assert!(report.message.unwrap().contains("8080"));
}

/// WHY: Auto-switch moves to the next free port and says so
#[tokio::test]
async fn resolve_busy_with_auto_switch_switches() {
    let busy: HashSet<u16> = [8080].into_iter().collect();
    let resolution = resolve_simulated(&busy, true).await;

    let report = resolution.report();
    assert_eq!(report.port, 8081);
    assert!(report.switched);
    let message = report.message.unwrap();
    assert!(message.contains("8080"));
    assert!(message.contains("8081"));
}

/// WHY: Exhausted switch window is a failure and the message names the window
/// BREAKS: Message would misreport which ports were tried
#[tokio::test]
async fn resolve_exhausted_window_names_range() {
    let busy: HashSet<u16> = (8080..=8130).collect();
    let resolution = resolve_simulated(&busy, true).await;

    let report = resolution.report();
    assert_eq!(report.port, -1);
    assert!(!report.switched);
    assert!(report.message.unwrap().contains("8081-8130"));
}

/// WHY: Port just past the switch window is never considered
#[tokio::test]
async fn resolve_does_not_look_past_window() {
    let busy: HashSet<u16> = (8080..=8130).collect();
    let mut probed = Vec::new();

    let resolution = Resolver::default()
        .resolve_with(8080, true, |port| {
            probed.push(port);
            ready(!busy.contains(&port))
        })
        .await;

    assert!(!resolution.is_resolved());
    assert_eq!(probed.last(), Some(&8130));
}

/// WHY: End-to-end on real sockets, a held preferred port is never returned
#[tokio::test]
async fn resolve_never_returns_held_port() {
    let (_held, busy) = occupy().await;

    let resolution = resolve(busy, true).await;
    assert_ne!(resolution.port(), Some(busy));

    let resolution = resolve(busy, false).await;
    assert_eq!(resolution.port(), None);
}
