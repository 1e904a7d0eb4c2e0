//! # portscout - loopback port availability
//!
//! Probes TCP ports on 127.0.0.1 and picks a usable port when the preferred
//! one is taken.
//!
//! ## Operations
//!
//! - [`probe`]: bind-and-release check for a single port
//! - [`scan`]: sequential forward scan for the first free port
//! - [`resolve`]: preferred port first, optional auto-switch to a nearby port
//!
//! Probes run one at a time; nothing is cached between calls. A free port
//! reported here can still be taken by another process before the caller
//! binds it.
//!
//! ```no_run
//! # async fn run() {
//! let resolution = portscout::resolve(8080, true).await;
//! match resolution.port() {
//!     Some(port) if resolution.switched() => println!("using {} instead of 8080", port),
//!     Some(port) => println!("using {}", port),
//!     None => eprintln!("{}", resolution),
//! }
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod port;

pub use config::{ResolveConfig, CONFIG_FILE_NAME};
pub use errors::{PortscoutError, Result};
pub use port::{
    probe, resolve, resolve_preferred, scan, scan_default, scan_with, PortRange, Resolution,
    ResolutionReport, Resolver, DEFAULT_SCAN_ATTEMPTS, LOOPBACK, SWITCH_WINDOW,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
