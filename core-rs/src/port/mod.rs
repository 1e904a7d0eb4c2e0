/**
 * port module
 * Loopback port probing, forward scanning and preferred-port resolution
 */

pub mod probe;
pub mod resolver;
pub mod scan;

pub use probe::{probe, LOOPBACK};
pub use resolver::{
    resolve, resolve_preferred, Resolution, ResolutionReport, Resolver, SWITCH_WINDOW,
};
pub use scan::{scan, scan_default, scan_with, PortRange, DEFAULT_SCAN_ATTEMPTS};
