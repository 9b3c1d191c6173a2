//! # nmapx
//!
//! A thin library facade over the external `nmap` executable. All scanning
//! intelligence lives in the binary itself; this crate builds the command
//! line, runs the process with a timeout, and maps the XML report it
//! produces into plain domain entities.
//!
//! ## Module Overview
//! * **[`config`]**: Immutable scan configuration built fluently by value.
//! * **[`command`]**: Translates a configuration into the nmap argument vector.
//! * **[`process`]**: The subprocess port and its tokio-backed implementation.
//! * **[`report`]**: Maps the XML report into [`host::Host`] entities.
//! * **[`inspect`]**: Best-effort queries against the local machine's own
//!   network identity, used only to patch in the scanning host's MAC.
//! * **[`scanner`]**: The session object tying the pieces together.

pub mod command;
pub mod config;
pub mod error;
pub mod host;
pub mod inspect;
pub mod process;
pub mod report;
pub mod scanner;

pub use config::ScanConfig;
pub use error::{Result, ScanError};
pub use host::{Host, Hostname, Port, Service};
pub use inspect::{LocalNetworkInspector, SystemInspector};
pub use process::{ProcessRunner, SystemRunner};
pub use scanner::Nmap;
