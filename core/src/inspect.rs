//! Queries against the scanning machine's own network identity.
//!
//! nmap omits the MAC address of the host it runs on, so the report parser
//! asks this module for the local IP and MAC instead. Everything here is
//! best effort: a failed lookup degrades to `None` and never fails a scan.

use std::net::UdpSocket;
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

/// Six colon-separated groups of one or two hex digits, case-insensitive.
static MAC_PATTERN: OnceLock<Regex> = OnceLock::new();

fn mac_pattern() -> &'static Regex {
    MAC_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)([0-9a-f]{1,2}:){5}[0-9a-f]{1,2}").expect("mac pattern is valid")
    })
}

/// Answers "who am I on the network" questions for one scan session.
///
/// The seam exists so report parsing can be tested deterministically
/// without running any OS commands.
pub trait LocalNetworkInspector {
    /// The IP address this machine uses to reach the wider network,
    /// memoized for the lifetime of the inspector.
    fn local_ip(&self) -> Option<String>;

    /// The MAC address of `interface`, or of the interface carrying
    /// [`Self::local_ip`] when none is given. Normalized to uppercase,
    /// memoized, absent when nothing matched.
    fn local_mac(&self, interface: Option<&str>) -> Option<String>;
}

/// [`LocalNetworkInspector`] that shells out to the OS network utilities
/// (`netstat -i` for the interface table, `ifconfig` for its configuration).
/// It never sends or receives scan traffic itself.
#[derive(Default)]
pub struct SystemInspector {
    ip: OnceLock<Option<String>>,
    mac: OnceLock<Option<String>>,
}

impl SystemInspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The kernel picks the outgoing source address when a UDP socket is
    /// connected; nothing is actually sent.
    fn detect_ip() -> Option<String> {
        let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
        socket.connect(("8.8.8.8", 53)).ok()?;
        Some(socket.local_addr().ok()?.ip().to_string())
    }

    fn interface_table() -> Option<String> {
        let output = Command::new("netstat").arg("-i").output().ok()?;
        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn interface_config(interface: Option<&str>) -> Option<String> {
        let mut command = Command::new("ifconfig");
        if let Some(name) = interface {
            command.arg(name);
        }
        let output = command.output().ok()?;
        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl LocalNetworkInspector for SystemInspector {
    fn local_ip(&self) -> Option<String> {
        self.ip.get_or_init(Self::detect_ip).clone()
    }

    fn local_mac(&self, interface: Option<&str>) -> Option<String> {
        self.mac
            .get_or_init(|| {
                let resolved: Option<String> = match interface {
                    Some(name) => Some(name.to_string()),
                    None => self.local_ip().and_then(|ip| {
                        Self::interface_table()
                            .and_then(|table| interface_for_ip(&table, &ip))
                    }),
                };
                let mac = first_mac(&Self::interface_config(resolved.as_deref())?);
                debug!(interface = ?resolved, mac = ?mac, "resolved local MAC address");
                mac
            })
            .clone()
    }
}

/// The first interface-table line mentioning `ip` names the interface in
/// its leading column.
fn interface_for_ip(table: &str, ip: &str) -> Option<String> {
    table
        .lines()
        .find(|line| line.contains(ip))
        .and_then(|line| line.split_whitespace().next())
        .map(str::to_string)
}

/// First MAC-looking token in the interface configuration output.
fn first_mac(config: &str) -> Option<String> {
    mac_pattern()
        .find(config)
        .map(|found| found.as_str().to_uppercase())
}
