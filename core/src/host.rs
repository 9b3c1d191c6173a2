//! Entities parsed out of an nmap XML report.
//!
//! All of them are plain immutable values: constructed once by the report
//! parser and handed back to the caller as-is. States are carried as the
//! literal strings nmap emitted, with predicates for the well-known ones.

/// One scanned network endpoint and its discovered attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// IP literal taken from the report's address entries.
    pub address: String,
    /// Host state as reported, typically [`Host::STATE_UP`] or
    /// [`Host::STATE_DOWN`].
    pub state: String,
    pub hostnames: Vec<Hostname>,
    pub ports: Vec<Port>,
    /// Explicit MAC from the report, or the local machine's own MAC when
    /// the scan targeted the scanning host and nmap omitted it.
    pub mac_address: Option<String>,
}

impl Host {
    pub const STATE_UP: &'static str = "up";
    pub const STATE_DOWN: &'static str = "down";

    pub fn is_up(&self) -> bool {
        self.state == Self::STATE_UP
    }

    pub fn open_ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|port| port.is_open())
    }

    pub fn closed_ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|port| port.is_closed())
    }
}

/// A name attached to a host, e.g. from reverse DNS (`kind` is the report's
/// `type` attribute, typically "PTR" or "user").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hostname {
    pub name: String,
    pub kind: String,
}

/// One examined port on a host, always carrying exactly one [`Service`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub number: u16,
    /// "tcp" or "udp".
    pub protocol: String,
    /// Observed state as reported ("open", "closed", "filtered", ...).
    pub state: String,
    pub service: Service,
}

impl Port {
    pub const STATE_OPEN: &'static str = "open";
    pub const STATE_CLOSED: &'static str = "closed";

    pub fn is_open(&self) -> bool {
        self.state == Self::STATE_OPEN
    }

    pub fn is_closed(&self) -> bool {
        self.state == Self::STATE_CLOSED
    }
}

/// The service identified (or guessed) as listening on a port. Fields are
/// empty strings when the report omits them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Service {
    pub name: String,
    pub product: String,
    pub version: String,
}
