//! Maps the XML report written by nmap into [`Host`] entities.
//!
//! The report schema (`host`/`address`/`status`/`hostnames`/`ports`/...)
//! is nmap's own external contract; this module walks it with a streaming
//! reader and treats anything structurally unexpected as a
//! [`ScanError::MalformedReport`].

use std::fs;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::error::{Result, ScanError};
use crate::host::{Host, Hostname, Port, Service};
use crate::inspect::LocalNetworkInspector;

/// Reads the report at `path` and returns the hosts in document order.
///
/// A missing file means nmap claimed success without producing output and
/// is reported as [`ScanError::MissingOutput`].
pub fn parse(path: &Path, inspector: &dyn LocalNetworkInspector) -> Result<Vec<Host>> {
    if !path.exists() {
        return Err(ScanError::MissingOutput {
            path: path.to_path_buf(),
        });
    }
    let xml = fs::read_to_string(path)
        .map_err(|err| ScanError::malformed(format!("unreadable report file: {err}")))?;
    parse_str(&xml, inspector)
}

#[derive(Default)]
struct HostRecord {
    ip: Option<String>,
    mac: Option<String>,
    state: Option<String>,
    hostnames: Vec<Hostname>,
    ports: Vec<Port>,
}

#[derive(Default)]
struct PortRecord {
    number: u16,
    protocol: String,
    state: Option<String>,
    service: Service,
}

/// Local IP and MAC are resolved at most once per parse and reused for
/// every host that needs them.
struct LocalIdentity<'a> {
    inspector: &'a dyn LocalNetworkInspector,
    ip: Option<Option<String>>,
    mac: Option<Option<String>>,
}

impl<'a> LocalIdentity<'a> {
    fn new(inspector: &'a dyn LocalNetworkInspector) -> Self {
        Self {
            inspector,
            ip: None,
            mac: None,
        }
    }

    fn ip(&mut self) -> Option<String> {
        self.ip
            .get_or_insert_with(|| self.inspector.local_ip())
            .clone()
    }

    fn mac(&mut self) -> Option<String> {
        self.mac
            .get_or_insert_with(|| self.inspector.local_mac(None))
            .clone()
    }
}

fn parse_str(xml: &str, inspector: &dyn LocalNetworkInspector) -> Result<Vec<Host>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut hosts: Vec<Host> = Vec::new();
    let mut host: Option<HostRecord> = None;
    let mut port: Option<PortRecord> = None;
    let mut local = LocalIdentity::new(inspector);

    loop {
        match reader.read_event().map_err(ScanError::malformed)? {
            Event::Start(element) => {
                if element.name().as_ref() == b"host" {
                    host = Some(HostRecord::default());
                } else {
                    open_element(&element, false, &mut host, &mut port)?;
                }
            }
            Event::Empty(element) => open_element(&element, true, &mut host, &mut port)?,
            Event::End(element) => match element.name().as_ref() {
                b"port" => {
                    if let (Some(record), Some(current)) = (port.take(), host.as_mut()) {
                        current.ports.push(record.finish());
                    }
                }
                b"host" => {
                    if let Some(record) = host.take() {
                        hosts.push(finish_host(record, &mut local)?);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    debug!(hosts = hosts.len(), "parsed nmap report");
    Ok(hosts)
}

/// Handles an opening (or self-closing) tag. Elements outside a `<host>`
/// subtree, and unknown elements anywhere, are ignored.
fn open_element(
    element: &BytesStart<'_>,
    self_closing: bool,
    host: &mut Option<HostRecord>,
    port: &mut Option<PortRecord>,
) -> Result<()> {
    let Some(current) = host.as_mut() else {
        return Ok(());
    };

    match element.name().as_ref() {
        // Last entry of each address kind wins; no de-duplication.
        b"address" => {
            let addr = attr(element, b"addr")?
                .ok_or_else(|| ScanError::malformed("address entry without addr attribute"))?;
            if attr(element, b"addrtype")?.as_deref() == Some("mac") {
                current.mac = Some(addr);
            } else {
                current.ip = Some(addr);
            }
        }
        b"status" => {
            current.state = attr(element, b"state")?;
        }
        b"hostname" => {
            current.hostnames.push(Hostname {
                name: attr(element, b"name")?.unwrap_or_default(),
                kind: attr(element, b"type")?.unwrap_or_default(),
            });
        }
        b"port" => {
            let number = attr(element, b"portid")?
                .ok_or_else(|| ScanError::malformed("port entry without portid"))?
                .parse::<u16>()
                .map_err(|err| ScanError::malformed(format!("invalid portid: {err}")))?;
            let record = PortRecord {
                number,
                protocol: attr(element, b"protocol")?.unwrap_or_default(),
                state: None,
                service: Service::default(),
            };
            if self_closing {
                current.ports.push(record.finish());
            } else {
                *port = Some(record);
            }
        }
        b"state" => {
            if let Some(record) = port.as_mut() {
                record.state = attr(element, b"state")?;
            }
        }
        b"service" => {
            if let Some(record) = port.as_mut() {
                record.service = Service {
                    name: attr(element, b"name")?.unwrap_or_default(),
                    product: attr(element, b"product")?.unwrap_or_default(),
                    version: attr(element, b"version")?.unwrap_or_default(),
                };
            }
        }
        _ => {}
    }
    Ok(())
}

fn finish_host(record: HostRecord, local: &mut LocalIdentity<'_>) -> Result<Host> {
    let state = record
        .state
        .ok_or_else(|| ScanError::malformed("host entry without status"))?;
    let address = record
        .ip
        .ok_or_else(|| ScanError::malformed("host entry without address"))?;

    // Only ever substitute the scanning machine's own MAC, and only when
    // the report left it out for that exact address.
    let mut mac_address = record.mac;
    if mac_address.is_none() && local.ip().as_deref() == Some(address.as_str()) {
        mac_address = local.mac();
    }

    Ok(Host {
        address,
        state,
        hostnames: record.hostnames,
        ports: record.ports,
        mac_address,
    })
}

impl PortRecord {
    fn finish(self) -> Port {
        Port {
            number: self.number,
            protocol: self.protocol,
            state: self.state.unwrap_or_default(),
            service: self.service,
        }
    }
}

fn attr(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attribute in element.attributes() {
        let attribute = attribute.map_err(ScanError::malformed)?;
        if attribute.key.as_ref() == name {
            let value = attribute
                .unescape_value()
                .map_err(ScanError::malformed)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
