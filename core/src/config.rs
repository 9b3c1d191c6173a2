use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for one scan session.
///
/// Built fluently by value and then handed to [`crate::Nmap`]; nothing
/// mutates it afterwards, so two sessions can never share toggle state by
/// accident.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Name or path of the nmap binary.
    pub executable: String,
    /// Where nmap is told to write its XML report (`-oX`).
    ///
    /// Concurrent sessions must each use their own path; the library does
    /// not lock the file.
    pub output_file: PathBuf,
    /// How long one invocation may run before it is killed.
    pub timeout: Duration,
    pub os_detection: bool,
    pub service_info: bool,
    pub verbose: bool,
    /// Host discovery only (`-sn`); wins over an explicit port list.
    pub disable_port_scan: bool,
    pub disable_reverse_dns: bool,
    pub treat_hosts_as_online: bool,
    /// Ping scan without name resolution (`-sP -n`), which keeps MAC
    /// addresses in the report.
    pub mac_addresses: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            executable: "nmap".to_string(),
            output_file: env::temp_dir().join("output.xml"),
            timeout: DEFAULT_TIMEOUT,
            os_detection: false,
            service_info: false,
            verbose: false,
            disable_port_scan: false,
            disable_reverse_dns: false,
            treat_hosts_as_online: false,
            mac_addresses: false,
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = path.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn os_detection(mut self, enable: bool) -> Self {
        self.os_detection = enable;
        self
    }

    pub fn service_info(mut self, enable: bool) -> Self {
        self.service_info = enable;
        self
    }

    pub fn verbose(mut self, enable: bool) -> Self {
        self.verbose = enable;
        self
    }

    pub fn disable_port_scan(mut self, disable: bool) -> Self {
        self.disable_port_scan = disable;
        self
    }

    pub fn disable_reverse_dns(mut self, disable: bool) -> Self {
        self.disable_reverse_dns = disable;
        self
    }

    pub fn treat_hosts_as_online(mut self, enable: bool) -> Self {
        self.treat_hosts_as_online = enable;
        self
    }

    pub fn mac_addresses(mut self, enable: bool) -> Self {
        self.mac_addresses = enable;
        self
    }
}
