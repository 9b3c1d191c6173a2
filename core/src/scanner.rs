//! The scan session: probe the binary once, then run scans against it.

use tracing::debug;

use crate::command;
use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::host::Host;
use crate::inspect::{LocalNetworkInspector, SystemInspector};
use crate::process::{ProcessRunner, SystemRunner};
use crate::report;

/// A facade over one configured nmap binary.
///
/// Holds the immutable [`ScanConfig`] plus the two injectable
/// collaborators: the subprocess runner and the local-network inspector.
/// Scans are strictly sequential; the caller awaits each one and the
/// output file is only read after the process exited successfully.
pub struct Nmap {
    config: ScanConfig,
    runner: Box<dyn ProcessRunner>,
    inspector: Box<dyn LocalNetworkInspector + Send + Sync>,
}

impl Nmap {
    /// Creates a session backed by a real subprocess and the OS network
    /// utilities. Fails with [`ScanError::ExecutableNotFound`] when the
    /// configured binary does not answer a `--version` probe.
    pub async fn new(config: ScanConfig) -> Result<Self> {
        Self::with_collaborators(config, Box::new(SystemRunner), Box::new(SystemInspector::new()))
            .await
    }

    /// Dependency-injecting constructor; performs the same probe through
    /// the given runner.
    pub async fn with_collaborators(
        config: ScanConfig,
        runner: Box<dyn ProcessRunner>,
        inspector: Box<dyn LocalNetworkInspector + Send + Sync>,
    ) -> Result<Self> {
        let probe = ["--version".to_string()];
        if runner
            .run(&config.executable, &probe, config.timeout)
            .await
            .is_err()
        {
            return Err(ScanError::ExecutableNotFound {
                executable: config.executable.clone(),
            });
        }
        Ok(Self {
            config,
            runner,
            inspector,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Runs one scan against `targets` (hostnames, IP literals, or CIDR
    /// ranges) and returns the parsed hosts in report order. `ports`
    /// narrows the scan and is ignored when the port scan is disabled.
    ///
    /// Any failure surfaces here: a non-zero exit or timeout as
    /// [`ScanError::ProcessExecution`] (no parse is attempted), a missing
    /// report as [`ScanError::MissingOutput`], an unparseable one as
    /// [`ScanError::MalformedReport`].
    pub async fn scan(&self, targets: &[String], ports: &[u16]) -> Result<Vec<Host>> {
        let args = command::build_args(&self.config, targets, ports);
        debug!(targets = targets.len(), "starting nmap scan");

        self.runner
            .run(&self.config.executable, &args, self.config.timeout)
            .await?;

        report::parse(&self.config.output_file, self.inspector.as_ref())
    }
}
