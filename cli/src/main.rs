mod terminal;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use nmapx_core::{Nmap, ScanConfig};

#[derive(Parser)]
#[command(name = "nmapx")]
#[command(about = "Scan hosts with nmap and print the parsed report.")]
struct CommandLine {
    /// Hostnames, IP addresses or CIDR ranges to scan
    #[arg(required = true)]
    targets: Vec<String>,

    /// Ports to scan, e.g. "22,80,8000-8100"
    #[arg(short, long)]
    ports: Option<String>,

    /// Enable OS detection (-O)
    #[arg(long)]
    os_detection: bool,

    /// Probe service names and versions (-sV)
    #[arg(long)]
    service_info: bool,

    /// Verbose nmap output (-v)
    #[arg(short, long)]
    verbose: bool,

    /// Host discovery only, skip the port scan (-sn)
    #[arg(long)]
    no_port_scan: bool,

    /// Never resolve hostnames (-n)
    #[arg(long)]
    no_dns: bool,

    /// Treat all hosts as online, skip host discovery (-Pn)
    #[arg(long)]
    online: bool,

    /// Ping scan that keeps MAC addresses in the report (-sP -n)
    #[arg(long)]
    mac_addresses: bool,

    /// Name or path of the nmap binary
    #[arg(long, default_value = "nmap")]
    executable: String,

    /// Where nmap writes its XML report
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// Seconds to wait for nmap before giving up
    #[arg(long, default_value_t = 60)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLine::parse();
    terminal::init_logging();

    let ports = match &cli.ports {
        Some(spec) => split_ports(spec).context("invalid --ports specification")?,
        None => Vec::new(),
    };

    let mut config = ScanConfig::new()
        .executable(cli.executable.clone())
        .timeout(Duration::from_secs(cli.timeout))
        .os_detection(cli.os_detection)
        .service_info(cli.service_info)
        .verbose(cli.verbose)
        .disable_port_scan(cli.no_port_scan)
        .disable_reverse_dns(cli.no_dns)
        .treat_hosts_as_online(cli.online)
        .mac_addresses(cli.mac_addresses);
    if let Some(path) = cli.output_file {
        config = config.output_file(path);
    }

    let scanner = Nmap::new(config).await?;
    let hosts = scanner.scan(&cli.targets, &ports).await?;
    terminal::print_hosts(&hosts);
    Ok(())
}

/// Expands "22,80,8000-8100" into an ordered, de-duplicated port list.
fn split_ports(spec: &str) -> anyhow::Result<Vec<u16>> {
    let mut ports = Vec::new();
    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some((low, high)) = part.split_once('-') {
            let low: u16 = low.trim().parse().context("invalid port range start")?;
            let high: u16 = high.trim().parse().context("invalid port range end")?;
            if low > high {
                bail!("port range {part} is reversed");
            }
            ports.extend(low..=high);
        } else {
            ports.push(part.parse().with_context(|| format!("invalid port `{part}`"))?);
        }
    }
    ports.sort_unstable();
    ports.dedup();
    Ok(ports)
}
