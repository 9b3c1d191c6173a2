//! Terminal output: log formatting and the host report view.

use colored::*;
use nmapx_core::Host;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::registry::LookupSpan;

struct NmapxFormatter;

impl<S, N> FormatEvent<S, N> for NmapxFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) = match *meta.level() {
            Level::TRACE => ("[ ]", |s| s.dimmed()),
            Level::DEBUG => ("[?]", |s| s.blue()),
            Level::INFO => ("[+]", |s| s.green().bold()),
            Level::WARN => ("[*]", |s| s.yellow().bold()),
            Level::ERROR => ("[-]", |s| s.red().bold()),
        };

        write!(writer, "{} ", color_func(symbol.into()))?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

pub fn init_logging() {
    tracing_subscriber::fmt()
        .event_format(NmapxFormatter)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

pub fn print_hosts(hosts: &[Host]) {
    if hosts.is_empty() {
        println!("{}", "No hosts in the report.".yellow());
        return;
    }

    for host in hosts {
        print_host(host);
        println!();
    }

    let up = hosts.iter().filter(|host| host.is_up()).count();
    println!(
        "{}",
        format!("{} host(s) scanned, {} up", hosts.len(), up).bold()
    );
}

fn print_host(host: &Host) {
    let state = if host.is_up() {
        host.state.green().bold()
    } else {
        host.state.red().bold()
    };
    println!("{} ({})", host.address.cyan().bold(), state);

    if let Some(mac) = &host.mac_address {
        println!("  MAC: {}", mac.magenta());
    }

    if !host.hostnames.is_empty() {
        let names: Vec<String> = host
            .hostnames
            .iter()
            .map(|hostname| format!("{} ({})", hostname.name, hostname.kind))
            .collect();
        println!("  Names: {}", names.join(", "));
    }

    for port in &host.ports {
        let state = match port.state.as_str() {
            "open" => port.state.green(),
            "closed" => port.state.red(),
            _ => port.state.yellow(),
        };
        let service = [
            port.service.name.as_str(),
            port.service.product.as_str(),
            port.service.version.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");

        println!(
            "  {:>5}/{:<4} {:<10} {}",
            port.number, port.protocol, state, service
        );
    }
}
