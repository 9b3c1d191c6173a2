//! Builds the argument vector for one nmap invocation.

use std::borrow::Cow;

use crate::config::ScanConfig;

/// Translates a configuration plus targets into nmap arguments.
///
/// Flag order is fixed: `-O`, `-sV`, `-v`, then either `-sn` or an explicit
/// `-p` list (never both), `-n`, `-Pn`, `-sP -n`, and always `-oX <output>`
/// before the targets.
///
/// Every target and the output path travel as their own vector element, so
/// embedded whitespace or shell metacharacters can never split into extra
/// arguments; the vector is handed to the process API directly, no shell
/// is involved.
pub fn build_args(config: &ScanConfig, targets: &[String], ports: &[u16]) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();

    if config.os_detection {
        args.push("-O".to_string());
    }
    if config.service_info {
        args.push("-sV".to_string());
    }
    if config.verbose {
        args.push("-v".to_string());
    }

    if config.disable_port_scan {
        args.push("-sn".to_string());
    } else if !ports.is_empty() {
        args.push("-p".to_string());
        args.push(
            ports
                .iter()
                .map(u16::to_string)
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    if config.disable_reverse_dns {
        args.push("-n".to_string());
    }
    if config.treat_hosts_as_online {
        args.push("-Pn".to_string());
    }
    if config.mac_addresses {
        args.push("-sP".to_string());
        args.push("-n".to_string());
    }

    args.push("-oX".to_string());
    args.push(config.output_file.to_string_lossy().into_owned());

    args.extend(targets.iter().cloned());
    args
}

/// Renders a program and its arguments as one shell-style line.
///
/// Only used for logs and error messages; execution always goes through
/// the argument vector.
pub fn render(program: &str, args: &[String]) -> String {
    let mut line = String::from(program);
    for arg in args {
        line.push(' ');
        line.push_str(&quote(arg));
    }
    line
}

fn quote(arg: &str) -> Cow<'_, str> {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | ','));
    if plain {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("'{}'", arg.replace('\'', r"'\''")))
    }
}
