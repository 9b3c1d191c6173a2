//! Pipeline-level tests: configuration in, parsed hosts out.

use std::time::Duration;

use async_trait::async_trait;
use nmapx_core::{
    Host, LocalNetworkInspector, Nmap, ProcessRunner, Result, ScanConfig, ScanError,
};

const REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<nmaprun scanner="nmap" args="nmap -sV -oX out.xml 192.168.1.0/24" version="7.95">
  <host>
    <status state="up" reason="arp-response"/>
    <address addr="192.168.1.1" addrtype="ipv4"/>
    <address addr="3C:84:6A:11:22:33" addrtype="mac" vendor="TP-Link"/>
    <hostnames>
      <hostname name="router.lan" type="PTR"/>
    </hostnames>
    <ports>
      <port protocol="tcp" portid="53">
        <state state="open" reason="syn-ack"/>
        <service name="domain" product="dnsmasq" version="2.90"/>
      </port>
      <port protocol="tcp" portid="443">
        <state state="closed" reason="reset"/>
      </port>
    </ports>
  </host>
  <host>
    <status state="up" reason="localhost-response"/>
    <address addr="192.168.1.50" addrtype="ipv4"/>
    <ports>
      <port protocol="tcp" portid="22">
        <state state="open" reason="syn-ack"/>
        <service name="ssh" product="OpenSSH" version="9.6p1"/>
      </port>
    </ports>
  </host>
  <host>
    <status state="down" reason="no-response"/>
    <address addr="192.168.1.77" addrtype="ipv4"/>
  </host>
  <runstats><finished timestr="now" elapsed="4.2" exit="success"/></runstats>
</nmaprun>"#;

struct FixedInspector {
    ip: &'static str,
    mac: &'static str,
}

impl LocalNetworkInspector for FixedInspector {
    fn local_ip(&self) -> Option<String> {
        Some(self.ip.to_string())
    }

    fn local_mac(&self, _interface: Option<&str>) -> Option<String> {
        Some(self.mac.to_string())
    }
}

/// Pretends to be nmap: succeeds and drops the fixture report at the
/// `-oX` path.
struct FixtureRunner;

#[async_trait]
impl ProcessRunner for FixtureRunner {
    async fn run(&self, _program: &str, args: &[String], _timeout: Duration) -> Result<i32> {
        if args == ["--version".to_string()] {
            return Ok(0);
        }
        let output = args
            .iter()
            .position(|arg| arg == "-oX")
            .and_then(|at| args.get(at + 1))
            .expect("scan arguments carry -oX <path>");
        std::fs::write(output, REPORT).unwrap();
        Ok(0)
    }
}

fn scan_config(dir: &tempfile::TempDir) -> ScanConfig {
    ScanConfig::new()
        .output_file(dir.path().join("output.xml"))
        .service_info(true)
}

#[tokio::test]
async fn full_pipeline_maps_the_report() {
    let dir = tempfile::tempdir().unwrap();
    let inspector = FixedInspector {
        ip: "192.168.1.50",
        mac: "0A:1B:2C:3D:4E:5F",
    };
    let scanner = Nmap::with_collaborators(
        scan_config(&dir),
        Box::new(FixtureRunner),
        Box::new(inspector),
    )
    .await
    .unwrap();

    let hosts: Vec<Host> = scanner
        .scan(&["192.168.1.0/24".to_string()], &[])
        .await
        .unwrap();

    assert_eq!(hosts.len(), 3);

    let router = &hosts[0];
    assert_eq!(router.address, "192.168.1.1");
    assert!(router.is_up());
    // Explicit MAC from the report, untouched by the inspector.
    assert_eq!(router.mac_address.as_deref(), Some("3C:84:6A:11:22:33"));
    assert_eq!(router.hostnames.len(), 1);
    assert_eq!(router.hostnames[0].name, "router.lan");
    assert_eq!(router.open_ports().count(), 1);
    assert_eq!(router.closed_ports().count(), 1);
    assert_eq!(router.ports[0].service.product, "dnsmasq");

    let local = &hosts[1];
    assert_eq!(local.address, "192.168.1.50");
    // nmap never reports the scanning host's own MAC; the inspector's
    // value is patched in because the address matches the local IP.
    assert_eq!(local.mac_address.as_deref(), Some("0A:1B:2C:3D:4E:5F"));
    assert_eq!(local.ports[0].number, 22);

    let down = &hosts[2];
    assert_eq!(down.state, Host::STATE_DOWN);
    assert_eq!(down.mac_address, None);
    assert!(down.ports.is_empty());
}

#[tokio::test]
async fn two_scans_from_one_session_agree() {
    let dir = tempfile::tempdir().unwrap();
    let inspector = FixedInspector {
        ip: "192.168.1.50",
        mac: "0A:1B:2C:3D:4E:5F",
    };
    let scanner = Nmap::with_collaborators(
        scan_config(&dir),
        Box::new(FixtureRunner),
        Box::new(inspector),
    )
    .await
    .unwrap();

    let targets = vec!["192.168.1.0/24".to_string()];
    let first = scanner.scan(&targets, &[]).await.unwrap();
    let second = scanner.scan(&targets, &[]).await.unwrap();
    assert_eq!(first, second);
}

#[cfg(unix)]
mod fake_binary {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    /// Shell script standing in for nmap: answers the `--version` probe
    /// and otherwise copies the fixture report to the `-oX` path.
    fn install_fake_nmap(dir: &Path) -> std::path::PathBuf {
        let report_path = dir.join("fixture.xml");
        std::fs::write(&report_path, REPORT).unwrap();

        let script_path = dir.join("fake-nmap");
        let script = format!(
            "#!/bin/sh\n\
             if [ \"$1\" = \"--version\" ]; then exit 0; fi\n\
             out=\"\"\n\
             prev=\"\"\n\
             for a in \"$@\"; do\n\
               if [ \"$prev\" = \"-oX\" ]; then out=\"$a\"; fi\n\
               prev=\"$a\"\n\
             done\n\
             [ -n \"$out\" ] || exit 2\n\
             cp {} \"$out\"\n",
            report_path.display()
        );
        std::fs::write(&script_path, script).unwrap();
        std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755)).unwrap();
        script_path
    }

    #[tokio::test]
    async fn real_subprocess_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let fake_nmap = install_fake_nmap(dir.path());

        let config = ScanConfig::new()
            .executable(fake_nmap.to_string_lossy())
            .output_file(dir.path().join("output.xml"))
            .timeout(Duration::from_secs(10));
        let inspector = FixedInspector {
            ip: "192.168.1.50",
            mac: "0A:1B:2C:3D:4E:5F",
        };
        let scanner = Nmap::with_collaborators(
            config,
            Box::new(nmapx_core::SystemRunner),
            Box::new(inspector),
        )
        .await
        .unwrap();

        let hosts = scanner
            .scan(&["192.168.1.0/24".to_string()], &[22, 53, 443])
            .await
            .unwrap();
        assert_eq!(hosts.len(), 3);
        assert_eq!(hosts[1].mac_address.as_deref(), Some("0A:1B:2C:3D:4E:5F"));
    }

    #[tokio::test]
    async fn missing_binary_fails_at_construction() {
        let config = ScanConfig::new().executable("nmapx-test-no-such-binary");
        let err = Nmap::new(config).await.err().expect("probe must fail");
        assert!(matches!(err, ScanError::ExecutableNotFound { .. }));
    }
}
