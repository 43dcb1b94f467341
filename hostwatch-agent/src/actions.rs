//! Firewall actions -- iptables wrappers.
//!
//! Shell out to `iptables` to ban source addresses or block ports.
//! Requires root (or CAP_NET_ADMIN). Failures are reported to the
//! caller; the scheduler logs them without aborting the tick.

use std::net::IpAddr;

use anyhow::Result;
use tokio::process::Command;

/// Build the iptables arguments for banning a source address.
fn ban_args(ip: IpAddr) -> Vec<String> {
    vec![
        "-A".to_owned(),
        "INPUT".to_owned(),
        "-s".to_owned(),
        ip.to_string(),
        "-j".to_owned(),
        "DROP".to_owned(),
    ]
}

/// Build the iptables arguments for removing a ban.
fn unban_args(ip: IpAddr) -> Vec<String> {
    vec![
        "-D".to_owned(),
        "INPUT".to_owned(),
        "-s".to_owned(),
        ip.to_string(),
        "-j".to_owned(),
        "DROP".to_owned(),
    ]
}

/// Build the iptables arguments for blocking an inbound TCP port.
fn block_port_args(port: u16) -> Vec<String> {
    vec![
        "-A".to_owned(),
        "INPUT".to_owned(),
        "-p".to_owned(),
        "tcp".to_owned(),
        "--dport".to_owned(),
        port.to_string(),
        "-j".to_owned(),
        "DROP".to_owned(),
    ]
}

async fn run_iptables(args: Vec<String>) -> Result<()> {
    let output = Command::new("iptables").args(&args).output().await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow::anyhow!(
            "iptables {} failed: {}",
            args.join(" "),
            stderr.trim()
        ));
    }
    Ok(())
}

/// Drop all inbound traffic from a source address.
pub async fn ban_ip(ip: IpAddr) -> Result<()> {
    run_iptables(ban_args(ip)).await?;
    tracing::info!(%ip, "banned source address");
    Ok(())
}

/// Remove a previously added ban for a source address.
pub async fn unban_ip(ip: IpAddr) -> Result<()> {
    run_iptables(unban_args(ip)).await?;
    tracing::info!(%ip, "unbanned source address");
    Ok(())
}

/// Drop all inbound TCP traffic to a port.
pub async fn block_port(port: u16) -> Result<()> {
    run_iptables(block_port_args(port)).await?;
    tracing::info!(port, "blocked inbound port");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ban_args_shape() {
        let args = ban_args("198.51.100.9".parse().unwrap());
        assert_eq!(args, ["-A", "INPUT", "-s", "198.51.100.9", "-j", "DROP"]);
    }

    #[test]
    fn unban_mirrors_ban() {
        let ip: IpAddr = "198.51.100.9".parse().unwrap();
        let ban = ban_args(ip);
        let unban = unban_args(ip);
        assert_eq!(ban[0], "-A");
        assert_eq!(unban[0], "-D");
        assert_eq!(ban[1..], unban[1..]);
    }

    #[test]
    fn block_port_args_shape() {
        let args = block_port_args(8080);
        assert!(args.contains(&"--dport".to_owned()));
        assert!(args.contains(&"8080".to_owned()));
    }
}
