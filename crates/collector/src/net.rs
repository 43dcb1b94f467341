//! 네트워크 상태 — TCP 연결/포트, 인터페이스 트래픽, 아웃바운드 IP
//!
//! `/proc/net/tcp`, `/proc/net/tcp6`, `/proc/net/dev`를 파싱합니다.
//! 파서는 순수 함수이며 고정 문자열로 테스트합니다.

use std::time::Duration;

use tokio::net::UdpSocket;

use hostwatch_core::InterfaceStats;

/// TCP 상태 집계
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TcpStats {
    /// 전체 TCP 소켓 수 (모든 상태)
    pub conns: u64,
    /// LISTEN 상태 로컬 포트 목록
    pub listen_ports: Vec<u16>,
}

/// /proc/net/tcp 또는 tcp6 테이블 한 개를 파싱합니다.
///
/// 상태 컬럼이 `0A`(LISTEN)인 엔트리의 로컬 포트를 수집합니다.
/// 포트는 16진수로 인코딩되어 있습니다.
pub fn parse_tcp_table(table: &str) -> TcpStats {
    let mut stats = TcpStats::default();
    for line in table.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            continue;
        }
        stats.conns += 1;
        if fields[3] != "0A" {
            continue;
        }
        let Some(port_hex) = fields[1].rsplit(':').next() else {
            continue;
        };
        if let Ok(port) = u16::from_str_radix(port_hex, 16) {
            stats.listen_ports.push(port);
        }
    }
    stats
}

/// 두 TCP 테이블(v4, v6)을 합산합니다. 포트는 중복 제거 후 정렬됩니다.
pub fn merge_tcp_stats(v4: TcpStats, v6: TcpStats) -> TcpStats {
    let mut ports = v4.listen_ports;
    ports.extend(v6.listen_ports);
    ports.sort_unstable();
    ports.dedup();
    TcpStats {
        conns: v4.conns + v6.conns,
        listen_ports: ports,
    }
}

/// /proc/net/dev 내용에서 인터페이스별 트래픽을 파싱합니다.
///
/// 루프백(`lo`)은 제외합니다.
pub fn parse_net_dev(content: &str) -> Vec<InterfaceStats> {
    let mut interfaces = Vec::new();
    // 처음 두 줄은 헤더
    for line in content.lines().skip(2) {
        let Some((name, rest)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name == "lo" {
            continue;
        }
        let fields: Vec<&str> = rest.split_whitespace().collect();
        // rx_bytes는 0번째, tx_bytes는 8번째 컬럼
        if fields.len() < 9 {
            continue;
        }
        let (Ok(rx_bytes), Ok(tx_bytes)) = (fields[0].parse(), fields[8].parse()) else {
            continue;
        };
        interfaces.push(InterfaceStats {
            name: name.to_owned(),
            rx_bytes,
            tx_bytes,
        });
    }
    interfaces
}

/// TCP 상태를 읽습니다. 실패한 테이블은 빈 값으로 퇴화합니다.
pub async fn read_tcp_stats() -> TcpStats {
    let v4 = match tokio::fs::read_to_string("/proc/net/tcp").await {
        Ok(content) => parse_tcp_table(&content),
        Err(_) => TcpStats::default(),
    };
    let v6 = match tokio::fs::read_to_string("/proc/net/tcp6").await {
        Ok(content) => parse_tcp_table(&content),
        Err(_) => TcpStats::default(),
    };
    merge_tcp_stats(v4, v6)
}

/// 인터페이스 트래픽을 읽습니다. 실패 시 빈 목록.
pub async fn read_interfaces() -> Vec<InterfaceStats> {
    match tokio::fs::read_to_string("/proc/net/dev").await {
        Ok(content) => parse_net_dev(&content),
        Err(_) => Vec::new(),
    }
}

/// 아웃바운드 경로의 로컬 IP를 측정합니다.
///
/// UDP 소켓을 8.8.8.8:80으로 connect하고 로컬 주소를 읽습니다.
/// 패킷은 전송되지 않습니다. 2초 예산 내 실패 시 `"0.0.0.0"`.
pub async fn outbound_ip() -> String {
    let probe = async {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect("8.8.8.8:80").await?;
        socket.local_addr().map(|addr| addr.ip().to_string())
    };
    match tokio::time::timeout(Duration::from_secs(2), probe).await {
        Ok(Ok(ip)) => ip,
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "outbound ip probe failed");
            "0.0.0.0".to_owned()
        }
        Err(_) => {
            tracing::debug!("outbound ip probe timed out");
            "0.0.0.0".to_owned()
        }
    }
}
