#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`proc`]: /proc 파서 (CPU, 메모리, 가동 시간, OS 식별)
//! - [`net`]: TCP 상태, 인터페이스 트래픽, 아웃바운드 IP 프로브
//! - [`disk`]: statvfs 기반 디스크 사용률

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use hostwatch_core::{CollectorConfig, MetricsSnapshot};

pub mod disk;
pub mod net;
pub mod proc;

/// 메트릭 소스 trait
///
/// 스케줄러가 의존하는 수집 지점입니다. 테스트에서는 고정 스냅샷을
/// 반환하는 스텁으로 대체합니다.
pub trait MetricsSource: Send + Sync {
    /// 현재 호스트 상태의 스냅샷을 생성합니다.
    ///
    /// 개별 항목의 수집 실패는 0 값으로 퇴화하며, 이 호출 자체는
    /// 실패하지 않습니다.
    fn snapshot(&self) -> impl Future<Output = MetricsSnapshot> + Send;
}

/// /proc 기반 호스트 메트릭 수집기
pub struct MetricsCollector {
    /// 디스크 사용률 측정 대상 마운트 경로
    disk_path: PathBuf,
    /// CPU 샘플 간격
    cpu_sample_interval: Duration,
}

impl MetricsCollector {
    /// core 설정에서 수집기를 생성합니다.
    pub fn from_core(config: &CollectorConfig) -> Self {
        Self {
            disk_path: PathBuf::from(&config.disk_path),
            cpu_sample_interval: Duration::from_millis(config.cpu_sample_ms),
        }
    }

    /// 기본 설정(루트 마운트, 250ms CPU 샘플)으로 수집기를 생성합니다.
    pub fn new() -> Self {
        Self::from_core(&CollectorConfig::default())
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSource for MetricsCollector {
    async fn snapshot(&self) -> MetricsSnapshot {
        // 독립적인 읽기는 동시 수행 (CPU 샘플 대기와 겹침)
        let (hostname, public_ip, os_info, cpu_pct, ram_pct, uptime, tcp, interfaces) = tokio::join!(
            proc::read_hostname(),
            net::outbound_ip(),
            proc::read_os_info(),
            proc::read_cpu_percent(self.cpu_sample_interval),
            proc::read_mem_percent(),
            proc::read_uptime(),
            net::read_tcp_stats(),
            net::read_interfaces(),
        );
        let disk_pct = disk::disk_percent(&self.disk_path);

        MetricsSnapshot {
            hostname,
            public_ip,
            os_info,
            cpu_pct,
            ram_pct,
            disk_pct,
            uptime,
            conns: tcp.conns,
            open_ports: tcp.listen_ports,
            interfaces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn snapshot_never_fails() {
        let collector = MetricsCollector::from_core(&CollectorConfig {
            disk_path: "/".to_owned(),
            cpu_sample_ms: 10,
        });
        let snapshot = collector.snapshot().await;
        assert!((0.0..=100.0).contains(&snapshot.cpu_pct));
        assert!((0.0..=100.0).contains(&snapshot.ram_pct));
        // open_ports는 null이 아닌 빈 배열로 퇴화 가능
        let _ = snapshot.open_ports.len();
    }

    #[tokio::test]
    async fn snapshot_with_bad_disk_path_degrades() {
        let collector = MetricsCollector::from_core(&CollectorConfig {
            disk_path: "/nonexistent/mount".to_owned(),
            cpu_sample_ms: 10,
        });
        let snapshot = collector.snapshot().await;
        assert_eq!(snapshot.disk_pct, 0.0);
    }
}
