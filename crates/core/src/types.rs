//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 모든 크레이트가 공유하는 데이터 구조를 정의합니다.
//! 와이어 형식(JSON 필드명)은 [`crate::payload`]에서 별도로 관리합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 심각도 레벨
///
/// 보안 이벤트의 심각도를 나타냅니다.
/// `Ord` 구현으로 심각도 비교가 가능합니다 (`Info < Warning < Critical`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// 정보성 이벤트
    #[default]
    Info,
    /// 경고 — 주의가 필요한 이벤트
    Warning,
    /// 치명적 — 즉시 대응 필요
    Critical,
}

impl Severity {
    /// 문자열에서 심각도를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "info" | "informational" => Some(Self::Info),
            "warning" | "warn" => Some(Self::Warning),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }

    /// 와이어 형식에서 사용하는 소문자 이름을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SSH 로그인 시도
///
/// 인증 로그에서 accept/fail 패턴이 매칭될 때만 생성되는 파생 사실입니다.
/// invalid-user 및 침입 시도 패턴은 사용자 신원이 검증되지 않으므로
/// 로그인 시도를 생성하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAttempt {
    /// 사용자명
    pub user: String,
    /// 원격 IP (dotted-quad 문자열)
    pub ip: String,
    /// 인증 방식 — 현재 범위에서는 항상 "SSH"
    pub method: String,
    /// 성공 여부
    pub success: bool,
}

impl LoginAttempt {
    /// SSH 로그인 시도를 생성합니다.
    pub fn ssh(user: impl Into<String>, ip: impl Into<String>, success: bool) -> Self {
        Self {
            user: user.into(),
            ip: ip.into(),
            method: "SSH".to_owned(),
            success,
        }
    }
}

impl fmt::Display for LoginAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.success { "accepted" } else { "failed" };
        write!(f, "{} login {} for {} from {}", self.method, outcome, self.user, self.ip)
    }
}

/// 네트워크 인터페이스 트래픽 통계
///
/// `/proc/net/dev`에서 수집되며, 루프백 인터페이스는 제외됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceStats {
    /// 인터페이스 이름 (예: "eth0")
    pub name: String,
    /// 수신 바이트 누계
    pub rx_bytes: u64,
    /// 송신 바이트 누계
    pub tx_bytes: u64,
}

/// 호스트 메트릭 스냅샷
///
/// 메트릭 수집기가 한 틱에 생성하는 시스템 상태의 단면입니다.
/// 백분율 필드는 소수점 한 자리로 반올림됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// 호스트명
    pub hostname: String,
    /// 아웃바운드 경로에서 관측한 로컬 IP ("0.0.0.0"이면 측정 실패)
    pub public_ip: String,
    /// OS 식별 문자열 (/etc/os-release PRETTY_NAME)
    pub os_info: String,
    /// CPU 사용률 (%)
    pub cpu_pct: f64,
    /// RAM 사용률 (%)
    pub ram_pct: f64,
    /// 디스크 사용률 (%)
    pub disk_pct: f64,
    /// 가동 시간 (사람이 읽는 형식, 예: "2d 3h 14m")
    pub uptime: String,
    /// TCP 연결 총수
    pub conns: u64,
    /// LISTEN 상태 포트 목록 — null이 아닌 빈 배열 보장
    pub open_ports: Vec<u16>,
    /// 인터페이스별 트래픽 (루프백 제외)
    pub interfaces: Vec<InterfaceStats>,
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cpu={:.1}% ram={:.1}% disk={:.1}% conns={}",
            self.hostname, self.cpu_pct, self.ram_pct, self.disk_pct, self.conns,
        )
    }
}
