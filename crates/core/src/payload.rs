//! 하트비트 와이어 형식 — 원격 수집기와의 JSON 계약
//!
//! 필드명은 원격 계약에 의해 고정되어 있습니다 (`ip_publico`,
//! `tipo`, `severidade`, `mensagem`, `origem_ip`). 내부 도메인
//! 타입([`crate::event::Event`], [`crate::types::MetricsSnapshot`])과
//! 와이어 이름을 분리하기 위해 전송 직전에 이 타입들로 변환합니다.

use serde::{Deserialize, Serialize};

use crate::event::{Event, EventKind};
use crate::types::{InterfaceStats, LoginAttempt, MetricsSnapshot, Severity};

/// 집계 페이로드에 포함되는 이벤트 한 건의 와이어 형식
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// 이벤트 종류 (snake_case)
    pub tipo: EventKind,
    /// 심각도 (소문자)
    pub severidade: Severity,
    /// 사람이 읽는 메시지
    pub mensagem: String,
    /// 출처 IP — 없으면 필드 자체가 생략됨
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origem_ip: Option<String>,
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        Self {
            tipo: event.kind,
            severidade: event.severity,
            mensagem: event.message.clone(),
            origem_ip: event.origin_ip.map(|ip| ip.to_string()),
        }
    }
}

/// 하트비트 집계 페이로드
///
/// 한 틱에 한 번 전송되는 아웃바운드 단위입니다. 호스트 식별 정보,
/// 메트릭 스냅샷, 그리고 직전 전송 이후 드레인된 로그인 시도와
/// 이벤트 배치를 담습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatPayload {
    /// 호스트명
    pub hostname: String,
    /// 아웃바운드 로컬 IP (dotted-quad)
    pub ip_publico: String,
    /// OS 식별 문자열
    pub os_info: String,
    /// CPU 사용률 (%, 소수점 한 자리)
    pub cpu: f64,
    /// RAM 사용률 (%)
    pub ram: f64,
    /// 디스크 사용률 (%)
    pub disk: f64,
    /// 가동 시간 (예: "2d 3h 14m")
    pub uptime: String,
    /// TCP 연결 총수
    pub conns: u64,
    /// LISTEN 포트 목록 — null 금지, 없으면 빈 배열
    pub open_ports: Vec<u16>,
    /// 인터페이스 트래픽 (루프백 제외)
    pub interfaces: Vec<InterfaceStats>,
    /// 드레인된 로그인 시도 배치
    pub login_attempts: Vec<LoginAttempt>,
    /// 드레인된 이벤트 배치
    pub events: Vec<EventRecord>,
}

impl HeartbeatPayload {
    /// 메트릭 스냅샷과 드레인된 배치로 페이로드를 조립합니다.
    pub fn assemble(
        snapshot: MetricsSnapshot,
        attempts: Vec<LoginAttempt>,
        events: &[Event],
    ) -> Self {
        Self {
            hostname: snapshot.hostname,
            ip_publico: snapshot.public_ip,
            os_info: snapshot.os_info,
            cpu: snapshot.cpu_pct,
            ram: snapshot.ram_pct,
            disk: snapshot.disk_pct,
            uptime: snapshot.uptime,
            conns: snapshot.conns,
            open_ports: snapshot.open_ports,
            interfaces: snapshot.interfaces,
            login_attempts: attempts,
            events: events.iter().map(EventRecord::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> MetricsSnapshot {
        MetricsSnapshot {
            hostname: "web-01".to_owned(),
            public_ip: "203.0.113.7".to_owned(),
            os_info: "Debian GNU/Linux 12".to_owned(),
            cpu_pct: 12.3,
            ram_pct: 45.6,
            disk_pct: 78.9,
            uptime: "2d 3h 14m".to_owned(),
            conns: 42,
            open_ports: vec![22, 443],
            interfaces: vec![InterfaceStats {
                name: "eth0".to_owned(),
                rx_bytes: 1024,
                tx_bytes: 2048,
            }],
        }
    }

    #[test]
    fn payload_uses_contract_field_names() {
        let payload = HeartbeatPayload::assemble(sample_snapshot(), vec![], &[]);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["ip_publico"], "203.0.113.7");
        assert_eq!(json["cpu"], 12.3);
        assert_eq!(json["uptime"], "2d 3h 14m");
        assert_eq!(json["open_ports"], serde_json::json!([22, 443]));
        assert!(json["events"].as_array().unwrap().is_empty());
    }

    #[test]
    fn open_ports_is_never_null() {
        let payload = HeartbeatPayload::assemble(MetricsSnapshot::default(), vec![], &[]);
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["open_ports"].is_array());
        assert!(json["interfaces"].is_array());
    }

    #[test]
    fn event_record_uses_contract_field_names() {
        let event = Event::security(
            EventKind::SshLoginFailed,
            Severity::Warning,
            "Failed password for bob from 10.0.0.5",
            Some("10.0.0.5".parse().unwrap()),
        );
        let record = EventRecord::from(&event);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["tipo"], "ssh_login_failed");
        assert_eq!(json["severidade"], "warning");
        assert_eq!(json["origem_ip"], "10.0.0.5");
        assert!(json["mensagem"].as_str().unwrap().contains("bob"));
    }

    #[test]
    fn event_record_omits_missing_origin_ip() {
        let event = Event::security(EventKind::IntrusionAttempt, Severity::Critical, "raw", None);
        let record = EventRecord::from(&event);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("origem_ip").is_none());
    }

    #[test]
    fn login_attempts_round_trip_in_payload() {
        let attempts = vec![LoginAttempt::ssh("alice", "192.168.1.10", true)];
        let payload = HeartbeatPayload::assemble(sample_snapshot(), attempts, &[]);
        let json = serde_json::to_string(&payload).unwrap();
        let parsed: HeartbeatPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.login_attempts.len(), 1);
        assert_eq!(parsed.login_attempts[0].user, "alice");
        assert!(parsed.login_attempts[0].success);
    }
}
