//! 이벤트 — 분류된 보안 발생 한 건
//!
//! [`Event`]는 인증 로그에서 분류되었거나 메트릭 수집기가 생성한
//! 발생 한 건을 나타냅니다. 생성 이후 불변이며, `kind`에 따라
//! 구조화된 메트릭 스냅샷을 동반할 수 있습니다
//! (자유 형식 key/value 맵 대신 타입이 있는 판별 방식).

use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{MetricsSnapshot, Severity};

/// 이벤트 종류
///
/// 와이어 형식의 `tipo` 필드와 1:1 대응하는 snake_case 문자열로
/// 직렬화됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// SSH 로그인 실패 (failed password)
    SshLoginFailed,
    /// SSH 로그인 성공 (accepted password/publickey)
    SshLoginSuccess,
    /// 존재하지 않는 사용자 시도 (invalid user)
    SshInvalidUser,
    /// 침입 시도 의심 (possible break-in attempt)
    IntrusionAttempt,
    /// 호스트 메트릭 샘플
    HostMetrics,
}

impl EventKind {
    /// 와이어 형식에서 사용하는 snake_case 이름을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SshLoginFailed => "ssh_login_failed",
            Self::SshLoginSuccess => "ssh_login_success",
            Self::SshInvalidUser => "ssh_invalid_user",
            Self::IntrusionAttempt => "intrusion_attempt",
            Self::HostMetrics => "host_metrics",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 분류된 보안 이벤트
///
/// 생성 시각(`timestamp`)은 캡처 시점의 UTC이며, 로그 라인 자체의
/// 타임스탬프가 아닙니다. `metrics`는 `kind`가
/// [`EventKind::HostMetrics`]일 때만 `Some`이고, 생성자가 이
/// 판별을 강제합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// 이벤트 고유 ID (UUID v4) — 로그 상관관계 추적용
    pub id: String,
    /// 이벤트 종류
    pub kind: EventKind,
    /// 심각도
    pub severity: Severity,
    /// 매칭된 라인의 사람이 읽는 표현
    pub message: String,
    /// 라인에 원격 주소가 포함된 경우의 출처 IP
    pub origin_ip: Option<IpAddr>,
    /// 캡처 시각 (UTC)
    pub timestamp: DateTime<Utc>,
    /// 구조화된 메트릭 — `kind == HostMetrics`일 때만 존재
    pub metrics: Option<MetricsSnapshot>,
}

impl Event {
    /// 보안 사실 이벤트를 생성합니다 (메트릭 없음).
    pub fn security(
        kind: EventKind,
        severity: Severity,
        message: impl Into<String>,
        origin_ip: Option<IpAddr>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            severity,
            message: message.into(),
            origin_ip,
            timestamp: Utc::now(),
            metrics: None,
        }
    }

    /// 호스트 메트릭 이벤트를 생성합니다.
    ///
    /// `kind`는 항상 [`EventKind::HostMetrics`], 심각도는 Info입니다.
    pub fn host_metrics(snapshot: MetricsSnapshot) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: EventKind::HostMetrics,
            severity: Severity::Info,
            message: snapshot.to_string(),
            origin_ip: None,
            timestamp: Utc::now(),
            metrics: Some(snapshot),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Event[{}] kind={} severity={}",
            &self.id[..8.min(self.id.len())],
            self.kind,
            self.severity,
        )?;
        if let Some(ip) = self.origin_ip {
            write!(f, " origin={ip}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_event_has_no_metrics() {
        let event = Event::security(
            EventKind::SshLoginFailed,
            Severity::Warning,
            "failed password for bob",
            Some("10.0.0.5".parse().unwrap()),
        );
        assert_eq!(event.kind, EventKind::SshLoginFailed);
        assert!(event.metrics.is_none());
        assert!(!event.id.is_empty());
    }

    #[test]
    fn host_metrics_event_carries_snapshot() {
        let snapshot = MetricsSnapshot {
            hostname: "web-01".to_owned(),
            ..Default::default()
        };
        let event = Event::host_metrics(snapshot);
        assert_eq!(event.kind, EventKind::HostMetrics);
        assert_eq!(event.severity, Severity::Info);
        assert_eq!(event.metrics.as_ref().unwrap().hostname, "web-01");
    }

    #[test]
    fn event_timestamp_is_capture_time() {
        let before = Utc::now();
        let event = Event::security(EventKind::SshInvalidUser, Severity::Warning, "x", None);
        let after = Utc::now();
        assert!(event.timestamp >= before && event.timestamp <= after);
    }

    #[test]
    fn event_kind_serializes_snake_case() {
        let json = serde_json::to_string(&EventKind::SshLoginFailed).unwrap();
        assert_eq!(json, "\"ssh_login_failed\"");
        assert_eq!(EventKind::IntrusionAttempt.as_str(), "intrusion_attempt");
    }

    #[test]
    fn event_display_includes_origin_when_present() {
        let event = Event::security(
            EventKind::IntrusionAttempt,
            Severity::Critical,
            "raw line",
            Some("192.168.1.100".parse().unwrap()),
        );
        let display = event.to_string();
        assert!(display.contains("intrusion_attempt"));
        assert!(display.contains("192.168.1.100"));
    }

    #[test]
    fn events_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<Event>();
    }
}
