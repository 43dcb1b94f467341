//! 메트릭 상수 및 설명 등록
//!
//! 모든 내부 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`
//! 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `hostwatch_`
//! - 모듈명: `tailer_`, `buffer_`, `classifier_`, `delivery_`
//! - 접미어: `_total` (counter), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(hostwatch_core::metrics::TAILER_LINES_SCANNED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 심각도 레이블 키 (info, warning, critical)
pub const LABEL_SEVERITY: &str = "severity";

/// 이벤트 종류 레이블 키
pub const LABEL_KIND: &str = "kind";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── Tailer 메트릭 ──────────────────────────────────────────────────

/// Tailer: 스캔한 전체 로그 라인 수 (counter)
pub const TAILER_LINES_SCANNED_TOTAL: &str = "hostwatch_tailer_lines_scanned_total";

/// Tailer: 감지된 로그 회전 수 (counter)
pub const TAILER_ROTATIONS_TOTAL: &str = "hostwatch_tailer_rotations_total";

// ─── Classifier 메트릭 ──────────────────────────────────────────────

/// Classifier: 분류된 이벤트 수 (counter, label: kind)
pub const CLASSIFIER_EVENTS_TOTAL: &str = "hostwatch_classifier_events_total";

// ─── Buffer 메트릭 ──────────────────────────────────────────────────

/// Buffer: 현재 버퍼 내 이벤트 수 (gauge)
pub const BUFFER_SIZE: &str = "hostwatch_buffer_size";

/// Buffer: 용량 초과로 드롭된 이벤트 수 (counter)
pub const BUFFER_EVENTS_DROPPED_TOTAL: &str = "hostwatch_buffer_events_dropped_total";

// ─── Delivery 메트릭 ────────────────────────────────────────────────

/// Delivery: 전송 시도 수 (counter, label: result)
pub const DELIVERY_ATTEMPTS_TOTAL: &str = "hostwatch_delivery_attempts_total";

/// Delivery: 전송된 이벤트 수 (counter)
pub const DELIVERY_EVENTS_SENT_TOTAL: &str = "hostwatch_delivery_events_sent_total";

// ─── Agent 메트릭 ───────────────────────────────────────────────────

/// Agent: 가동 시간 (gauge, 초)
pub const AGENT_UPTIME_SECONDS: &str = "hostwatch_agent_uptime_seconds";

/// Agent: 완료된 하트비트 틱 수 (counter)
pub const AGENT_TICKS_TOTAL: &str = "hostwatch_agent_ticks_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 이 함수는 전역 레코더 설치 후 한 번만 호출해야 합니다.
/// 일반적으로 `hostwatch-agent`의 시작 시점에서 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge};

    // Tailer
    describe_counter!(
        TAILER_LINES_SCANNED_TOTAL,
        "Total number of auth log lines scanned"
    );
    describe_counter!(
        TAILER_ROTATIONS_TOTAL,
        "Total number of log rotations detected"
    );

    // Classifier
    describe_counter!(
        CLASSIFIER_EVENTS_TOTAL,
        "Total number of security events classified, by kind"
    );

    // Buffer
    describe_gauge!(BUFFER_SIZE, "Current number of events in the event buffer");
    describe_counter!(
        BUFFER_EVENTS_DROPPED_TOTAL,
        "Total number of events dropped due to buffer overflow"
    );

    // Delivery
    describe_counter!(
        DELIVERY_ATTEMPTS_TOTAL,
        "Total number of heartbeat delivery attempts, by result"
    );
    describe_counter!(
        DELIVERY_EVENTS_SENT_TOTAL,
        "Total number of events included in accepted heartbeats"
    );

    // Agent
    describe_gauge!(AGENT_UPTIME_SECONDS, "Hostwatch agent uptime in seconds");
    describe_counter!(AGENT_TICKS_TOTAL, "Total number of completed heartbeat ticks");
}
