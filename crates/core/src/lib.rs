#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod event;
pub mod metrics;
pub mod payload;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, HostwatchError};

// 설정
pub use config::{
    ActionsConfig, ApiConfig, BufferConfig, CollectorConfig, GeneralConfig, HostwatchConfig,
    SchedulerConfig, TailerConfig,
};

// 이벤트
pub use event::{Event, EventKind};

// 와이어 형식
pub use payload::{EventRecord, HeartbeatPayload};

// 도메인 타입
pub use types::{InterfaceStats, LoginAttempt, MetricsSnapshot, Severity};
