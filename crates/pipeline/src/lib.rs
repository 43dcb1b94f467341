#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`tailer`]: 인증 로그 비동기 테일링 (오프셋 커서, 로테이션 감지)
//! - [`classifier`]: 정규식 기반 라인 분류 (순수 컴포넌트)
//! - [`buffer`]: 용량 제한 FIFO 이벤트 버퍼 (drop-oldest)
//! - [`config`]: 파이프라인 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! AuthLogTailer -> Classifier -> EventBuffer -> (scheduler drains)
//!       |              |
//!  offset cursor   fixed-precedence regexes
//! ```

pub mod buffer;
pub mod classifier;
pub mod config;
pub mod error;
pub mod tailer;

// --- 주요 타입 re-export ---

// 테일러
pub use tailer::AuthLogTailer;

// 분류기
pub use classifier::{Classified, Classifier};

// 버퍼
pub use buffer::EventBuffer;

// 설정
pub use config::{PipelineConfig, PipelineConfigBuilder};

// 에러
pub use error::PipelineError;
