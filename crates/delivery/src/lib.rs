#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`client`]: reqwest 기반 HTTPS 클라이언트와 [`Transport`] trait
//! - [`config`]: 전송 설정 (core `[api]` 섹션 파생)
//! - [`error`]: 전송 에러 분류

pub mod client;
pub mod config;
pub mod error;

// --- 주요 타입 re-export ---

pub use client::{HttpDeliveryClient, Transport};
pub use config::DeliveryConfig;
pub use error::DeliveryError;
