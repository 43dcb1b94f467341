//! 인증 로그 라인 분류기
//!
//! [`Classifier`]는 인증 로그 한 라인을 받아 보안 이벤트와 (해당 시)
//! 로그인 시도로 분류하는 순수 컴포넌트입니다. 정규식은 생성 시
//! 한 번만 컴파일됩니다.
//!
//! # 매칭 우선순위 (첫 매칭이 승리)
//! 1. failed password (invalid user 포함) → 실패 로그인 시도 + Warning 이벤트
//! 2. accepted password/publickey → 성공 로그인 시도 + Info 이벤트
//! 3. invalid user → Warning 이벤트 (로그인 시도 없음)
//! 4. possible break-in attempt → Critical 이벤트 (원본 라인 보존)
//! 5. 그 외 → None (에러 아님)
//!
//! failed-password 패턴을 invalid-user보다 먼저 검사하므로 두 패턴을
//! 모두 포함하는 라인도 결과는 정확히 하나입니다.

use std::net::IpAddr;

use regex::Regex;

use hostwatch_core::{Event, EventKind, LoginAttempt, Severity};

use crate::error::PipelineError;

/// 분류 결과 — 이벤트 한 건과 (해당 시) 파생된 로그인 시도
#[derive(Debug, Clone)]
pub struct Classified {
    /// 분류된 보안 이벤트
    pub event: Event,
    /// 파생된 로그인 시도 (accept/fail 패턴에서만 생성)
    pub attempt: Option<LoginAttempt>,
}

/// 정규식 기반 인증 로그 분류기
pub struct Classifier {
    failed_re: Regex,
    accepted_re: Regex,
    invalid_user_re: Regex,
    ip_re: Regex,
}

impl Classifier {
    /// 새 분류기를 생성합니다. 패턴은 여기서 한 번만 컴파일됩니다.
    pub fn new() -> Result<Self, PipelineError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| PipelineError::Pattern {
                reason: e.to_string(),
            })
        };

        Ok(Self {
            failed_re: compile(
                r"(?i)failed password for (?:invalid user )?(\S+) from (\d{1,3}(?:\.\d{1,3}){3})",
            )?,
            accepted_re: compile(
                r"(?i)accepted (?:password|publickey) for (\S+) from (\d{1,3}(?:\.\d{1,3}){3})",
            )?,
            invalid_user_re: compile(
                r"(?i)invalid user (\S+) from (\d{1,3}(?:\.\d{1,3}){3})",
            )?,
            ip_re: compile(r"(\d{1,3}(?:\.\d{1,3}){3})")?,
        })
    }

    /// 로그 라인 한 줄을 분류합니다.
    ///
    /// 어떤 패턴에도 매칭되지 않으면 `None`을 반환합니다 (에러 아님).
    /// 캡처가 유효한 IP가 아니면 부분 이벤트를 만들지 않고 `None`을
    /// 반환합니다.
    pub fn classify(&self, line: &str) -> Option<Classified> {
        if let Some(caps) = self.failed_re.captures(line) {
            let user = caps.get(1)?.as_str();
            let ip_str = caps.get(2)?.as_str();
            let ip: IpAddr = ip_str.parse().ok()?;
            return Some(Classified {
                event: Event::security(
                    EventKind::SshLoginFailed,
                    Severity::Warning,
                    format!("failed SSH login for {user} from {ip_str}"),
                    Some(ip),
                ),
                attempt: Some(LoginAttempt::ssh(user, ip_str, false)),
            });
        }

        if let Some(caps) = self.accepted_re.captures(line) {
            let user = caps.get(1)?.as_str();
            let ip_str = caps.get(2)?.as_str();
            let ip: IpAddr = ip_str.parse().ok()?;
            return Some(Classified {
                event: Event::security(
                    EventKind::SshLoginSuccess,
                    Severity::Info,
                    format!("accepted SSH login for {user} from {ip_str}"),
                    Some(ip),
                ),
                attempt: Some(LoginAttempt::ssh(user, ip_str, true)),
            });
        }

        if let Some(caps) = self.invalid_user_re.captures(line) {
            let user = caps.get(1)?.as_str();
            let ip_str = caps.get(2)?.as_str();
            let ip: IpAddr = ip_str.parse().ok()?;
            // 사용자 신원이 검증되지 않으므로 로그인 시도는 생성하지 않음
            return Some(Classified {
                event: Event::security(
                    EventKind::SshInvalidUser,
                    Severity::Warning,
                    format!("SSH attempt for invalid user {user} from {ip_str}"),
                    Some(ip),
                ),
                attempt: None,
            });
        }

        if line.to_lowercase().contains("possible break-in attempt") {
            let origin_ip = self
                .ip_re
                .captures(line)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok());
            return Some(Classified {
                event: Event::security(
                    EventKind::IntrusionAttempt,
                    Severity::Critical,
                    line, // 원본 라인 보존
                    origin_ip,
                ),
                attempt: None,
            });
        }

        None
    }
}
