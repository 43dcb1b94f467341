//! 전송 설정
//!
//! core의 `[api]` 섹션에서 파생됩니다. 빈 엔드포인트나 짝이 맞지 않는
//! 인증서 설정은 시작 시점의 치명적 에러입니다.

use crate::error::DeliveryError;

/// 전송 설정
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// 하트비트 수신 엔드포인트 URL
    pub endpoint: String,
    /// 에이전트 인증 토큰 (빈 값이면 Authorization 헤더 생략)
    pub token: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// TLS 클라이언트 인증서 PEM 경로 (빈 값이면 미사용)
    pub client_cert: String,
    /// TLS 클라이언트 키 PEM 경로
    pub client_key: String,
    /// 추가 신뢰 CA PEM 경로 (빈 값이면 시스템 기본)
    pub ca_cert: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self::from_core(&hostwatch_core::ApiConfig::default())
    }
}

impl DeliveryConfig {
    /// core의 `[api]` 섹션에서 전송 설정을 생성합니다.
    pub fn from_core(api: &hostwatch_core::ApiConfig) -> Self {
        Self {
            endpoint: api.endpoint.clone(),
            token: api.token.clone(),
            timeout_secs: api.timeout_secs,
            client_cert: api.client_cert.clone(),
            client_key: api.client_key.clone(),
            ca_cert: api.ca_cert.clone(),
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), DeliveryError> {
        if self.endpoint.is_empty() {
            return Err(DeliveryError::Config {
                reason: "endpoint URL must not be empty".to_owned(),
            });
        }

        if self.timeout_secs == 0 {
            return Err(DeliveryError::Config {
                reason: "timeout_secs must be greater than 0".to_owned(),
            });
        }

        // 클라이언트 인증서는 cert/key 쌍으로만 유효
        if self.client_cert.is_empty() != self.client_key.is_empty() {
            return Err(DeliveryError::Config {
                reason: "client_cert and client_key must be set together".to_owned(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        DeliveryConfig::default().validate().unwrap();
    }

    #[test]
    fn from_core_preserves_values() {
        let api = hostwatch_core::ApiConfig {
            endpoint: "https://collector:8443/api/v1/agents/heartbeat".to_owned(),
            token: "tok".to_owned(),
            timeout_secs: 15,
            ..Default::default()
        };
        let config = DeliveryConfig::from_core(&api);
        assert_eq!(config.endpoint, api.endpoint);
        assert_eq!(config.token, "tok");
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn validate_rejects_empty_endpoint() {
        let config = DeliveryConfig {
            endpoint: String::new(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, DeliveryError::Config { .. }));
    }

    #[test]
    fn validate_rejects_cert_without_key() {
        let config = DeliveryConfig {
            client_cert: "/etc/hostwatch/agent.crt".to_owned(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_accepts_cert_key_pair() {
        let config = DeliveryConfig {
            client_cert: "/etc/hostwatch/agent.crt".to_owned(),
            client_key: "/etc/hostwatch/agent.key".to_owned(),
            ..Default::default()
        };
        config.validate().unwrap();
    }
}
