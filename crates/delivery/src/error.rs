//! 전송 에러 분류

use hostwatch_core::HostwatchError;

/// 전송 에러
///
/// `Connection`과 `Rejected`는 틱 단위로 격리되는 런타임 에러이고,
/// `Config`는 시작 시점의 치명적 에러입니다.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// 전송 계층 실패 (DNS, TCP, TLS, 타임아웃)
    #[error("connection failed: {source}")]
    Connection {
        #[source]
        source: reqwest::Error,
    },

    /// 원격이 HTTP 상태 300 이상으로 거부
    #[error("remote rejected heartbeat with status {status}")]
    Rejected { status: u16 },

    /// 페이로드 직렬화 실패
    #[error("payload encoding failed: {source}")]
    Encoding {
        #[source]
        source: serde_json::Error,
    },

    /// 클라이언트 구성 오류 (시작 시점에만 발생)
    #[error("delivery config error: {reason}")]
    Config { reason: String },
}

impl From<DeliveryError> for HostwatchError {
    fn from(err: DeliveryError) -> Self {
        HostwatchError::Delivery(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_includes_status() {
        let err = DeliveryError::Rejected { status: 403 };
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn converts_into_core_error() {
        let err = DeliveryError::Config {
            reason: "endpoint URL must not be empty".to_owned(),
        };
        let top: HostwatchError = err.into();
        assert!(matches!(top, HostwatchError::Delivery(_)));
    }
}
