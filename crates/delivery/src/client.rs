//! HTTPS 전송 클라이언트
//!
//! [`HttpDeliveryClient`]는 하트비트 페이로드를 JSON으로 직렬화해
//! 원격 수집기에 POST합니다. 틱당 한 번의 시도만 하며, 재시도 판단은
//! 호출자 몫입니다.

use std::future::Future;
use std::time::Duration;

use metrics::counter;

use hostwatch_core::HeartbeatPayload;
use hostwatch_core::metrics::{DELIVERY_ATTEMPTS_TOTAL, DELIVERY_EVENTS_SENT_TOTAL, LABEL_RESULT};

use crate::config::DeliveryConfig;
use crate::error::DeliveryError;

/// 전송 trait
///
/// 스케줄러가 의존하는 전송 지점입니다. 테스트에서는 실패하거나
/// 기록하는 스텁으로 대체합니다.
pub trait Transport: Send + Sync {
    /// 하트비트 페이로드를 한 번 전송합니다.
    fn send(
        &self,
        payload: &HeartbeatPayload,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

/// reqwest 기반 HTTPS 전송 클라이언트
pub struct HttpDeliveryClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpDeliveryClient {
    /// 새 클라이언트를 생성합니다.
    ///
    /// PEM 파일을 읽을 수 없거나 파싱할 수 없으면 실패하며, 이는
    /// 시작 시점의 치명적 에러입니다.
    pub fn new(config: DeliveryConfig) -> Result<Self, DeliveryError> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("hostwatch-agent/", env!("CARGO_PKG_VERSION")));

        if !config.ca_cert.is_empty() {
            let pem = std::fs::read(&config.ca_cert).map_err(|e| DeliveryError::Config {
                reason: format!("cannot read ca_cert '{}': {e}", config.ca_cert),
            })?;
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| DeliveryError::Config {
                reason: format!("invalid ca_cert '{}': {e}", config.ca_cert),
            })?;
            builder = builder.add_root_certificate(cert);
        }

        if !config.client_cert.is_empty() {
            // Identity::from_pem은 인증서와 키가 이어진 PEM을 기대함
            let mut pem = std::fs::read(&config.client_cert).map_err(|e| DeliveryError::Config {
                reason: format!("cannot read client_cert '{}': {e}", config.client_cert),
            })?;
            let key = std::fs::read(&config.client_key).map_err(|e| DeliveryError::Config {
                reason: format!("cannot read client_key '{}': {e}", config.client_key),
            })?;
            pem.extend_from_slice(&key);
            let identity =
                reqwest::Identity::from_pem(&pem).map_err(|e| DeliveryError::Config {
                    reason: format!("invalid client identity: {e}"),
                })?;
            builder = builder.identity(identity);
        }

        let client = builder.build().map_err(|e| DeliveryError::Config {
            reason: format!("failed to build http client: {e}"),
        })?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            token: config.token,
        })
    }

    async fn post(&self, payload: &HeartbeatPayload) -> Result<(), DeliveryError> {
        let body =
            serde_json::to_vec(payload).map_err(|source| DeliveryError::Encoding { source })?;
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }

        let response = request
            .send()
            .await
            .map_err(|source| DeliveryError::Connection { source })?;

        let status = response.status().as_u16();
        if status >= 300 {
            counter!(DELIVERY_ATTEMPTS_TOTAL, LABEL_RESULT => "failure").increment(1);
            return Err(DeliveryError::Rejected { status });
        }

        counter!(DELIVERY_ATTEMPTS_TOTAL, LABEL_RESULT => "success").increment(1);
        counter!(DELIVERY_EVENTS_SENT_TOTAL).increment(payload.events.len() as u64);
        tracing::debug!(
            endpoint = %self.endpoint,
            status,
            events = payload.events.len(),
            "heartbeat accepted"
        );
        Ok(())
    }
}

impl Transport for HttpDeliveryClient {
    async fn send(&self, payload: &HeartbeatPayload) -> Result<(), DeliveryError> {
        match self.post(payload).await {
            Ok(()) => Ok(()),
            Err(err) => {
                if matches!(err, DeliveryError::Connection { .. }) {
                    counter!(DELIVERY_ATTEMPTS_TOTAL, LABEL_RESULT => "failure").increment(1);
                }
                Err(err)
            }
        }
    }
}
