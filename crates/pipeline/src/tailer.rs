//! 인증 로그 테일러
//!
//! [`AuthLogTailer`]는 인증 로그 파일을 바이트 오프셋 커서로 추적하며
//! 새로 추가된 라인만 읽어 분류합니다. `tail -f`와 유사한 동작을
//! 폴링 방식으로 구현합니다.
//!
//! # 로테이션 감지
//! 파일 크기가 저장된 오프셋보다 작아지면 로테이션(truncation)으로
//! 간주하고 오프셋을 0으로 재설정합니다. 로테이션으로 유실된 구간은
//! 복구하지 않습니다.
//!
//! # 부분 라인
//! 개행으로 끝나지 않은 마지막 라인은 소비하지 않고 다음 스캔으로
//! 남깁니다 (오프셋이 그 시작 지점을 가리킴). 쓰기 도중의 라인을
//! 절반만 분류하는 일이 없습니다.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use metrics::counter;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use hostwatch_core::LoginAttempt;
use hostwatch_core::metrics::{
    CLASSIFIER_EVENTS_TOTAL, LABEL_KIND, TAILER_LINES_SCANNED_TOTAL, TAILER_ROTATIONS_TOTAL,
};

use crate::buffer::EventBuffer;
use crate::classifier::Classifier;
use crate::config::PipelineConfig;
use crate::error::PipelineError;

/// 인증 로그 테일러
///
/// 테일 상태(활성 경로, 바이트 오프셋)는 이 인스턴스가 단독
/// 소유합니다. 분류된 이벤트는 공유 [`EventBuffer`]로 들어가고,
/// 파생된 로그인 시도는 인스턴스 내부에 누적되어
/// [`take_attempts`](Self::take_attempts)로 회수됩니다.
pub struct AuthLogTailer {
    config: PipelineConfig,
    classifier: Classifier,
    buffer: Arc<EventBuffer>,
    /// 현재 읽고 있는 경로 (기본 또는 보조)
    active_path: Option<PathBuf>,
    /// 마지막으로 소비한 바이트 오프셋
    offset: u64,
    /// 직전 회수 이후 누적된 로그인 시도
    attempts: Vec<LoginAttempt>,
}

impl AuthLogTailer {
    /// 새 테일러를 생성합니다.
    pub fn new(config: PipelineConfig, buffer: Arc<EventBuffer>) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            classifier: Classifier::new()?,
            buffer,
            active_path: None,
            offset: 0,
            attempts: Vec::new(),
        })
    }

    /// 열 수 있는 로그 소스를 찾습니다. 기본 경로 우선, 실패하면 보조 경로.
    ///
    /// 존재 여부가 아니라 실제로 열리는지로 판단합니다. 존재하지만
    /// 권한이 없거나 일반 파일이 아닌 기본 경로는 건너뜁니다
    /// (디렉터리는 읽기 전용으로 열리지만 read가 실패함).
    async fn open_source(&self) -> Option<(PathBuf, File, u64)> {
        for raw in [&self.config.auth_log_path, &self.config.fallback_path] {
            let path = Path::new(raw);
            let file = match File::open(path).await {
                Ok(file) => file,
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "auth log source not openable");
                    continue;
                }
            };
            match file.metadata().await {
                Ok(meta) if meta.is_file() => {
                    return Some((path.to_path_buf(), file, meta.len()));
                }
                _ => {
                    tracing::debug!(path = %path.display(), "auth log source is not a regular file");
                }
            }
        }
        None
    }

    /// 로그를 한 번 스캔하고 분류된 이벤트 수를 반환합니다.
    ///
    /// 읽을 수 있는 소스가 없으면 0을 반환하며 에러가 아닙니다
    /// (틱마다 재시도). 새 바이트가 없는 재스캔은 멱등적으로 0을
    /// 반환합니다.
    pub async fn scan(&mut self) -> Result<usize, PipelineError> {
        let Some((path, mut file, file_len)) = self.open_source().await else {
            tracing::debug!(
                primary = %self.config.auth_log_path,
                fallback = %self.config.fallback_path,
                "no openable auth log source, skipping scan"
            );
            return Ok(0);
        };

        // 경로가 바뀌면 (보조 → 기본 복귀 등) 오프셋은 새 파일 기준
        if self.active_path.as_deref() != Some(path.as_path()) {
            if self.active_path.is_some() {
                tracing::info!(path = %path.display(), "auth log source changed, resetting cursor");
            }
            self.active_path = Some(path.clone());
            self.offset = 0;
        }

        let io_err = |source: std::io::Error| PipelineError::Io {
            path: path.display().to_string(),
            source,
        };

        if file_len < self.offset {
            // 로테이션: 파일이 잘렸으므로 처음부터 다시 읽음
            counter!(TAILER_ROTATIONS_TOTAL).increment(1);
            tracing::info!(
                path = %path.display(),
                old_offset = self.offset,
                new_size = file_len,
                "log rotation detected, resetting cursor"
            );
            self.offset = 0;
        }
        if file_len == self.offset {
            return Ok(0);
        }

        file.seek(SeekFrom::Start(self.offset))
            .await
            .map_err(io_err)?;
        let mut chunk = Vec::new();
        file.read_to_end(&mut chunk).await.map_err(io_err)?;

        // 마지막 개행까지만 소비, 미완성 꼬리는 다음 스캔으로
        let Some(last_newline) = chunk.iter().rposition(|&b| b == b'\n') else {
            return Ok(0);
        };
        let consumed = last_newline + 1;
        let text = String::from_utf8_lossy(&chunk[..consumed]);

        let mut classified_count = 0;
        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            counter!(TAILER_LINES_SCANNED_TOTAL).increment(1);
            if line.len() > self.config.max_line_length {
                tracing::debug!(length = line.len(), "skipping over-long log line");
                continue;
            }
            if let Some(classified) = self.classifier.classify(line) {
                counter!(CLASSIFIER_EVENTS_TOTAL, LABEL_KIND => classified.event.kind.as_str())
                    .increment(1);
                if let Some(attempt) = classified.attempt {
                    self.attempts.push(attempt);
                }
                self.buffer.push(classified.event);
                classified_count += 1;
            }
        }

        self.offset += consumed as u64;
        Ok(classified_count)
    }

    /// 누적된 로그인 시도를 회수하고 누산기를 비웁니다.
    pub fn take_attempts(&mut self) -> Vec<LoginAttempt> {
        std::mem::take(&mut self.attempts)
    }

    /// 현재 바이트 오프셋을 반환합니다.
    pub fn offset(&self) -> u64 {
        self.offset
    }
}
