//! 이벤트 버퍼링 -- 용량 제한 인메모리 FIFO 버퍼
//!
//! [`EventBuffer`]는 분류된 이벤트를 인메모리에 버퍼링하고,
//! 스케줄러가 틱마다 배치 단위로 드레인합니다.
//!
//! # 오버플로우 정책
//! 버퍼가 가득 차면 가장 오래된 이벤트를 드롭하고 새 이벤트를
//! 받아들입니다. 생산자에게는 에러가 전달되지 않습니다.
//!
//! # 동시성
//! 내부 뮤텍스로 보호되므로 생산자(테일러)와 드레이너(스케줄러)가
//! `Arc<EventBuffer>` 핸들 하나를 공유합니다. push와 drain은 같은
//! 임계 구역을 거치므로 드레인 도중의 push가 이벤트를 중복시키거나
//! 유실시키지 않습니다.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use metrics::{counter, gauge};

use hostwatch_core::Event;
use hostwatch_core::metrics::{BUFFER_EVENTS_DROPPED_TOTAL, BUFFER_SIZE};

/// 뮤텍스 내부 상태
struct Inner {
    /// 버퍼 내부 저장소
    queue: VecDeque<Event>,
    /// 드롭된 이벤트 카운터 (통계용)
    dropped_count: u64,
    /// 총 유입 이벤트 카운터
    total_received: u64,
}

/// 용량 제한 인메모리 이벤트 버퍼
///
/// 분류된 이벤트를 임시 저장하고, 틱 단위로 전송 경로에 전달합니다.
/// 용량이 초과되면 가장 오래된 이벤트부터 제거합니다.
pub struct EventBuffer {
    inner: Mutex<Inner>,
    /// 최대 용량
    capacity: usize,
}

impl EventBuffer {
    /// 새 이벤트 버퍼를 생성합니다.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                queue: VecDeque::with_capacity(capacity.min(10_000)),
                dropped_count: 0,
                total_received: 0,
            }),
            capacity,
        }
    }

    /// 내부 상태 잠금을 획득합니다.
    ///
    /// 생산자가 push 도중 패닉해도 버퍼 내용 자체는 일관되므로
    /// 포이즌 상태에서도 계속 사용합니다.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 이벤트를 버퍼에 추가합니다.
    ///
    /// 버퍼가 가득 찬 경우 가장 오래된 이벤트를 드롭합니다.
    /// 드롭이 발생하면 `true`를 반환합니다.
    pub fn push(&self, event: Event) -> bool {
        let mut inner = self.lock();
        inner.total_received += 1;

        // 용량 0이면 아무것도 보관하지 않고 유입 즉시 드롭
        if self.capacity == 0 {
            inner.dropped_count += 1;
            counter!(BUFFER_EVENTS_DROPPED_TOTAL).increment(1);
            drop(event);
            return true;
        }

        let mut dropped = false;
        if inner.queue.len() >= self.capacity {
            inner.queue.pop_front();
            inner.dropped_count += 1;
            dropped = true;
            counter!(BUFFER_EVENTS_DROPPED_TOTAL).increment(1);
            tracing::warn!(
                dropped = inner.dropped_count,
                capacity = self.capacity,
                "buffer full, dropped oldest event"
            );
        }

        inner.queue.push_back(event);
        gauge!(BUFFER_SIZE).set(inner.queue.len() as f64);
        dropped
    }

    /// 배치 크기만큼 또는 버퍼에 남은 만큼 이벤트를 드레인합니다.
    ///
    /// 버퍼가 비어있으면 빈 Vec을 반환합니다. 드레인된 배치는
    /// push된 순서를 유지합니다.
    pub fn drain_batch(&self, batch_size: usize) -> Vec<Event> {
        let mut inner = self.lock();
        let count = batch_size.min(inner.queue.len());
        let batch: Vec<Event> = inner.queue.drain(..count).collect();
        gauge!(BUFFER_SIZE).set(inner.queue.len() as f64);
        batch
    }

    /// 버퍼의 모든 이벤트를 드레인합니다.
    pub fn drain_all(&self) -> Vec<Event> {
        let mut inner = self.lock();
        let batch: Vec<Event> = inner.queue.drain(..).collect();
        gauge!(BUFFER_SIZE).set(0.0);
        batch
    }

    /// 현재 버퍼에 저장된 이벤트 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    /// 버퍼가 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }

    /// 버퍼 최대 용량을 반환합니다.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 지금까지 드롭된 이벤트 수를 반환합니다.
    pub fn dropped_count(&self) -> u64 {
        self.lock().dropped_count
    }

    /// 총 유입 이벤트 수를 반환합니다.
    pub fn total_received(&self) -> u64 {
        self.lock().total_received
    }

    /// 버퍼 사용률을 0.0~1.0 범위로 반환합니다.
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        f64::from(u32::try_from(self.lock().queue.len()).unwrap_or(u32::MAX))
            / f64::from(u32::try_from(self.capacity).unwrap_or(u32::MAX))
    }
}
