//! /proc 파서 — CPU, 메모리, 가동 시간, OS 식별
//!
//! 파싱 로직은 순수 함수로 분리되어 고정 문자열로 테스트합니다.
//! 읽기 함수는 실패 시 0 값으로 퇴화합니다.

use std::time::Duration;

/// /proc/stat 첫 줄의 CPU 누계 샘플
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuSample {
    /// 전체 jiffies 합
    pub total: u64,
    /// idle + iowait jiffies
    pub idle: u64,
}

/// /proc/stat 내용에서 CPU 샘플을 파싱합니다.
///
/// `cpu  user nice system idle iowait irq softirq steal ...` 형식의
/// 집계 라인만 사용합니다.
pub fn parse_cpu_sample(stat: &str) -> Option<CpuSample> {
    let line = stat.lines().find(|l| l.starts_with("cpu "))?;
    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .filter_map(|f| f.parse().ok())
        .collect();
    if fields.len() < 5 {
        return None;
    }
    let total: u64 = fields.iter().sum();
    // idle(4번째) + iowait(5번째)
    let idle = fields[3] + fields[4];
    Some(CpuSample { total, idle })
}

/// 두 CPU 샘플 사이의 사용률(%)을 계산합니다.
///
/// 델타가 없으면 0.0을 반환합니다. 소수점 한 자리로 반올림됩니다.
pub fn cpu_percent(prev: CpuSample, curr: CpuSample) -> f64 {
    let total_delta = curr.total.saturating_sub(prev.total);
    if total_delta == 0 {
        return 0.0;
    }
    let idle_delta = curr.idle.saturating_sub(prev.idle);
    let busy = total_delta.saturating_sub(idle_delta) as f64;
    round1(busy / total_delta as f64 * 100.0)
}

/// /proc/meminfo 내용에서 RAM 사용률(%)을 파싱합니다.
///
/// `MemTotal`과 `MemAvailable` 기준이며, 파싱 실패 시 0.0입니다.
pub fn parse_mem_percent(meminfo: &str) -> f64 {
    let field = |name: &str| -> Option<u64> {
        meminfo
            .lines()
            .find(|l| l.starts_with(name))?
            .split_whitespace()
            .nth(1)?
            .parse()
            .ok()
    };
    let (Some(total), Some(available)) = (field("MemTotal:"), field("MemAvailable:")) else {
        return 0.0;
    };
    if total == 0 {
        return 0.0;
    }
    round1((total.saturating_sub(available)) as f64 / total as f64 * 100.0)
}

/// /proc/uptime 내용에서 가동 시간(초)을 파싱합니다.
pub fn parse_uptime_secs(uptime: &str) -> f64 {
    uptime
        .split_whitespace()
        .next()
        .and_then(|f| f.parse().ok())
        .unwrap_or(0.0)
}

/// 가동 시간을 사람이 읽는 형식으로 변환합니다.
///
/// `"2d 3h 14m"`, `"3h 14m"`, `"14m"` 형식을 사용합니다.
pub fn format_uptime(secs: f64) -> String {
    let total_minutes = (secs / 60.0) as u64;
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes % (24 * 60)) / 60;
    let minutes = total_minutes % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// /etc/os-release 내용에서 PRETTY_NAME을 파싱합니다.
pub fn parse_os_release(content: &str) -> Option<String> {
    let line = content.lines().find(|l| l.starts_with("PRETTY_NAME="))?;
    let value = line.strip_prefix("PRETTY_NAME=")?.trim();
    Some(value.trim_matches('"').to_owned())
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

// --- 비동기 읽기 (실패 시 0 값 퇴화) ---

/// 호스트명을 읽습니다. 실패 시 `"unknown"`.
pub async fn read_hostname() -> String {
    match tokio::fs::read_to_string("/proc/sys/kernel/hostname").await {
        Ok(s) => s.trim().to_owned(),
        Err(e) => {
            tracing::debug!(error = %e, "failed to read hostname");
            "unknown".to_owned()
        }
    }
}

/// OS 식별 문자열을 읽습니다. 실패 시 `"Linux"`.
pub async fn read_os_info() -> String {
    match tokio::fs::read_to_string("/etc/os-release").await {
        Ok(content) => parse_os_release(&content).unwrap_or_else(|| "Linux".to_owned()),
        Err(_) => "Linux".to_owned(),
    }
}

/// CPU 사용률을 측정합니다. 두 샘플 사이에 `sample_interval`만큼
/// 대기합니다. 실패 시 0.0.
pub async fn read_cpu_percent(sample_interval: Duration) -> f64 {
    let first = match tokio::fs::read_to_string("/proc/stat").await {
        Ok(s) => parse_cpu_sample(&s),
        Err(_) => None,
    };
    let Some(prev) = first else {
        return 0.0;
    };
    tokio::time::sleep(sample_interval).await;
    let second = match tokio::fs::read_to_string("/proc/stat").await {
        Ok(s) => parse_cpu_sample(&s),
        Err(_) => None,
    };
    match second {
        Some(curr) => cpu_percent(prev, curr),
        None => 0.0,
    }
}

/// RAM 사용률을 읽습니다. 실패 시 0.0.
pub async fn read_mem_percent() -> f64 {
    match tokio::fs::read_to_string("/proc/meminfo").await {
        Ok(content) => parse_mem_percent(&content),
        Err(_) => 0.0,
    }
}

/// 가동 시간 문자열을 읽습니다. 실패 시 `"0m"`.
pub async fn read_uptime() -> String {
    match tokio::fs::read_to_string("/proc/uptime").await {
        Ok(content) => format_uptime(parse_uptime_secs(&content)),
        Err(_) => "0m".to_owned(),
    }
}
