//! 디스크 사용률 — statvfs 기반
//!
//! 설정된 마운트 경로에 대해 `statvfs(3)`를 호출하여 사용률(%)을
//! 계산합니다. 사용자 가시 블록(`f_bavail`) 기준이므로 `df`의 출력과
//! 일치합니다.

use std::ffi::CString;
use std::path::Path;

/// 마운트 경로의 디스크 사용률(%)을 반환합니다.
///
/// 경로가 유효하지 않거나 statvfs가 실패하면 0.0으로 퇴화합니다.
/// 소수점 한 자리로 반올림됩니다.
pub fn disk_percent(path: &Path) -> f64 {
    let Some(path_str) = path.to_str() else {
        return 0.0;
    };
    let Ok(c_path) = CString::new(path_str) else {
        return 0.0;
    };

    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    // SAFETY: c_path는 널 종료 문자열이고 stat은 크기가 맞는 출력 버퍼입니다.
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
    if rc != 0 {
        tracing::debug!(path = %path.display(), "statvfs failed");
        return 0.0;
    }

    if stat.f_blocks == 0 {
        return 0.0;
    }
    let total = stat.f_blocks as f64;
    let available = stat.f_bavail as f64;
    let used_pct = (total - available) / total * 100.0;
    (used_pct * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_mount_yields_bounded_percentage() {
        let pct = disk_percent(Path::new("/"));
        assert!((0.0..=100.0).contains(&pct));
    }

    #[test]
    fn missing_path_degrades_to_zero() {
        assert_eq!(disk_percent(Path::new("/nonexistent/mount/point")), 0.0);
    }
}
