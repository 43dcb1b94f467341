//! 설정 로딩 통합 테스트
//!
//! 파일 로딩, 부분 섹션 병합, 환경변수 오버라이드 우선순위,
//! 예시 설정 파일(hostwatch.toml.example)의 유효성을 검증합니다.

use hostwatch_core::{ConfigError, HostwatchConfig, HostwatchError};

/// 저장소 루트의 예시 설정 파일
const EXAMPLE_CONFIG: &str = include_str!("../../../hostwatch.toml.example");

#[test]
fn example_config_parses_and_validates() {
    let config = HostwatchConfig::parse(EXAMPLE_CONFIG).unwrap();
    config.validate().unwrap();
}

#[test]
fn example_config_matches_code_defaults() {
    // 예시 파일의 값과 Default 구현이 어긋나면 문서가 거짓말을 하는 것
    let from_example = HostwatchConfig::parse(EXAMPLE_CONFIG).unwrap();
    let defaults = HostwatchConfig::default();

    assert_eq!(from_example.general.log_level, defaults.general.log_level);
    assert_eq!(from_example.general.log_format, defaults.general.log_format);
    assert_eq!(from_example.api.endpoint, defaults.api.endpoint);
    assert_eq!(from_example.api.timeout_secs, defaults.api.timeout_secs);
    assert_eq!(
        from_example.tailer.auth_log_path,
        defaults.tailer.auth_log_path
    );
    assert_eq!(
        from_example.tailer.fallback_path,
        defaults.tailer.fallback_path
    );
    assert_eq!(from_example.buffer.capacity, defaults.buffer.capacity);
    assert_eq!(
        from_example.scheduler.heartbeat_interval_secs,
        defaults.scheduler.heartbeat_interval_secs
    );
    assert_eq!(
        from_example.collector.disk_path,
        defaults.collector.disk_path
    );
    assert_eq!(
        from_example.collector.cpu_sample_ms,
        defaults.collector.cpu_sample_ms
    );
    assert_eq!(from_example.actions.auto_ban, defaults.actions.auto_ban);
}

#[tokio::test]
async fn from_file_loads_written_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hostwatch.toml");
    std::fs::write(
        &path,
        r#"
[api]
endpoint = "https://collector.internal:8443/api/v1/agents/heartbeat"
token = "file-token"

[buffer]
capacity = 200
"#,
    )
    .unwrap();

    let config = HostwatchConfig::from_file(&path).await.unwrap();
    assert_eq!(
        config.api.endpoint,
        "https://collector.internal:8443/api/v1/agents/heartbeat"
    );
    assert_eq!(config.api.token, "file-token");
    assert_eq!(config.buffer.capacity, 200);
    // 생략된 섹션은 기본값
    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.scheduler.heartbeat_interval_secs, 30);
}

#[tokio::test]
async fn from_file_missing_returns_file_not_found() {
    let result = HostwatchConfig::from_file("/nonexistent/dir/hostwatch.toml").await;
    match result.unwrap_err() {
        HostwatchError::Config(ConfigError::FileNotFound { path }) => {
            assert!(path.contains("hostwatch.toml"));
        }
        other => panic!("expected FileNotFound, got: {other}"),
    }
}

#[tokio::test]
async fn from_file_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hostwatch.toml");
    std::fs::write(
        &path,
        r#"
[scheduler]
heartbeat_interval_secs = 0
"#,
    )
    .unwrap();

    let err = HostwatchConfig::from_file(&path).await.unwrap_err();
    assert!(err.to_string().contains("heartbeat_interval_secs"));
}

#[test]
fn comments_and_whitespace_only_toml_yields_defaults() {
    let toml = r#"
# 주석만 있는 설정 파일

# [api]
# endpoint = "https://commented-out.example/heartbeat"
"#;
    let config = HostwatchConfig::parse(toml).unwrap();
    assert_eq!(config.api.endpoint, HostwatchConfig::default().api.endpoint);
}

#[test]
fn wrong_type_field_is_a_parse_error() {
    let toml = r#"
[buffer]
capacity = "not-a-number"
"#;
    let result = HostwatchConfig::parse(toml);
    assert!(matches!(
        result.unwrap_err(),
        HostwatchError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[test]
fn unknown_section_is_ignored() {
    let toml = r#"
[future_section]
some_key = true

[buffer]
capacity = 42
"#;
    let config = HostwatchConfig::parse(toml).unwrap();
    assert_eq!(config.buffer.capacity, 42);
}

#[tokio::test]
#[serial_test::serial]
async fn load_applies_env_over_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hostwatch.toml");
    std::fs::write(
        &path,
        r#"
[api]
token = "from-file"

[scheduler]
heartbeat_interval_secs = 45
"#,
    )
    .unwrap();

    let saved_token = std::env::var("HOSTWATCH_API_TOKEN").ok();
    let saved_interval = std::env::var("HOSTWATCH_SCHEDULER_HEARTBEAT_INTERVAL_SECS").ok();
    // SAFETY: #[serial] 하에서 단일 스레드로 실행되므로 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("HOSTWATCH_API_TOKEN", "from-env");
        std::env::set_var("HOSTWATCH_SCHEDULER_HEARTBEAT_INTERVAL_SECS", "90");
    }

    let config = HostwatchConfig::load(&path).await.unwrap();

    // SAFETY: 테스트 정리
    unsafe {
        match saved_token {
            Some(v) => std::env::set_var("HOSTWATCH_API_TOKEN", v),
            None => std::env::remove_var("HOSTWATCH_API_TOKEN"),
        }
        match saved_interval {
            Some(v) => std::env::set_var("HOSTWATCH_SCHEDULER_HEARTBEAT_INTERVAL_SECS", v),
            None => std::env::remove_var("HOSTWATCH_SCHEDULER_HEARTBEAT_INTERVAL_SECS"),
        }
    }

    assert_eq!(config.api.token, "from-env");
    assert_eq!(config.scheduler.heartbeat_interval_secs, 90);
}

#[test]
#[serial_test::serial]
fn env_override_applies_all_sections() {
    let keys = [
        ("HOSTWATCH_GENERAL_LOG_LEVEL", "debug"),
        ("HOSTWATCH_API_ENDPOINT", "https://env.example/heartbeat"),
        ("HOSTWATCH_TAILER_AUTH_LOG_PATH", "/tmp/auth.log"),
        ("HOSTWATCH_BUFFER_CAPACITY", "123"),
        ("HOSTWATCH_COLLECTOR_DISK_PATH", "/data"),
        ("HOSTWATCH_ACTIONS_AUTO_BAN", "true"),
    ];
    let saved: Vec<Option<String>> = keys
        .iter()
        .map(|(k, _)| std::env::var(k).ok())
        .collect();
    // SAFETY: #[serial] 하에서 단일 스레드로 실행되므로 환경변수 조작이 안전합니다.
    unsafe {
        for (k, v) in keys {
            std::env::set_var(k, v);
        }
    }

    let mut config = HostwatchConfig::default();
    config.apply_env_overrides();

    // SAFETY: 테스트 정리
    unsafe {
        for ((k, _), old) in keys.iter().zip(saved) {
            match old {
                Some(v) => std::env::set_var(k, v),
                None => std::env::remove_var(k),
            }
        }
    }

    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.api.endpoint, "https://env.example/heartbeat");
    assert_eq!(config.tailer.auth_log_path, "/tmp/auth.log");
    assert_eq!(config.buffer.capacity, 123);
    assert_eq!(config.collector.disk_path, "/data");
    assert!(config.actions.auto_ban);
}

#[test]
#[serial_test::serial]
fn env_override_invalid_number_keeps_file_value() {
    let saved = std::env::var("HOSTWATCH_BUFFER_CAPACITY").ok();
    // SAFETY: #[serial] 하에서 단일 스레드로 실행되므로 환경변수 조작이 안전합니다.
    unsafe { std::env::set_var("HOSTWATCH_BUFFER_CAPACITY", "tons") };

    let mut config = HostwatchConfig::parse("[buffer]\ncapacity = 777\n").unwrap();
    config.apply_env_overrides();

    // SAFETY: 테스트 정리
    unsafe {
        match saved {
            Some(v) => std::env::set_var("HOSTWATCH_BUFFER_CAPACITY", v),
            None => std::env::remove_var("HOSTWATCH_BUFFER_CAPACITY"),
        }
    }

    assert_eq!(config.buffer.capacity, 777);
}

#[test]
fn serialize_roundtrip_preserves_all_sections() {
    let mut config = HostwatchConfig::default();
    config.api.token = "round-trip".to_owned();
    config.actions.auto_ban = true;
    config.collector.cpu_sample_ms = 100;

    let toml_str = toml::to_string_pretty(&config).unwrap();
    let parsed = HostwatchConfig::parse(&toml_str).unwrap();

    assert_eq!(parsed.api.token, "round-trip");
    assert!(parsed.actions.auto_ban);
    assert_eq!(parsed.collector.cpu_sample_ms, 100);
    assert_eq!(parsed.tailer.fallback_path, config.tailer.fallback_path);
}
