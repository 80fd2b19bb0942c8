// tests/env_file.rs

use std::error::Error;
use std::time::Duration;

use procmux::config::{DEFAULT_GRACE_PERIOD, DEFAULT_MAX_LINE_LEN, Settings};
use procmux::env_file::{EnvOverrides, load_env_file, parse_env};
use procmux::types::ColorMode;
use procmux_test_utils::builders::TestWorkspace;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn parses_assignments_and_skips_noise() {
    let env = parse_env(
        r#"
# database
FOO=bar
export PORT=8080
QUOTED="hello world"
SINGLE='x=y'
EMPTY=
not an assignment
KEY = spaced
=novalue
1BAD=digit
"#,
    );

    assert_eq!(env.get("FOO"), Some("bar"));
    assert_eq!(env.get("PORT"), Some("8080"));
    assert_eq!(env.get("QUOTED"), Some("hello world"));
    assert_eq!(env.get("SINGLE"), Some("x=y"));
    assert_eq!(env.get("EMPTY"), Some(""));
    assert_eq!(env.get("KEY"), None);
    assert_eq!(env.get("1BAD"), None);
    assert_eq!(env.len(), 5);
}

#[test]
fn later_assignment_wins_and_keeps_position() {
    let env = parse_env("A=1\nB=2\nA=3\n");
    let pairs: Vec<_> = env.iter().collect();
    assert_eq!(pairs, vec![("A", "3"), ("B", "2")]);
}

#[test]
fn missing_env_file_means_no_overrides() -> TestResult {
    let ws = TestWorkspace::new();
    let env = load_env_file(&ws.join(".env"))?;
    assert!(env.is_empty());
    Ok(())
}

#[test]
fn env_file_is_loaded_from_disk() -> TestResult {
    let ws = TestWorkspace::new();
    ws.write_env("FOO=bar\r\n# c\r\nBAZ=qux\r\n");

    let env = load_env_file(&ws.paths().env_file)?;
    assert_eq!(env.get("FOO"), Some("bar"));
    assert_eq!(env.get("BAZ"), Some("qux"));
    Ok(())
}

#[test]
fn lines_that_are_not_utf8_are_skipped() -> TestResult {
    let ws = TestWorkspace::new();
    std::fs::write(ws.paths().env_file, b"FOO=bar\nBAD=\xff\xfe\nBAZ=qux\n")?;

    let env = load_env_file(&ws.paths().env_file)?;
    assert_eq!(env.get("FOO"), Some("bar"));
    assert_eq!(env.get("BAZ"), Some("qux"));
    assert_eq!(env.get("BAD"), None);
    assert_eq!(env.len(), 2);
    Ok(())
}

#[test]
fn settings_default_without_variables() {
    let settings = Settings::from_lookup(|_| None);
    assert_eq!(settings.max_line_len, DEFAULT_MAX_LINE_LEN);
    assert_eq!(settings.color, ColorMode::Auto);
    assert_eq!(settings.grace_period, DEFAULT_GRACE_PERIOD);
}

#[test]
fn settings_read_overrides() {
    let mut env = EnvOverrides::new();
    env.insert("PROCMUX_MAX_LINE", "80");
    env.insert("PROCMUX_COLOR", "never");
    env.insert("PROCMUX_GRACE_MS", "250");

    let settings = Settings::from_env(&env);
    assert_eq!(settings.max_line_len, 80);
    assert_eq!(settings.color, ColorMode::Never);
    assert_eq!(settings.grace_period, Duration::from_millis(250));
}

#[test]
fn invalid_settings_fall_back_to_defaults() {
    let settings = Settings::from_lookup(|key| match key {
        "PROCMUX_MAX_LINE" => Some("0".to_string()),
        "PROCMUX_COLOR" => Some("rainbow".to_string()),
        "PROCMUX_GRACE_MS" => Some("soon".to_string()),
        _ => None,
    });
    assert_eq!(settings, Settings::default());
}

#[test]
fn color_mode_parsing_and_resolution() {
    assert_eq!("always".parse::<ColorMode>(), Ok(ColorMode::Always));
    assert_eq!(" ON ".parse::<ColorMode>(), Ok(ColorMode::Always));
    assert_eq!("0".parse::<ColorMode>(), Ok(ColorMode::Never));
    assert_eq!("auto".parse::<ColorMode>(), Ok(ColorMode::Auto));
    assert!("sometimes".parse::<ColorMode>().is_err());

    assert!(ColorMode::Auto.enabled(true));
    assert!(!ColorMode::Auto.enabled(false));
    assert!(ColorMode::Always.enabled(false));
    assert!(!ColorMode::Never.enabled(true));
}
