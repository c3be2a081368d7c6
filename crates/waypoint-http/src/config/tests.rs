// waypoint-http/src/config/tests.rs
// ============================================================================
// Module: Server Configuration Tests
// Description: Unit tests for configuration parsing and validation.
// Purpose: Ensure bad configuration fails closed.
// Dependencies: tempfile
// ============================================================================

//! ## Overview
//! Tests for TOML parsing, defaulting, and validation limits.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests assert invariants directly"
)]

use std::io::Write;

use super::*;

#[test]
fn defaults_are_valid() {
    let config = ServerConfig::default();
    config.validate().expect("default config validates");
    assert_eq!(config.bind, "127.0.0.1:8080");
    assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
}

#[test]
fn empty_toml_uses_defaults() {
    let config = ServerConfig::from_toml_str("").expect("empty config parses");
    assert_eq!(config.bind, "127.0.0.1:8080");
    assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
}

#[test]
fn explicit_values_parse() {
    let config = ServerConfig::from_toml_str("bind = \"0.0.0.0:9000\"\nmax_body_bytes = 4096\n")
        .expect("config parses");
    assert_eq!(config.bind, "0.0.0.0:9000");
    assert_eq!(config.max_body_bytes, 4096);
}

#[test]
fn invalid_bind_rejected() {
    let err = ServerConfig::from_toml_str("bind = \"not-an-address\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn zero_body_limit_rejected() {
    let err = ServerConfig::from_toml_str("max_body_bytes = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn oversized_body_limit_rejected() {
    let raw = format!("max_body_bytes = {}\n", MAX_BODY_BYTES_CEILING + 1);
    let err = ServerConfig::from_toml_str(&raw).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn malformed_toml_rejected() {
    let err = ServerConfig::from_toml_str("bind = [").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_reads_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "bind = \"127.0.0.1:7000\"").expect("write config");
    let config = ServerConfig::load(file.path()).expect("config loads");
    assert_eq!(config.bind, "127.0.0.1:7000");
}

#[test]
fn load_missing_file_fails() {
    let err = ServerConfig::load(Path::new("/nonexistent/waypoint.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
