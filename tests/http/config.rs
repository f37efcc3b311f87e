use core::time::Duration;

use libiot_http::network::application::http::{Config, Error};

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.admission_capacity, 1);
    assert_eq!(config.send_timeout(), Duration::from_millis(10));
    assert_eq!(config.wait_timeout(), Duration::from_secs(5));
}

#[test]
fn test_partial_document_keeps_defaults() {
    let config = Config::from_json(br#"{"send_timeout_ms":0,"wait_timeout_ms":250}"#).unwrap();
    assert_eq!(config.admission_capacity, 1);
    assert_eq!(config.send_timeout(), Duration::ZERO);
    assert_eq!(config.wait_timeout(), Duration::from_millis(250));

    assert_eq!(Config::from_json(b"{}"), Ok(Config::default()));
}

#[test]
fn test_malformed_documents() {
    for json in [
        &b"not json"[..],
        br#"{"admission_capacity":-1}"#,
        br#"{"admission_capacity":"two"}"#,
        br#"{"wait_timeout_ms":1"#,
        b"",
    ] {
        assert_eq!(Config::from_json(json), Err(Error::InvalidConfig));
    }
}

#[test]
fn test_to_json_round_trip() {
    let config = Config {
        admission_capacity: 3,
        send_timeout_ms: 0,
        wait_timeout_ms: 1200,
    };
    let mut buf = [0u8; 128];
    let n = config.to_json(&mut buf).unwrap();
    assert_eq!(
        &buf[..n],
        br#"{"admission_capacity":3,"send_timeout_ms":0,"wait_timeout_ms":1200}"#
    );
    assert_eq!(Config::from_json(&buf[..n]), Ok(config));
}

#[test]
fn test_to_json_buffer_too_small() {
    let mut buf = [0u8; 8];
    assert_eq!(Config::default().to_json(&mut buf), Err(Error::InvalidConfig));
}
