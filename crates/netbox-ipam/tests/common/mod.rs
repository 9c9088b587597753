//! Shared helpers for HTTP-level tests

#![allow(dead_code, reason = "each test binary uses a different subset")]

use netbox_ipam::{Connection, ConnectionConfig, Fields};
use serde_json::Value;
use std::time::Duration;
use wiremock::MockServer;

pub const TOKEN: &str = "0123456789abcdef";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("netbox_ipam=debug")
        .try_init();
}

pub fn config(server: &MockServer) -> ConnectionConfig {
    ConnectionConfig::new(server.address().ip().to_string(), TOKEN)
        .with_tls(false)
        .with_port(server.address().port())
        .with_timeout(Duration::from_secs(5))
}

pub fn connection(server: &MockServer) -> Connection {
    init_tracing();
    Connection::new(&config(server)).unwrap()
}

pub fn fields(value: Value) -> Fields {
    value.as_object().cloned().unwrap()
}
