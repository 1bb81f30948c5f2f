//! Shared fixtures for the mount configuration integration tests.

#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr};

use mountd_core::Registry;
use mountd_schema::{ValidationError, ValidationViolations};
use serde_json::{json, Value};

pub fn registry() -> Registry {
    Registry::new()
        .with_daemon("mount", IpAddr::V4(Ipv4Addr::new(10, 2, 6, 200)), 9036)
        .with_daemon("dome", IpAddr::V4(Ipv4Addr::new(10, 2, 6, 200)), 9037)
        .with_machine("tcs", IpAddr::V4(Ipv4Addr::new(10, 2, 6, 100)))
}

/// A stepper block with only the always-required fields.
pub fn minimal_axis() -> Value {
    json!({
        "step_pin": "PF0",
        "dir_pin": "PF1",
        "enable_pin": "PD7",
        "rotation_microsteps": 3200,
        "rotation_distance": 360,
        "position_min": -180,
        "position_max": 180,
        "speed": 5,
        "acceleration": 10,
        "homing_backoff": 5
    })
}

/// An axis block satisfying the extended variant's requirements.
pub fn homing_tracking_axis() -> Value {
    let mut axis = minimal_axis();
    axis["endstop_pin"] = json!("PG6");
    axis["endstop_pos"] = json!("min");
    axis["tracking_cadence"] = json!(1.0);
    axis["tracking_commit_buffer"] = json!(0.5);
    axis
}

/// A document with every required top-level key and minimal axes.
pub fn minimal_document() -> Value {
    json!({
        "daemon": "mount",
        "log_name": "mountd",
        "control_machines": ["tcs"],
        "serial_port": "/dev/ttyACM0",
        "serial_baud": 250000,
        "latitude": 28.76,
        "longitude": -17.88,
        "altitude": 2326,
        "connect_timeout": 5,
        "move_timeout": 60,
        "home_timeout": 120,
        "ha": minimal_axis(),
        "dec": minimal_axis(),
        "focus": minimal_axis()
    })
}

pub fn extended_document() -> Value {
    let mut doc = minimal_document();
    doc["ha"] = homing_tracking_axis();
    doc["dec"] = homing_tracking_axis();
    doc["focus"] = homing_tracking_axis();
    doc
}

pub fn paths(violations: &ValidationViolations) -> Vec<String> {
    violations.into_iter().map(|v| v.path.to_string()).collect()
}

pub fn find<'a>(violations: &'a ValidationViolations, path: &str) -> Option<&'a ValidationError> {
    violations.into_iter().find(|v| v.path.to_string() == path)
}
