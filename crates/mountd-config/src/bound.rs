//! # Bound Configuration
//!
//! The typed configuration handed to the daemon's startup code. Every value
//! has been validated, converted to its working precision and, for names,
//! resolved against the registry. Optional sections are always present as
//! a [`Section`], so consumers check one marker instead of looking for
//! missing fields.

use std::collections::BTreeMap;
use std::time::Duration;

use mountd_core::{ControlMachine, DaemonDescriptor};
use serde::Serialize;

use crate::variant::SchemaVariant;

/// An optional configuration section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section<T> {
    /// The section was absent from the document.
    NotConfigured,
    /// The section was present and bound.
    Configured(T),
}

impl<T> Section<T> {
    pub fn is_configured(&self) -> bool {
        matches!(self, Section::Configured(_))
    }

    /// The bound value, if configured.
    pub fn get(&self) -> Option<&T> {
        match self {
            Section::Configured(value) => Some(value),
            Section::NotConfigured => None,
        }
    }
}

impl<T> From<Option<T>> for Section<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Section::NotConfigured, Section::Configured)
    }
}

/// Fully validated and resolved mount configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundConfig {
    /// Schema variant the document was validated against.
    pub variant: SchemaVariant,
    pub daemon: DaemonDescriptor,
    pub log_name: String,
    /// Machines allowed to issue commands, in document order.
    pub control_machines: Vec<ControlMachine>,
    pub serial_port: String,
    pub serial_baud: u32,
    /// Site latitude in degrees.
    pub latitude: f64,
    /// Site longitude in degrees.
    pub longitude: f64,
    /// Site altitude in metres.
    pub altitude: f64,
    /// Seconds.
    pub connect_timeout: f64,
    /// Seconds.
    pub move_timeout: f64,
    /// Seconds.
    pub home_timeout: f64,
    pub controller_fan: Section<ControllerFanConfig>,
    pub status_light: Section<StatusLightConfig>,
    pub interfaces: Section<BTreeMap<String, InterfaceConfig>>,
    pub orientation: Section<OrientationConfig>,
    pub ha: StepperConfig,
    pub dec: StepperConfig,
    pub focus: StepperConfig,
}

impl BoundConfig {
    pub fn connect_timeout(&self) -> Duration {
        seconds(self.connect_timeout)
    }

    pub fn move_timeout(&self) -> Duration {
        seconds(self.move_timeout)
    }

    pub fn home_timeout(&self) -> Duration {
        seconds(self.home_timeout)
    }

    /// The three axes paired with their block names.
    pub fn axes(&self) -> [(&'static str, &StepperConfig); 3] {
        [("ha", &self.ha), ("dec", &self.dec), ("focus", &self.focus)]
    }
}

/// Saturates instead of panicking on values `Duration` cannot hold.
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(if value > 0.0 {
        Duration::MAX
    } else {
        Duration::ZERO
    })
}

/// One stepper axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepperConfig {
    pub step_pin: String,
    pub dir_pin: String,
    pub enable_pin: String,
    /// Full steps per rotation multiplied by the microstep setting.
    pub rotation_microsteps: u32,
    /// Axis travel per rotation.
    pub rotation_distance: f64,
    pub position_min: f64,
    pub position_max: f64,
    pub speed: f64,
    pub acceleration: f64,
    pub homing_backoff: f64,
    pub endstop: Section<EndstopConfig>,
    pub tracking: Section<TrackingConfig>,
    pub uart: Section<UartConfig>,
}

/// Homing endstop switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndstopConfig {
    pub pin: String,
    /// `"max"` or `"min"`: which end of travel the switch sits at.
    pub position: String,
}

/// Sidereal tracking cadence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingConfig {
    pub cadence: f64,
    pub commit_buffer: f64,
}

/// UART driver parameters for a stepper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UartConfig {
    /// Name of the entry in the `interfaces` map.
    pub interface: String,
    pub address: u8,
    pub microsteps: u16,
    /// Amps.
    pub run_current: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerFanConfig {
    pub pin: String,
    /// Seconds without motion before the fan is switched off.
    pub idle_timeout: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusLightConfig {
    pub pin: String,
    pub led_count: u32,
    pub brightness: Option<f64>,
}

/// A named peripheral interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InterfaceConfig {
    /// TMC2209 driver over single-wire UART.
    Tmc2209 {
        uart_pin: String,
        tx_pin: Option<String>,
    },
}

/// I2C orientation sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrientationConfig {
    pub i2c_bus: String,
    /// Twelve calibration coefficients, when provided.
    pub calibration: Option<Vec<f64>>,
}
