//! # Config Binder
//!
//! Turns a validated document into a [`BoundConfig`]. The binder performs
//! no shape validation of its own: it only converts numbers to their
//! working types, resolves daemon and machine names, and substitutes the
//! not-configured marker for absent optional sections.
//!
//! A [`ValidatedDocument`] can only be obtained from [`validate_config`], so
//! the binder cannot be handed a document that skipped validation. If the
//! document or the registry nevertheless disagree with what validation saw
//! (a registry swapped between the two steps), binding fails with a
//! [`BindError`] and is not retried.

use std::collections::BTreeMap;

use mountd_core::{DaemonRegistry, MachineRegistry};
use mountd_schema::{InstancePath, SchemaValidationError, Validator};
use serde_json::{Map, Value};

use crate::bound::{
    BoundConfig, ControllerFanConfig, EndstopConfig, InterfaceConfig, OrientationConfig, Section,
    StatusLightConfig, StepperConfig, TrackingConfig, UartConfig,
};
use crate::error::{BindError, ConfigError};
use crate::keywords::mount_keywords;
use crate::variant::SchemaVariant;

/// A document that passed validation against `variant`'s root schema.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedDocument<'v> {
    value: &'v Value,
    variant: SchemaVariant,
}

impl<'v> ValidatedDocument<'v> {
    pub fn value(&self) -> &'v Value {
        self.value
    }

    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    #[cfg(test)]
    pub(crate) fn assume_valid(value: &'v Value, variant: SchemaVariant) -> Self {
        Self { value, variant }
    }
}

/// Validate `document` against the root schema of `variant`.
///
/// `source_name` labels the document in the returned error.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] carrying every violation, unknown
/// daemon and machine names included, or [`ConfigError::Engine`] if the
/// schema uses an unregistered keyword.
pub fn validate_config<'v>(
    source_name: &str,
    document: &'v Value,
    variant: SchemaVariant,
    daemons: &dyn DaemonRegistry,
    machines: &dyn MachineRegistry,
) -> Result<ValidatedDocument<'v>, ConfigError> {
    let keywords = mount_keywords(daemons, machines);
    let outcome =
        Validator::new(&keywords).validate_document(variant.name(), document, variant.schema());

    match outcome {
        Ok(()) => {
            tracing::debug!(source = source_name, %variant, "config passed validation");
            Ok(ValidatedDocument {
                value: document,
                variant,
            })
        }
        Err(SchemaValidationError::ValidationFailed { violations, .. }) => {
            tracing::warn!(
                source = source_name,
                %variant,
                violations = violations.len(),
                "config failed validation"
            );
            Err(ConfigError::Invalid {
                source_name: source_name.to_string(),
                variant: variant.to_string(),
                violations,
            })
        }
        Err(SchemaValidationError::Engine(e)) => Err(ConfigError::Engine(e)),
    }
}

/// Binds validated documents using the hosting process's registries.
#[derive(Clone, Copy)]
pub struct Binder<'a> {
    daemons: &'a dyn DaemonRegistry,
    machines: &'a dyn MachineRegistry,
}

impl<'a> Binder<'a> {
    pub fn new(daemons: &'a dyn DaemonRegistry, machines: &'a dyn MachineRegistry) -> Self {
        Self { daemons, machines }
    }

    /// Produce the typed configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Registry`] if a name no longer resolves, or
    /// [`BindError::Precondition`] if the document lacks a value that
    /// validation guarantees.
    pub fn bind(&self, document: ValidatedDocument<'_>) -> Result<BoundConfig, BindError> {
        let root = Fields::root(document.value)?;

        let daemon = self.daemons.resolve_daemon(root.str("daemon")?)?;
        let control_machines = root
            .array("control_machines")?
            .iter()
            .enumerate()
            .map(|(index, value)| -> Result<_, BindError> {
                let name = value.as_str().ok_or_else(|| {
                    precondition(&root.path.key("control_machines").index(index), "string")
                })?;
                Ok(self.machines.resolve_machine(name)?)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let config = BoundConfig {
            variant: document.variant,
            daemon,
            log_name: root.string("log_name")?,
            control_machines,
            serial_port: root.string("serial_port")?,
            serial_baud: root.u32("serial_baud")?,
            latitude: root.f64("latitude")?,
            longitude: root.f64("longitude")?,
            altitude: root.f64("altitude")?,
            connect_timeout: root.f64("connect_timeout")?,
            move_timeout: root.f64("move_timeout")?,
            home_timeout: root.f64("home_timeout")?,
            controller_fan: root.section("controller_fan", bind_controller_fan)?,
            status_light: root.section("status_light", bind_status_light)?,
            interfaces: root.section("interfaces", bind_interfaces)?,
            orientation: root.section("orientation", bind_orientation)?,
            ha: bind_stepper(&root.object("ha")?)?,
            dec: bind_stepper(&root.object("dec")?)?,
            focus: bind_stepper(&root.object("focus")?)?,
        };

        tracing::info!(
            daemon = %config.daemon.name,
            variant = %config.variant,
            control_machines = config.control_machines.len(),
            "bound mount configuration"
        );
        Ok(config)
    }
}

fn bind_stepper(axis: &Fields<'_>) -> Result<StepperConfig, BindError> {
    let endstop = if axis.has("endstop_pin") {
        Section::Configured(EndstopConfig {
            pin: axis.string("endstop_pin")?,
            position: axis.string("endstop_pos")?,
        })
    } else {
        Section::NotConfigured
    };

    let tracking = if axis.has("tracking_cadence") {
        Section::Configured(TrackingConfig {
            cadence: axis.f64("tracking_cadence")?,
            commit_buffer: axis.f64("tracking_commit_buffer")?,
        })
    } else {
        Section::NotConfigured
    };

    // `interface` and the UART fields are co-dependent, so one key decides.
    let uart = if axis.has("interface") {
        Section::Configured(UartConfig {
            interface: axis.string("interface")?,
            address: axis.u8("uart_address")?,
            microsteps: axis.u16("uart_microsteps")?,
            run_current: axis.f64("uart_run_current")?,
        })
    } else {
        tracing::debug!(axis = %axis.path, "stepper has no UART driver configured");
        Section::NotConfigured
    };

    Ok(StepperConfig {
        step_pin: axis.string("step_pin")?,
        dir_pin: axis.string("dir_pin")?,
        enable_pin: axis.string("enable_pin")?,
        rotation_microsteps: axis.u32("rotation_microsteps")?,
        rotation_distance: axis.f64("rotation_distance")?,
        position_min: axis.f64("position_min")?,
        position_max: axis.f64("position_max")?,
        speed: axis.f64("speed")?,
        acceleration: axis.f64("acceleration")?,
        homing_backoff: axis.f64("homing_backoff")?,
        endstop,
        tracking,
        uart,
    })
}

fn bind_controller_fan(fan: &Fields<'_>) -> Result<ControllerFanConfig, BindError> {
    Ok(ControllerFanConfig {
        pin: fan.string("pin")?,
        idle_timeout: fan.f64("idle_timeout")?,
    })
}

fn bind_status_light(light: &Fields<'_>) -> Result<StatusLightConfig, BindError> {
    Ok(StatusLightConfig {
        pin: light.string("pin")?,
        led_count: light.u32("led_count")?,
        brightness: light.optional(|l| l.f64("brightness"), "brightness")?,
    })
}

fn bind_interfaces(map: &Fields<'_>) -> Result<BTreeMap<String, InterfaceConfig>, BindError> {
    map.map
        .keys()
        .map(|name| -> Result<(String, InterfaceConfig), BindError> {
            let entry = map.object(name)?;
            let interface = match entry.map.get("type").and_then(Value::as_str) {
                None | Some("tmc2209") => InterfaceConfig::Tmc2209 {
                    uart_pin: entry.string("uart_pin")?,
                    tx_pin: entry.optional(|e| e.string("tx_pin"), "tx_pin")?,
                },
                Some(_) => {
                    return Err(precondition(&entry.path.key("type"), "a supported interface type"))
                }
            };
            Ok((name.clone(), interface))
        })
        .collect()
}

fn bind_orientation(sensor: &Fields<'_>) -> Result<OrientationConfig, BindError> {
    let calibration = if sensor.has("calibration") {
        let path = sensor.path.key("calibration");
        let values = sensor
            .array("calibration")?
            .iter()
            .enumerate()
            .map(|(i, v)| v.as_f64().ok_or_else(|| precondition(&path.index(i), "number")))
            .collect::<Result<Vec<f64>, BindError>>()?;
        Some(values)
    } else {
        None
    };

    Ok(OrientationConfig {
        i2c_bus: sensor.string("i2c_bus")?,
        calibration,
    })
}

fn precondition(path: &InstancePath, expected: &str) -> BindError {
    BindError::Precondition {
        path: path.to_string(),
        expected: expected.to_string(),
    }
}

/// Typed field access on one object of a validated document.
struct Fields<'v> {
    map: &'v Map<String, Value>,
    path: InstancePath,
}

impl<'v> Fields<'v> {
    fn root(value: &'v Value) -> Result<Self, BindError> {
        let map = value
            .as_object()
            .ok_or_else(|| precondition(&InstancePath::root(), "object"))?;
        Ok(Self {
            map,
            path: InstancePath::root(),
        })
    }

    fn has(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    fn get(&self, key: &str, expected: &str) -> Result<&'v Value, BindError> {
        self.map
            .get(key)
            .ok_or_else(|| precondition(&self.path.key(key), expected))
    }

    fn str(&self, key: &str) -> Result<&'v str, BindError> {
        self.get(key, "string")?
            .as_str()
            .ok_or_else(|| precondition(&self.path.key(key), "string"))
    }

    fn string(&self, key: &str) -> Result<String, BindError> {
        self.str(key).map(str::to_string)
    }

    fn f64(&self, key: &str) -> Result<f64, BindError> {
        self.get(key, "number")?
            .as_f64()
            .ok_or_else(|| precondition(&self.path.key(key), "number"))
    }

    /// Integral value converted to `T`; integral floats such as `16.0` count.
    fn integer<T: TryFrom<u64>>(&self, key: &str, expected: &str) -> Result<T, BindError> {
        let value = self.get(key, expected)?;
        let whole = value.as_u64().or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        });
        whole
            .and_then(|n| T::try_from(n).ok())
            .ok_or_else(|| precondition(&self.path.key(key), expected))
    }

    fn u8(&self, key: &str) -> Result<u8, BindError> {
        self.integer(key, "integer in u8 range")
    }

    fn u16(&self, key: &str) -> Result<u16, BindError> {
        self.integer(key, "integer in u16 range")
    }

    fn u32(&self, key: &str) -> Result<u32, BindError> {
        self.integer(key, "integer in u32 range")
    }

    fn array(&self, key: &str) -> Result<&'v Vec<Value>, BindError> {
        self.get(key, "array")?
            .as_array()
            .ok_or_else(|| precondition(&self.path.key(key), "array"))
    }

    fn object(&self, key: &str) -> Result<Fields<'v>, BindError> {
        let map = self
            .get(key, "object")?
            .as_object()
            .ok_or_else(|| precondition(&self.path.key(key), "object"))?;
        Ok(Fields {
            map,
            path: self.path.key(key),
        })
    }

    /// `read(self)` when `key` is present, `None` otherwise.
    fn optional<T>(
        &self,
        read: impl FnOnce(&Self) -> Result<T, BindError>,
        key: &str,
    ) -> Result<Option<T>, BindError> {
        if self.has(key) {
            read(self).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Bind an optional object section, or the not-configured marker.
    fn section<T>(
        &self,
        key: &str,
        bind: impl FnOnce(&Fields<'v>) -> Result<T, BindError>,
    ) -> Result<Section<T>, BindError> {
        if !self.has(key) {
            tracing::debug!(section = key, "section not configured");
            return Ok(Section::NotConfigured);
        }
        bind(&self.object(key)?).map(Section::Configured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mountd_core::{Registry, RegistryError};
    use serde_json::json;
    use std::net::{IpAddr, Ipv4Addr};

    fn registry() -> Registry {
        Registry::new()
            .with_daemon("mount", IpAddr::V4(Ipv4Addr::new(10, 2, 6, 200)), 9036)
            .with_machine("tcs", IpAddr::V4(Ipv4Addr::new(10, 2, 6, 100)))
            .with_machine("backup", IpAddr::V4(Ipv4Addr::new(10, 2, 6, 101)))
    }

    fn axis() -> Value {
        json!({
            "step_pin": "PF0", "dir_pin": "PF1", "enable_pin": "PD7",
            "rotation_microsteps": 3200, "rotation_distance": 360,
            "position_min": -180, "position_max": 180,
            "speed": 5, "acceleration": 10, "homing_backoff": 5
        })
    }

    fn document() -> Value {
        json!({
            "daemon": "mount",
            "log_name": "mountd",
            "control_machines": ["tcs", "backup"],
            "serial_port": "/dev/ttyACM0",
            "serial_baud": 250000,
            "latitude": 28.76,
            "longitude": -17.88,
            "altitude": 2326,
            "connect_timeout": 5,
            "move_timeout": 60,
            "home_timeout": 120,
            "ha": axis(),
            "dec": axis(),
            "focus": axis()
        })
    }

    fn bind(document: &Value) -> Result<BoundConfig, BindError> {
        let registry = registry();
        Binder::new(&registry, &registry).bind(ValidatedDocument::assume_valid(
            document,
            SchemaVariant::Baseline,
        ))
    }

    #[test]
    fn test_bind_minimal_document() {
        let config = bind(&document()).unwrap();
        assert_eq!(config.daemon.port, 9036);
        assert_eq!(config.serial_baud, 250_000);
        assert_eq!(config.altitude, 2326.0);
        assert_eq!(config.control_machines.len(), 2);
        assert_eq!(config.control_machines[1].name.as_str(), "backup");
        assert_eq!(config.ha.rotation_microsteps, 3200);
        assert_eq!(config.move_timeout().as_secs(), 60);
    }

    #[test]
    fn test_absent_sections_bind_to_marker() {
        let config = bind(&document()).unwrap();
        assert_eq!(config.controller_fan, Section::NotConfigured);
        assert_eq!(config.status_light, Section::NotConfigured);
        assert_eq!(config.interfaces, Section::NotConfigured);
        assert_eq!(config.orientation, Section::NotConfigured);
        for (_, stepper) in config.axes() {
            assert_eq!(stepper.uart, Section::NotConfigured);
            assert_eq!(stepper.endstop, Section::NotConfigured);
            assert_eq!(stepper.tracking, Section::NotConfigured);
        }
    }

    #[test]
    fn test_bind_optional_sections() {
        let mut doc = document();
        doc["controller_fan"] = json!({"pin": "PE5", "idle_timeout": 30});
        doc["interfaces"] = json!({
            "ha_uart": {"type": "tmc2209", "uart_pin": "PC11", "tx_pin": "PC10"},
            "dec_uart": {"uart_pin": "PC12"}
        });
        doc["orientation"] = json!({"i2c_bus": "i2c1", "calibration": [0,1,2,3,4,5,6,7,8,9,10,11]});
        doc["ha"]["interface"] = json!("ha_uart");
        doc["ha"]["uart_address"] = json!(2);
        doc["ha"]["uart_microsteps"] = json!(16);
        doc["ha"]["uart_run_current"] = json!(0.8);
        doc["ha"]["endstop_pin"] = json!("PG6");
        doc["ha"]["endstop_pos"] = json!("max");

        let config = bind(&doc).unwrap();
        assert_eq!(
            config.controller_fan.get().unwrap(),
            &ControllerFanConfig {
                pin: "PE5".to_string(),
                idle_timeout: 30.0
            }
        );
        let interfaces = config.interfaces.get().unwrap();
        assert_eq!(
            interfaces["dec_uart"],
            InterfaceConfig::Tmc2209 {
                uart_pin: "PC12".to_string(),
                tx_pin: None
            }
        );
        assert_eq!(
            config.orientation.get().unwrap().calibration.as_ref().unwrap().len(),
            12
        );
        let uart = config.ha.uart.get().unwrap();
        assert_eq!(uart.interface, "ha_uart");
        assert_eq!(uart.address, 2);
        assert_eq!(uart.microsteps, 16);
        assert_eq!(config.ha.endstop.get().unwrap().position, "max");
        assert!(!config.dec.uart.is_configured());
    }

    #[test]
    fn test_integral_float_binds_as_integer() {
        let mut doc = document();
        doc["serial_baud"] = json!(250000.0);
        assert_eq!(bind(&doc).unwrap().serial_baud, 250_000);
    }

    #[test]
    fn test_registry_race_is_fatal() {
        let mut doc = document();
        doc["daemon"] = json!("dome");
        assert_eq!(
            bind(&doc).unwrap_err(),
            BindError::Registry(RegistryError::UnknownDaemon("dome".to_string()))
        );

        let mut doc = document();
        doc["control_machines"] = json!(["tcs", "laptop"]);
        assert_eq!(
            bind(&doc).unwrap_err(),
            BindError::Registry(RegistryError::UnknownMachine("laptop".to_string()))
        );
    }

    #[test]
    fn test_missing_field_is_precondition_error() {
        let mut doc = document();
        doc["focus"].as_object_mut().unwrap().remove("speed");
        match bind(&doc).unwrap_err() {
            BindError::Precondition { path, expected } => {
                assert_eq!(path, "/focus/speed");
                assert_eq!(expected, "number");
            }
            other => panic!("Expected Precondition, got: {other}"),
        }
    }

    #[test]
    fn test_out_of_range_integer_is_precondition_error() {
        let mut doc = document();
        doc["ha"]["interface"] = json!("ha_uart");
        doc["ha"]["uart_address"] = json!(300);
        doc["ha"]["uart_microsteps"] = json!(16);
        doc["ha"]["uart_run_current"] = json!(0.8);
        let err = bind(&doc).unwrap_err();
        assert!(err.to_string().contains("/ha/uart_address"));
    }

    #[test]
    fn test_validate_config_rejects_before_binding() {
        let registry = registry();
        let mut doc = document();
        doc["daemon"] = json!("dome");
        let err = validate_config("test", &doc, SchemaVariant::Baseline, &registry, &registry)
            .unwrap_err();
        let violations = err.violations().unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations.violations()[0].path.to_string(), "/daemon");
    }

    #[test]
    fn test_validate_then_bind() {
        let registry = registry();
        let doc = document();
        let validated =
            validate_config("test", &doc, SchemaVariant::Baseline, &registry, &registry).unwrap();
        assert_eq!(validated.variant(), SchemaVariant::Baseline);
        let config = Binder::new(&registry, &registry).bind(validated).unwrap();
        assert_eq!(config.log_name, "mountd");
    }
}
