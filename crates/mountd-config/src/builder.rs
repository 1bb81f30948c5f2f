//! # Schema Builder Library
//!
//! Pure functions that assemble the mount configuration schema from
//! reusable fragments. The three stepper axes share [`stepper_axis_schema`],
//! each toggling its own [`StepperRequirements`], so near-identical blocks
//! cannot drift apart.

use mountd_schema::SchemaNode;

/// Custom keyword: the string names a daemon in the deployment registry.
pub const DAEMON_NAME: &str = "daemon_name";

/// Custom keyword: the string names a control machine in the deployment registry.
pub const MACHINE_NAME: &str = "machine_name";

/// The only baud rate the controller firmware speaks.
pub const SERIAL_BAUD: u32 = 250_000;

/// Valid TMC UART node addresses.
pub const UART_ADDRESSES: [u8; 4] = [0, 1, 2, 3];

/// Microstep resolutions a TMC driver can be configured for over UART.
pub const UART_MICROSTEPS: [u16; 9] = [1, 2, 4, 8, 16, 32, 64, 128, 256];

/// Names of the stepper axis blocks, in document order.
pub const STEPPER_AXES: [&str; 3] = ["ha", "dec", "focus"];

/// Interface types accepted in the `interfaces` map.
pub const INTERFACE_TYPES: [&str; 1] = ["tmc2209"];

/// Number of coefficients in an orientation sensor calibration.
pub const CALIBRATION_LENGTH: usize = 12;

/// Upper bound on the daemon timeouts, in seconds (one day).
pub const MAX_TIMEOUT_SECS: f64 = 86_400.0;

/// UART fields that must appear together with `interface`.
const UART_FIELDS: [&str; 3] = ["uart_address", "uart_microsteps", "uart_run_current"];

/// Optional stepper parameter groups a variant may make mandatory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepperRequirements {
    /// Require `interface` and all UART driver fields.
    pub require_uart: bool,
    /// Require `endstop_pin` and `endstop_pos`.
    pub require_endstop: bool,
    /// Require `tracking_cadence` and `tracking_commit_buffer`.
    pub require_tracking: bool,
}

impl StepperRequirements {
    /// Endstop and tracking parameters mandatory, UART optional.
    pub const fn homing_tracking() -> Self {
        Self {
            require_uart: false,
            require_endstop: true,
            require_tracking: true,
        }
    }

    /// Endstop parameters mandatory, everything else optional.
    pub const fn homing() -> Self {
        Self {
            require_uart: false,
            require_endstop: true,
            require_tracking: false,
        }
    }
}

/// A GPIO pin name as understood by the controller firmware (e.g. `"PB13"`).
pub fn gpio_pin_schema() -> SchemaNode {
    SchemaNode::string()
}

/// Schema for a single stepper axis block.
///
/// Pin assignments and motion parameters are always required. Endstop,
/// tracking and UART parameters are always declared and become required
/// according to `requirements`. Each optional group is all-or-nothing
/// whether or not it is required: `interface` and the three UART fields
/// imply each other, as do the two endstop and the two tracking fields.
pub fn stepper_axis_schema(requirements: StepperRequirements) -> SchemaNode {
    let mut axis = SchemaNode::object()
        .required_property("step_pin", gpio_pin_schema())
        .required_property("dir_pin", gpio_pin_schema())
        .required_property("enable_pin", gpio_pin_schema())
        .required_property("rotation_microsteps", count_schema())
        .required_property("rotation_distance", SchemaNode::number())
        .required_property("position_min", SchemaNode::number())
        .required_property("position_max", SchemaNode::number())
        .required_property("speed", SchemaNode::number())
        .required_property("acceleration", SchemaNode::number())
        .required_property("homing_backoff", SchemaNode::number())
        .property("endstop_pin", gpio_pin_schema())
        .property("endstop_pos", SchemaNode::string().one_of_values(["max", "min"]))
        .property("tracking_cadence", SchemaNode::number())
        .property("tracking_commit_buffer", SchemaNode::number())
        .property("interface", SchemaNode::string())
        .property("uart_address", SchemaNode::integer().one_of_values(UART_ADDRESSES))
        .property("uart_microsteps", SchemaNode::integer().one_of_values(UART_MICROSTEPS))
        .property("uart_run_current", SchemaNode::number().minimum(0.0))
        .dependency("interface", UART_FIELDS)
        .dependency("endstop_pin", ["endstop_pos"])
        .dependency("endstop_pos", ["endstop_pin"])
        .dependency("tracking_cadence", ["tracking_commit_buffer"])
        .dependency("tracking_commit_buffer", ["tracking_cadence"])
        .closed();

    for field in UART_FIELDS {
        axis = axis.dependency(field, ["interface"]);
    }
    if requirements.require_uart {
        axis = axis.require(["interface"]).require(UART_FIELDS);
    }
    if requirements.require_endstop {
        axis = axis.require(["endstop_pin", "endstop_pos"]);
    }
    if requirements.require_tracking {
        axis = axis.require(["tracking_cadence", "tracking_commit_buffer"]);
    }
    axis
}

/// Optional electronics cooling fan, switched off after an idle period.
pub fn controller_fan_schema() -> SchemaNode {
    SchemaNode::object()
        .required_property("pin", gpio_pin_schema())
        .required_property("idle_timeout", SchemaNode::number().minimum(1.0))
        .closed()
}

/// Positive integer that fits the `u32` it binds to.
fn count_schema() -> SchemaNode {
    SchemaNode::integer().range(1.0, f64::from(u32::MAX))
}

/// Optional addressable status LED strip.
pub fn status_light_schema() -> SchemaNode {
    SchemaNode::object()
        .required_property("pin", gpio_pin_schema())
        .required_property("led_count", count_schema())
        .property("brightness", SchemaNode::number().range(0.0, 1.0))
        .closed()
}

/// A TMC2209 stepper driver reached over a single-wire UART.
pub fn tmc2209_interface_schema() -> SchemaNode {
    SchemaNode::object()
        .property("type", SchemaNode::string().one_of_values(["tmc2209"]))
        .required_property("uart_pin", gpio_pin_schema())
        .property("tx_pin", gpio_pin_schema())
        .closed()
}

/// One named peripheral interface: exactly one supported interface shape.
pub fn interface_schema() -> SchemaNode {
    SchemaNode::object().one_of([tmc2209_interface_schema()])
}

/// Map of user-chosen interface names to interface definitions.
pub fn interfaces_schema() -> SchemaNode {
    SchemaNode::object().additional_properties(interface_schema())
}

/// Optional I2C orientation sensor.
pub fn orientation_schema() -> SchemaNode {
    SchemaNode::object()
        .required_property("i2c_bus", SchemaNode::string())
        .property(
            "calibration",
            SchemaNode::array(SchemaNode::number()).exact_items(CALIBRATION_LENGTH),
        )
        .closed()
}

/// Shape of a root schema: per-axis requirements and optional blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootLayout {
    pub ha: StepperRequirements,
    pub dec: StepperRequirements,
    pub focus: StepperRequirements,
    /// Declare the optional `status_light` block.
    pub status_light: bool,
}

/// Root configuration schema for the given layout.
///
/// All layouts share the same required top-level keys; the object is closed.
pub fn root_schema(layout: &RootLayout) -> SchemaNode {
    let timeout = || SchemaNode::number().range(0.0, MAX_TIMEOUT_SECS);

    let mut root = SchemaNode::object()
        .required_property("daemon", SchemaNode::string().keyword(DAEMON_NAME))
        .required_property("log_name", SchemaNode::string())
        .required_property(
            "control_machines",
            SchemaNode::array(SchemaNode::string().keyword(MACHINE_NAME)),
        )
        .required_property("serial_port", SchemaNode::string())
        .required_property(
            "serial_baud",
            SchemaNode::integer().range(f64::from(SERIAL_BAUD), f64::from(SERIAL_BAUD)),
        )
        .required_property("latitude", SchemaNode::number().range(-90.0, 90.0))
        .required_property("longitude", SchemaNode::number().range(-180.0, 180.0))
        .required_property("altitude", SchemaNode::number().minimum(0.0))
        .required_property("connect_timeout", timeout())
        .required_property("move_timeout", timeout())
        .required_property("home_timeout", timeout())
        .property("controller_fan", controller_fan_schema())
        .property("interfaces", interfaces_schema())
        .property("orientation", orientation_schema())
        .required_property("ha", stepper_axis_schema(layout.ha))
        .required_property("dec", stepper_axis_schema(layout.dec))
        .required_property("focus", stepper_axis_schema(layout.focus))
        .closed();

    if layout.status_light {
        root = root.property("status_light", status_light_schema());
    }
    root
}
