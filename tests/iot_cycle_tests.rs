//! End-to-end cycle: a sensor reading ripples through a thermostat into a
//! device actuation, with every participant heartbeating to the watchdog.

#![allow(clippy::unwrap_used)]

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

// Layer 3: Internal module imports
use agentsys_rt::prelude::*;

#[repr(C)]
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
struct SampleRequest {
    scripted_celsius: f32,
}

impl Payload for SampleRequest {
    const NAME: &'static str = "iot_cycle_tests::SampleRequest";
}

#[repr(C)]
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
struct TemperatureReading {
    celsius: f32,
    sensor_id: u32,
}

impl Payload for TemperatureReading {
    const NAME: &'static str = "iot_cycle_tests::TemperatureReading";
}

const TURN_ON_HEATER: u32 = 0;
const TURN_OFF_HEATER: u32 = 1;

#[repr(C)]
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
struct ControlCommand {
    command: u32,
    device_id: u32,
}

impl Payload for ControlCommand {
    const NAME: &'static str = "iot_cycle_tests::ControlCommand";
}

/// Broadcasts a temperature reading when asked for a sample.
struct TemperatureSensor {
    sensor_id: u32,
    readings_taken: u32,
}

impl Agent for TemperatureSensor {
    fn handle_message(&mut self, ctx: &mut AgentContext<'_>, msg: &MessageView<'_>) -> bool {
        if let Some(request) = msg.payload::<SampleRequest>() {
            self.readings_taken += 1;
            ctx.broadcast(&TemperatureReading {
                celsius: request.scripted_celsius,
                sensor_id: self.sensor_id,
            });
            ctx.heartbeat();
            return true;
        }
        false
    }
}

/// Simple bang-bang control around a target temperature.
struct Thermostat {
    target_celsius: f32,
    heater_commanded: bool,
}

impl Agent for Thermostat {
    fn handle_message(&mut self, ctx: &mut AgentContext<'_>, msg: &MessageView<'_>) -> bool {
        if let Some(reading) = msg.payload::<TemperatureReading>() {
            if reading.celsius < self.target_celsius - 1.0 && !self.heater_commanded {
                ctx.broadcast(&ControlCommand {
                    command: TURN_ON_HEATER,
                    device_id: 1,
                });
                self.heater_commanded = true;
            } else if reading.celsius > self.target_celsius + 1.0 && self.heater_commanded {
                ctx.broadcast(&ControlCommand {
                    command: TURN_OFF_HEATER,
                    device_id: 1,
                });
                self.heater_commanded = false;
            }
            ctx.heartbeat();
            return true;
        }
        false
    }
}

/// Applies control commands to its device state.
struct DeviceController {
    heater_status: bool,
    commands_executed: u32,
}

impl Agent for DeviceController {
    fn handle_message(&mut self, ctx: &mut AgentContext<'_>, msg: &MessageView<'_>) -> bool {
        if let Some(command) = msg.payload::<ControlCommand>() {
            match command.command {
                TURN_ON_HEATER => self.heater_status = true,
                TURN_OFF_HEATER => self.heater_status = false,
                _ => return false,
            }
            self.commands_executed += 1;
            ctx.heartbeat();
            return true;
        }
        false
    }
}

/// Passive observer of everything on the bus.
#[derive(Default)]
struct StatusDisplay {
    readings_seen: u32,
    commands_seen: u32,
}

impl Agent for StatusDisplay {
    fn handle_message(&mut self, ctx: &mut AgentContext<'_>, msg: &MessageView<'_>) -> bool {
        if msg.is::<TemperatureReading>() {
            self.readings_seen += 1;
            ctx.heartbeat();
            return true;
        }
        if msg.is::<ControlCommand>() {
            self.commands_seen += 1;
            return true;
        }
        false
    }
}

struct Rig {
    env: Environment,
    sensor: AgentId,
    display: AgentId,
    thermostat: AgentId,
    device: AgentId,
}

fn rig() -> Rig {
    let mut env = Environment::with_defaults().unwrap();
    let sensor = env
        .register_agent(Box::new(TemperatureSensor {
            sensor_id: 1,
            readings_taken: 0,
        }))
        .unwrap();
    let display = env.register_agent(Box::new(StatusDisplay::default())).unwrap();
    let thermostat = env
        .register_agent(Box::new(Thermostat {
            target_celsius: 22.0,
            heater_commanded: false,
        }))
        .unwrap();
    let device = env
        .register_agent(Box::new(DeviceController {
            heater_status: false,
            commands_executed: 0,
        }))
        .unwrap();
    Rig {
        env,
        sensor,
        display,
        thermostat,
        device,
    }
}

fn sample(rig: &mut Rig, celsius: f32) {
    let router = rig.env.router();
    router.send(
        rig.sensor,
        rig.sensor,
        &SampleRequest {
            scripted_celsius: celsius,
        },
    );
    rig.env.process_all_messages();
}

#[test]
fn test_cold_reading_turns_heater_on() {
    let mut rig = rig();

    sample(&mut rig, 20.0);

    let device = rig.env.agent_as::<DeviceController>(rig.device).unwrap();
    assert!(device.heater_status);
    assert_eq!(device.commands_executed, 1);

    let thermostat = rig.env.agent_as::<Thermostat>(rig.thermostat).unwrap();
    assert!(thermostat.heater_commanded);

    let display = rig.env.agent_as::<StatusDisplay>(rig.display).unwrap();
    assert_eq!(display.readings_seen, 1);
    assert_eq!(display.commands_seen, 1);
}

#[test]
fn test_warm_reading_turns_heater_back_off() {
    let mut rig = rig();

    sample(&mut rig, 20.0);
    assert!(rig.env.agent_as::<DeviceController>(rig.device).unwrap().heater_status);

    sample(&mut rig, 24.0);

    let device = rig.env.agent_as::<DeviceController>(rig.device).unwrap();
    assert!(!device.heater_status);
    assert_eq!(device.commands_executed, 2);
}

#[test]
fn test_in_band_reading_changes_nothing() {
    let mut rig = rig();

    sample(&mut rig, 22.5);

    let device = rig.env.agent_as::<DeviceController>(rig.device).unwrap();
    assert!(!device.heater_status);
    assert_eq!(device.commands_executed, 0);
}

#[test]
fn test_watchdog_observes_all_four_agents() {
    let mut rig = rig();

    sample(&mut rig, 20.0);

    let watchdog = rig.env.watchdog();
    for id in [rig.sensor, rig.display, rig.thermostat, rig.device] {
        assert!(watchdog.is_monitored(id), "agent {id} never heartbeat");
        assert!(watchdog.last_heartbeat(id).is_some());
    }
    assert!(watchdog.monitored_count() >= 4);
}

#[test]
fn test_cycle_metrics_and_health() {
    let mut rig = rig();

    for celsius in [20.0, 20.5, 24.0, 21.5] {
        sample(&mut rig, celsius);
    }

    let metrics = rig.env.metrics();
    assert!(metrics.messages_sent() >= metrics.messages_processed());
    assert_eq!(rig.env.total_pending_messages(), 0);
    assert_eq!(rig.env.health(), SystemHealth::Healthy);

    let sensor = rig.env.agent_as::<TemperatureSensor>(rig.sensor).unwrap();
    assert_eq!(sensor.readings_taken, 4);
}
