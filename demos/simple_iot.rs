//! Simple IoT demonstration: a temperature sensor, a thermostat and a
//! device controller exchanging messages over the runtime, with the
//! watchdog observing everyone.
//!
//! Run with: `cargo run --example simple_iot`

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

// Layer 3: Internal module imports
use agentsys_rt::prelude::*;

#[repr(C)]
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
struct SampleRequest {
    cycle: u32,
}

impl Payload for SampleRequest {
    const NAME: &'static str = "simple_iot::SampleRequest";
}

#[repr(C)]
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
struct TemperatureReading {
    celsius: f32,
    sensor_id: u32,
}

impl Payload for TemperatureReading {
    const NAME: &'static str = "simple_iot::TemperatureReading";
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
    const NAME: &'static str = "simple_iot::ControlCommand";
}

/// Simulated temperature sensor; readings swing around 25 °C.
struct TemperatureSensor {
    sensor_id: u32,
    reading_count: u32,
}

impl Agent for TemperatureSensor {
    fn handle_message(&mut self, ctx: &mut AgentContext<'_>, msg: &MessageView<'_>) -> bool {
        if msg.is::<SampleRequest>() {
            self.reading_count += 1;
            let swing = (self.reading_count % 10) as f32 - 5.0;
            let celsius = 25.0 + swing;

            println!("Sensor {}: temperature = {celsius:.1} C", self.sensor_id);
            ctx.broadcast(&TemperatureReading {
                celsius,
                sensor_id: self.sensor_id,
            });
            ctx.heartbeat();
            return true;
        }
        false
    }
}

/// Bang-bang thermostat around a target temperature.
struct Thermostat {
    target_celsius: f32,
    heater_on: bool,
}

impl Agent for Thermostat {
    fn handle_message(&mut self, ctx: &mut AgentContext<'_>, msg: &MessageView<'_>) -> bool {
        let Some(reading) = msg.payload::<TemperatureReading>() else {
            return false;
        };

        if reading.celsius < self.target_celsius - 1.0 && !self.heater_on {
            println!(
                "Thermostat: {:.1} C below target {:.1} C, heater ON",
                reading.celsius, self.target_celsius
            );
            ctx.broadcast(&ControlCommand {
                command: TURN_ON_HEATER,
                device_id: 1,
            });
            self.heater_on = true;
        } else if reading.celsius > self.target_celsius + 1.0 && self.heater_on {
            println!(
                "Thermostat: {:.1} C above target {:.1} C, heater OFF",
                reading.celsius, self.target_celsius
            );
            ctx.broadcast(&ControlCommand {
                command: TURN_OFF_HEATER,
                device_id: 1,
            });
            self.heater_on = false;
        }
        ctx.heartbeat();
        true
    }
}

/// Applies control commands to the simulated device.
struct DeviceController {
    heater_status: bool,
}

impl Agent for DeviceController {
    fn handle_message(&mut self, ctx: &mut AgentContext<'_>, msg: &MessageView<'_>) -> bool {
        let Some(command) = msg.payload::<ControlCommand>() else {
            return false;
        };

        match command.command {
            TURN_ON_HEATER => {
                self.heater_status = true;
                println!("Device controller: heater {} ON", command.device_id);
            }
            TURN_OFF_HEATER => {
                self.heater_status = false;
                println!("Device controller: heater {} OFF", command.device_id);
            }
            _ => return false,
        }
        ctx.heartbeat();
        true
    }
}

fn main() {
    let mut env = Environment::with_defaults().unwrap();

    let sensor = env
        .register_agent(Box::new(TemperatureSensor {
            sensor_id: 1,
            reading_count: 0,
        }))
        .unwrap();
    let _thermostat = env
        .register_agent(Box::new(Thermostat {
            target_celsius: 22.0,
            heater_on: false,
        }))
        .unwrap();
    let device = env
        .register_agent(Box::new(DeviceController {
            heater_status: false,
        }))
        .unwrap();

    let router = env.router();
    for cycle in 0..10 {
        println!("--- cycle {cycle} ---");
        router.send(sensor, sensor, &SampleRequest { cycle });
        env.process_all_messages();
        env.tick();
    }

    env.publish_metrics_digest();
    env.process_all_messages();

    let metrics = env.metrics().snapshot();
    println!(
        "done: sent={} processed={} max_depth={} heater={}",
        metrics.messages_sent,
        metrics.messages_processed,
        metrics.max_queue_depth,
        env.agent_as::<DeviceController>(device).unwrap().heater_status,
    );
    println!("health: {:?}", env.health());

    env.shutdown();
}
