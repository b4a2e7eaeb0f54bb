//! Multi-channel example: one measurement command executed on four buses at
//! once, with one sensor missing and one sending a corrupt word.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example multi-channel

use std::time::Duration;

use i2cprims::connection::I2cConnection;
use i2cprims::frame::{I2cCommand, Response, CRC8_SENSIRION};
use i2cprims::transport::{
    status, ChannelResult, I2cTransceiver, TransceiveOutput, TransceiveRequest, API_VERSION_1,
};
use tracing::level_filters::LevelFilter;

const SENSOR_ADDRESS: u8 = 0x44;
const MEASURE: u16 = 0x2400;

#[derive(Clone, Copy)]
enum Slot {
    Sensor { temperature: u16, humidity: u16 },
    Empty,
    Noisy { temperature: u16, humidity: u16 },
}

/// Four I2C buses driven in lockstep.
struct SimulatedBus {
    slots: [Slot; 4],
}

impl SimulatedBus {
    fn respond(slot: Slot, request: &TransceiveRequest<'_>) -> ChannelResult {
        let (temperature, humidity, corrupt) = match slot {
            Slot::Empty => {
                return ChannelResult::failed(
                    status::NACK,
                    Some("address not acknowledged".into()),
                    Vec::new(),
                )
            }
            Slot::Sensor {
                temperature,
                humidity,
            } => (temperature, humidity, false),
            Slot::Noisy {
                temperature,
                humidity,
            } => (temperature, humidity, true),
        };
        if request.slave_address != SENSOR_ADDRESS
            || request.tx_data != Some(&[0x24, 0x00, 0xDE][..])
        {
            return ChannelResult::failed(status::NACK, None, Vec::new());
        }

        let mut rx = Vec::new();
        for word in [temperature, humidity] {
            let bytes = word.to_be_bytes();
            rx.extend_from_slice(&bytes);
            rx.push(CRC8_SENSIRION.compute(&bytes) as u8);
        }
        if corrupt {
            rx[5] ^= 0x01;
        }
        rx.truncate(request.rx_length.unwrap_or(0));
        ChannelResult::ok(rx)
    }
}

impl I2cTransceiver for SimulatedBus {
    fn api_version(&self) -> u32 {
        API_VERSION_1
    }

    fn description(&self) -> &str {
        "simulated 4-channel bus"
    }

    fn channel_count(&self) -> Option<usize> {
        Some(self.slots.len())
    }

    fn transceive(&mut self, request: &TransceiveRequest<'_>) -> TransceiveOutput {
        TransceiveOutput::Multi(
            self.slots
                .iter()
                .map(|slot| Self::respond(*slot, request))
                .collect(),
        )
    }
}

fn init_logging() {
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::INFO);
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let bus = SimulatedBus {
        slots: [
            Slot::Sensor {
                temperature: 0x6666,
                humidity: 0x8000,
            },
            Slot::Empty,
            Slot::Noisy {
                temperature: 0x6000,
                humidity: 0x7000,
            },
            Slot::Sensor {
                temperature: 0x6A00,
                humidity: 0x9000,
            },
        ],
    };
    let mut connection = I2cConnection::new(bus)?;

    let measure = I2cCommand::checksummed_words(CRC8_SENSIRION)?
        .with_command(MEASURE)
        .with_rx_length(4)
        .with_read_delay(Duration::from_millis(15))
        .with_timeout(Duration::from_millis(100));

    let channels = connection.execute(SENSOR_ADDRESS, &measure)?.into_channels();
    for (channel, response) in channels.iter().enumerate() {
        match response {
            Ok(Some(Response::Words(words))) if words.len() == 2 => {
                let temperature = -45.0 + 175.0 * f64::from(words[0]) / 65535.0;
                let humidity = 100.0 * f64::from(words[1]) / 65535.0;
                eprintln!("[channel {channel}] {temperature:.2} °C, {humidity:.2} %RH");
            }
            Ok(other) => eprintln!("[channel {channel}] unexpected response: {other:?}"),
            Err(err) => eprintln!("[channel {channel}] {err}"),
        }
    }
    Ok(())
}
