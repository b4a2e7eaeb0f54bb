use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use i2cprims_connection::{ChannelResponse, ExecuteOutput};
use i2cprims_frame::Response;
use serde::Serialize;

use crate::cmd::parse::format_hex;
use crate::exit::{i2c_error_code, SUCCESS};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct CrcOutput<'a> {
    algorithm: &'a str,
    width: u8,
    value: String,
}

pub fn print_crc(algorithm: &str, width: u8, value: u32, format: OutputFormat) {
    let value = format_crc(width, value);
    match format {
        OutputFormat::Json => print_json(&CrcOutput {
            algorithm,
            width,
            value,
        }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["ALGORITHM", "WIDTH", "VALUE"]);
            table.add_row(vec![algorithm.to_string(), width.to_string(), value]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{value}"),
    }
}

#[derive(Serialize)]
struct EncodeOutput {
    tx_data: String,
    tx_length: usize,
    rx_length: Option<usize>,
}

/// Print the transmit bytes of a command and the physical read length.
pub fn print_encoded(tx_data: &[u8], rx_length: Option<usize>, format: OutputFormat) {
    let out = EncodeOutput {
        tx_data: format_hex(tx_data),
        tx_length: tx_data.len(),
        rx_length,
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = new_table(vec!["TX", "TX LEN", "RX LEN"]);
            table.add_row(vec![
                out.tx_data,
                out.tx_length.to_string(),
                out.rx_length.map_or_else(|| "-".to_string(), |n| n.to_string()),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", out.tx_data),
    }
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct ChannelOutput {
    channel: usize,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    words: Option<Vec<u16>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ChannelOutput {
    fn new(channel: usize, response: &ChannelResponse) -> Self {
        let mut out = Self {
            channel,
            ok: response.is_ok(),
            bytes: None,
            words: None,
            error: None,
        };
        match response {
            Ok(Some(Response::Bytes(data))) => out.bytes = Some(format_hex(data)),
            Ok(Some(Response::Words(words))) => out.words = Some(words.clone()),
            Ok(None) => {}
            Err(err) => out.error = Some(err.to_string()),
        }
        out
    }

    fn data_text(&self) -> String {
        if let Some(bytes) = &self.bytes {
            return bytes.clone();
        }
        if let Some(words) = &self.words {
            return words
                .iter()
                .map(|w| format!("0x{w:04X}"))
                .collect::<Vec<_>>()
                .join(" ");
        }
        self.error.clone().unwrap_or_default()
    }
}

#[derive(Serialize)]
struct ExecuteJson<'a> {
    multi_channel: bool,
    channels: &'a [ChannelOutput],
}

/// Flatten an execute result into printable rows plus the exit code of the
/// first failing channel.
pub fn channel_rows(output: ExecuteOutput) -> (bool, Vec<ChannelOutput>, i32) {
    let multi_channel = output.is_multi();
    let responses = output.into_channels();
    let rows = responses
        .iter()
        .enumerate()
        .map(|(channel, response)| ChannelOutput::new(channel, response))
        .collect();
    let code = responses
        .iter()
        .find_map(|response| response.as_ref().err().map(i2c_error_code))
        .unwrap_or(SUCCESS);
    (multi_channel, rows, code)
}

/// Print an execute result and return the exit code.
pub fn print_execute_output(output: ExecuteOutput, format: OutputFormat) -> i32 {
    let (multi_channel, rows, code) = channel_rows(output);
    match format {
        OutputFormat::Json => print_json(&ExecuteJson {
            multi_channel,
            channels: &rows,
        }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["CHANNEL", "STATUS", "DATA"]);
            for row in &rows {
                table.add_row(vec![
                    row.channel.to_string(),
                    if row.ok { "ok" } else { "error" }.to_string(),
                    row.data_text(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in &rows {
                println!("channel {}: {}", row.channel, row.data_text());
            }
        }
    }
    code
}

fn format_crc(width: u8, value: u32) -> String {
    let digits = usize::from(width / 4);
    format!("0x{value:0digits$X}")
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}
