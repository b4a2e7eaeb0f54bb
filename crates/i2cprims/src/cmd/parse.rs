use std::time::Duration;

/// Hex encoded bytes given on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

/// Parse hex digits, optionally prefixed with `0x` and separated by spaces
/// or colons (`DEAD98`, `de:ad:98`, `"DE AD 98"`).
pub fn parse_hex(input: &str) -> Result<HexBytes, String> {
    let input = input.trim();
    let input = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    let digits: Vec<u8> = input
        .bytes()
        .filter(|b| !matches!(b, b' ' | b':' | b'_'))
        .collect();
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in {input:?}"));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let text = std::str::from_utf8(pair).map_err(|err| err.to_string())?;
            u8::from_str_radix(text, 16).map_err(|_| format!("invalid hex byte {text:?}"))
        })
        .collect::<Result<Vec<u8>, String>>()
        .map(HexBytes)
}

fn parse_int(input: &str) -> Result<u32, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|_| format!("invalid number: {input}"))
}

/// Parse a decimal or `0x` prefixed 16-bit value.
pub fn parse_u16(input: &str) -> Result<u16, String> {
    let value = parse_int(input)?;
    u16::try_from(value).map_err(|_| format!("{input} does not fit into 16 bits"))
}

/// Parse a decimal or `0x` prefixed 7-bit slave address.
pub fn parse_address(input: &str) -> Result<u8, String> {
    let value = parse_int(input)?;
    match u8::try_from(value) {
        Ok(address) if address <= 0x7F => Ok(address),
        _ => Err(format!("{input} is not a 7-bit I2C address")),
    }
}

/// Parse `150ms`, `2s` or a bare number of milliseconds. Zero is allowed.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("duration must not be empty".to_string());
    }

    let (number, from): (&str, fn(u64) -> Duration) = if let Some(num) = input.strip_suffix("ms")
    {
        (num, Duration::from_millis)
    } else if let Some(num) = input.strip_suffix("us") {
        (num, Duration::from_micros)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, Duration::from_secs)
    } else {
        (input, Duration::from_millis)
    };

    number
        .parse::<u64>()
        .map(from)
        .map_err(|_| format!("invalid duration value: {input}"))
}

pub fn format_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
