use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

/// `key: value` lines printed by `version --extended`.
fn extended_fields() -> Vec<(&'static str, String)> {
    vec![
        ("name", "i2cprims".to_string()),
        ("version", env!("CARGO_PKG_VERSION").to_string()),
        ("target", env!("I2CPRIMS_BUILD_TARGET").to_string()),
        ("profile", env!("I2CPRIMS_BUILD_PROFILE").to_string()),
        ("target_os", std::env::consts::OS.to_string()),
        ("linux_transceiver", cfg!(target_os = "linux").to_string()),
        ("serde", cfg!(feature = "serde").to_string()),
    ]
}

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("i2cprims {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    for (key, value) in extended_fields() {
        println!("{key}: {value}");
    }
    Ok(SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_fields_include_build_metadata() {
        let fields = extended_fields();
        let get = |key: &str| {
            fields
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
                .expect("field should be present")
        };
        assert_eq!(get("version"), env!("CARGO_PKG_VERSION"));
        assert!(!get("target").is_empty());
        assert!(matches!(get("profile"), "debug" | "release"));
        assert_eq!(get("linux_transceiver"), cfg!(target_os = "linux").to_string());
    }
}
