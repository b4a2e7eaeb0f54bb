//! Records build metadata shown by `i2cprims version --extended`.

fn export(var: &str, name: &str) {
    let value = std::env::var(var).unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env={name}={value}");
    println!("cargo:rerun-if-env-changed={var}");
}

fn main() {
    export("TARGET", "I2CPRIMS_BUILD_TARGET");
    export("PROFILE", "I2CPRIMS_BUILD_PROFILE");
}
