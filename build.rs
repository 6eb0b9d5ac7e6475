//! Build script to capture the compiler version for the default User-Agent.

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=RUSTC");

    let version = get_rustc_version().unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=TRUSTPILOT_RUSTC_VERSION={}", version);
}

fn get_rustc_version() -> Option<String> {
    // Cargo points RUSTC at the compiler building this crate
    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let output = Command::new(rustc).arg("--version").output().ok()?;

    if !output.status.success() {
        return None;
    }

    // "rustc 1.82.0 (f6e511eec 2024-10-15)"
    let version = String::from_utf8(output.stdout).ok()?;
    version.split_whitespace().nth(1).map(str::to_string)
}
