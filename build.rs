use std::{env, process::Command};

const VERSION: &str = "0.3.1";

fn main() {
    let output = Command::new("rustc").arg("-vV").output().ok();
    let rustc_info = output
        .as_ref()
        .and_then(|o| String::from_utf8(o.stdout.clone()).ok())
        .unwrap_or_default();

    let rustc_version = rustc_info
        .lines()
        .find(|line| line.starts_with("rustc "))
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("unknown");

    let rustc_channel = if rustc_version.contains("nightly") {
        "nightly"
    } else if rustc_version.contains("beta") {
        "beta"
    } else {
        "stable"
    };

    let target = env::var("TARGET").unwrap_or_else(|_| {
        rustc_info
            .lines()
            .find(|line| line.starts_with("host: "))
            .map(|line| line["host: ".len()..].to_string())
            .unwrap_or_else(|| "unknown".into())
    });

    let profile = if cfg!(debug_assertions) { "debug" } else { "release" };
    let build_date = chrono::Utc::now().format("%Y-%m-%d").to_string();

    println!("cargo:rustc-env=VERSION={VERSION}");
    println!("cargo:rustc-env=RUSTC_VERSION={rustc_version}");
    println!("cargo:rustc-env=RUSTC_CHANNEL={rustc_channel}");
    println!("cargo:rustc-env=TARGET_TRIPLE={target}");
    println!("cargo:rustc-env=PROFILE={profile}");
    println!("cargo:rustc-env=BUILD_DATE={build_date}");

    println!("cargo:rerun-if-changed=build.rs");
}
