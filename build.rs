use std::env;
use std::process::Command;

/// Every key is exported as `SUBSCRIPTION_CORE_BUILD_<KEY>` and read back by
/// `utils::build_info`.
const ENV_PREFIX: &str = "SUBSCRIPTION_CORE_BUILD";

fn main() {
    for watched in ["build.rs", ".git/HEAD", ".git/refs"] {
        println!("cargo:rerun-if-changed={watched}");
    }

    let hash = capture("git", &["rev-parse", "--short", "HEAD"])
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(unknown);
    let status = capture("git", &["status", "--porcelain"])
        .map(|changes| (if changes.is_empty() { "clean" } else { "dirty" }).to_string())
        .unwrap_or_else(unknown);
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let rustc = capture("rustc", &["--version"]).unwrap_or_else(unknown);

    export("HASH", &hash);
    export("STATUS", &status);
    export("TIMESTAMP", &timestamp);
    export("TARGET", &cargo_var("TARGET"));
    export("PROFILE", &cargo_var("PROFILE"));
    export("RUSTC", &rustc);
}

fn export(key: &str, value: &str) {
    println!("cargo:rustc-env={ENV_PREFIX}_{key}={value}");
}

fn cargo_var(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| unknown())
}

/// Trimmed stdout of a successful command, `None` when it cannot run or fails.
fn capture(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|stdout| stdout.trim().to_string())
}

fn unknown() -> String {
    "unknown".to_string()
}
