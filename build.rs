//! Build script for attrpg
//!
//! Embeds the git revision, build timestamp and toolchain details so the
//! `version` subcommand can report exactly which build is running.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let git_hash = run_capture("git", &["rev-parse", "--short=8", "HEAD"]);
    let git_branch = run_capture("git", &["rev-parse", "--abbrev-ref", "HEAD"]);
    let git_dirty = match run_capture("git", &["status", "--porcelain"]).as_str() {
        "unknown" => "unknown",
        "" => "false",
        _ => "true",
    };

    let build_timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let rustc_version = run_capture("rustc", &["--version"]);

    println!("cargo:rustc-env=ATTRPG_GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=ATTRPG_GIT_BRANCH={}", git_branch);
    println!("cargo:rustc-env=ATTRPG_GIT_DIRTY={}", git_dirty);
    println!("cargo:rustc-env=ATTRPG_BUILD_TIMESTAMP={}", build_timestamp);
    println!("cargo:rustc-env=ATTRPG_TARGET={}", target);
    println!("cargo:rustc-env=ATTRPG_PROFILE={}", profile);
    println!("cargo:rustc-env=ATTRPG_RUSTC_VERSION={}", rustc_version);
}

/// Run a command and return its trimmed stdout, or "unknown" if it failed
///
/// An empty (but successful) output is returned as-is; `git status --porcelain`
/// relies on that to report a clean tree.
fn run_capture(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
