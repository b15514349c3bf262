//! Stamps the bundle with the version and commit it was built from.
//!
//! `PORTFOLIO_VERSION` wins over the package version. The commit is taken
//! from `PORTFOLIO_GIT_SHA`, then a CI-provided `GITHUB_SHA`, then the
//! local checkout; builds outside a checkout report `unknown`.

use std::env;
use std::process::Command;

const SHORT_SHA: usize = 7;

fn main() {
    for var in ["PORTFOLIO_VERSION", "PORTFOLIO_GIT_SHA", "GITHUB_SHA"] {
        println!("cargo:rerun-if-env-changed={}", var);
    }

    let version = env::var("PORTFOLIO_VERSION")
        .or_else(|_| env::var("CARGO_PKG_VERSION"))
        .unwrap_or_else(|_| "unknown".into());
    println!("cargo:rustc-env=PORTFOLIO_VERSION={}", version);

    let sha = env::var("PORTFOLIO_GIT_SHA")
        .ok()
        .or_else(|| env::var("GITHUB_SHA").ok().map(short))
        .or_else(checkout_sha)
        .unwrap_or_else(|| "unknown".into());
    println!("cargo:rustc-env=PORTFOLIO_GIT_SHA={}", sha);
}

fn short(sha: String) -> String {
    sha.chars().take(SHORT_SHA).collect()
}

fn checkout_sha() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let sha = String::from_utf8(output.stdout).ok()?;
    Some(sha.trim().to_string()).filter(|s| !s.is_empty())
}
