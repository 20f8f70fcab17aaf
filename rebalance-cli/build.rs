use std::path::{Path, PathBuf};
use std::process::Command;

const SHA_ENV: &str = "REBALANCE_BUILD_SHA";

/// Short commit hash of the workspace checkout, if there is one.
fn git_short_sha(workspace: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(workspace)
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8(out.stdout).ok()?.trim().to_string();
    (!sha.is_empty()).then_some(sha)
}

fn main() {
    let workspace = std::env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .and_then(|dir| dir.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(".."));

    // Source tarballs have no .git; packagers can pass the hash in instead.
    let sha = std::env::var(SHA_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| git_short_sha(&workspace))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env={SHA_ENV}={sha}");
    println!("cargo:rerun-if-env-changed={SHA_ENV}");
    println!("cargo:rerun-if-changed={}", workspace.join(".git/HEAD").display());
}
