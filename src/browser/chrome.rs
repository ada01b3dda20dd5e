//! Chrome/Chromium executable discovery.

use std::path::PathBuf;
use std::process::Command;

/// Binaries probed on PATH, in preference order.
const PATH_CANDIDATES: &[&str] = &["google-chrome", "google-chrome-stable", "chromium"];

/// Well-known install locations checked when PATH lookup fails.
const FILE_CANDIDATES: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    // NixOS
    "/run/current-system/sw/bin/google-chrome",
    "/run/current-system/sw/bin/chromium",
    // macOS
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

fn which(binary: &str) -> Option<PathBuf> {
    let output = Command::new("which").arg(binary).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

/// Find a compatible Chrome/Chromium executable.
///
/// The `CONCILIADOR_CHROME` environment variable overrides discovery.
pub fn find_chrome() -> Option<PathBuf> {
    if let Ok(explicit) = std::env::var("CONCILIADOR_CHROME") {
        let path = PathBuf::from(explicit);
        if path.exists() {
            return Some(path);
        }
        tracing::warn!(path = %path.display(), "CONCILIADOR_CHROME does not exist, falling back to discovery");
    }

    for binary in PATH_CANDIDATES {
        if let Some(path) = which(binary) {
            return Some(path);
        }
    }

    FILE_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}
