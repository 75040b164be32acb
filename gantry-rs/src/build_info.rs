//! Build information module.
//!
//! Compile-time build metadata for `--version`-style output: package name
//! and version, git commit, build timestamp, compiler version and target.

#[cfg(feature = "build-info")]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Get formatted version information.
///
/// # Example
///
/// ```ignore
/// println!("{}", gantry::build_info::version_info());
/// ```
///
/// Output:
/// ```text
/// gantry 0.3.0 (x86_64-unknown-linux-gnu)
/// Built: 2026-08-06 12:34:56 UTC
/// Commit: a1b2c3d
/// Rustc: 1.82.0
/// ```
#[cfg(feature = "build-info")]
pub fn version_info() -> String {
    format!(
        "{} {} ({})\nBuilt: {}\nCommit: {}\nRustc: {}",
        built_info::PKG_NAME,
        built_info::PKG_VERSION,
        built_info::TARGET,
        built_info::BUILT_TIME_UTC,
        built_info::GIT_COMMIT_HASH.unwrap_or("unknown"),
        built_info::RUSTC_VERSION
    )
}

/// Get the short version string (package version only).
#[cfg(feature = "build-info")]
pub fn version_short() -> &'static str {
    built_info::PKG_VERSION
}

/// Get the package name.
#[cfg(feature = "build-info")]
pub fn package_name() -> &'static str {
    built_info::PKG_NAME
}

/// Get the git commit hash (if the build ran inside a checkout).
#[cfg(feature = "build-info")]
pub fn git_commit() -> Option<&'static str> {
    built_info::GIT_COMMIT_HASH
}

// Fallback implementations when the build-info feature is disabled
#[cfg(not(feature = "build-info"))]
pub fn version_info() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

#[cfg(not(feature = "build-info"))]
pub fn version_short() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(not(feature = "build-info"))]
pub fn package_name() -> &'static str {
    env!("CARGO_PKG_NAME")
}
