/// Build-time git commit SHA stamped by build.rs when available.
pub fn git_sha() -> Option<&'static str> {
    option_env!("TASKBOT_BUILD_GIT_SHA")
}

/// Version string logged at startup: crate version plus short SHA when known.
pub fn version_line() -> String {
    match git_sha() {
        Some(sha) => format!(
            "{} ({})",
            env!("CARGO_PKG_VERSION"),
            &sha[..sha.len().min(12)]
        ),
        None => env!("CARGO_PKG_VERSION").to_string(),
    }
}
