pub const VERSION: &str = match option_env!("ROLLCALL_RELEASE_VERSION") {
    Some(version) if !version.is_empty() => version,
    _ => git_version::git_version!(args = ["--always", "--dirty=-modified"], fallback = "unknown"),
};
