//! Informational version string.

/// `"<major>.<minor>"` of this crate, fixed at build time.
pub fn version() -> String {
    format!(
        "{}.{}",
        env!("CARGO_PKG_VERSION_MAJOR"),
        env!("CARGO_PKG_VERSION_MINOR")
    )
}
