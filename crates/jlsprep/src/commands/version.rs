use serde::Serialize;
use tracing::instrument;

/// Package and build details shown by `jlsprep version`.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    /// Package name.
    pub name: &'static str,
    /// Package version.
    pub version: &'static str,
    /// Package description.
    pub description: &'static str,
    /// Correlation id of this process.
    pub correlation_id: String,
}

impl VersionInfo {
    /// Details of the running binary.
    #[must_use]
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            correlation_id: crate::tracing::correlation_id().to_string(),
        }
    }
}

/// Version text, or a JSON envelope when `json_mode` is set.
#[instrument]
pub fn get_version_info(json_mode: bool) -> String {
    let info = VersionInfo::current();
    tracing::debug!(
        package_name = info.name,
        package_version = info.version,
        "Gathering package information"
    );

    if json_mode {
        let envelope = crate::cli::OkEnvelope::new(&info);
        serde_json::to_string(&envelope).unwrap_or_else(|e| format!("{{\"status\":\"error\",\"error\":\"{e}\"}}"))
    } else {
        format!(
            "{} {} - {}\nCorrelation ID: {}",
            info.name, info.version, info.description, info.correlation_id
        )
    }
}
