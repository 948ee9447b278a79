//! Non-fatal diagnostics for picker configuration.

/// A configuration problem that does not stop the picker from working.
///
/// Warnings are logged through `tracing` when a picker is built and can be
/// inspected with [`PickerConfig::warnings`](crate::PickerConfig::warnings).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigWarning {
    /// A time column step does not divide its unit evenly.
    #[error("`{unit}_step` {step} is invalid, it should be a factor of {total}")]
    InvalidStep {
        unit: &'static str,
        step: u32,
        total: u32,
    },
    /// A disabled field can never be filled in.
    #[error("field {index} is disabled but has no value and does not allow empty")]
    DisabledFieldWithoutValue { index: usize },
    /// A panel mode was requested that the picker can never reach.
    #[error("mode {mode} is not reachable from a {picker} picker")]
    UnreachableMode { mode: String, picker: String },
}

/// Emit every warning through `tracing` and hand them back.
pub(crate) fn report(warnings: Vec<ConfigWarning>) -> Vec<ConfigWarning> {
    for warning in &warnings {
        tracing::warn!(%warning, "picker configuration");
    }
    warnings
}
