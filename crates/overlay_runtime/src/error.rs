//! Configuration warnings and propagated errors for the overlay runtime.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
/// Misconfigurations that degrade overlay behavior without aborting it.
pub enum OverlayWarning {
    /// `anchorReference` is `anchorPosition` but no position was supplied.
    #[error("you must provide the `anchor_position` prop when `anchor_reference` is `anchor_position`")]
    MissingAnchorPosition,
    /// The anchor element is not part of the document layout.
    #[error("the `anchor_el` provided to the component is invalid: it should be part of the document layout; make sure the element is present in the document and is not styled with `display: none`")]
    DetachedAnchor,
    /// The floating surface is taller than the space between the margin thresholds.
    #[error("the popover component is too tall; some part of it can not be seen on the screen ({overflow_px}px); reduce the height or use a scrolling container")]
    PopoverTooTall {
        /// Pixels hidden past the bottom threshold after clamping to the top threshold.
        overflow_px: f64,
    },
}

#[derive(Debug, Error)]
/// Errors raised while loading theme configuration.
pub enum ThemeError {
    /// The JSON document could not be parsed into theme tokens.
    #[error("invalid theme configuration: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Logs a warning through the shared Leptos logging macros.
pub fn report(warning: &OverlayWarning) {
    leptos::logging::warn!("kemeng-ui: {warning}");
}

/// Logs every warning in order.
pub fn report_all(warnings: &[OverlayWarning]) {
    for warning in warnings {
        report(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_tall_warning_names_the_overflow() {
        let message = OverlayWarning::PopoverTooTall { overflow_px: 84.0 }.to_string();
        assert!(message.contains("(84px)"));
    }

    #[test]
    fn theme_errors_wrap_serde_failures() {
        let err = serde_json::from_str::<serde_json::Value>("{").map_err(ThemeError::from);
        let message = err.map(|_| String::new()).unwrap_or_else(|e| e.to_string());
        assert!(message.starts_with("invalid theme configuration"));
    }
}
