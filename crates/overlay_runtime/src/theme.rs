//! Theme tokens consumed (never mutated) by the overlay runtime.

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Text direction; decides which horizontal edge counts as "start".
pub enum TextDirection {
    #[default]
    /// Left-to-right.
    Ltr,
    /// Right-to-left.
    Rtl,
}

impl TextDirection {
    /// Returns the `dir` attribute token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Named durations in milliseconds.
pub struct Durations {
    /// 150ms.
    pub shortest: f64,
    /// 200ms.
    pub shorter: f64,
    /// 250ms.
    pub short: f64,
    /// 300ms; default for [`TransitionOptions`].
    pub standard: f64,
    /// 375ms.
    pub complex: f64,
    /// Surfaces entering the screen.
    pub entering_screen: f64,
    /// Surfaces leaving the screen.
    pub leaving_screen: f64,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            shortest: 150.0,
            shorter: 200.0,
            short: 250.0,
            standard: 300.0,
            complex: 375.0,
            entering_screen: 225.0,
            leaving_screen: 195.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Named CSS timing functions.
pub struct Easings {
    /// Standard curve for elements that move between on-screen positions.
    pub ease_in_out: String,
    /// Elements entering the screen.
    pub ease_out: String,
    /// Elements leaving the screen for good.
    pub ease_in: String,
    /// Elements that may return at any time.
    pub sharp: String,
}

impl Default for Easings {
    fn default() -> Self {
        Self {
            ease_in_out: "cubic-bezier(0.4, 0, 0.2, 1)".to_string(),
            ease_out: "cubic-bezier(0.0, 0, 0.2, 1)".to_string(),
            ease_in: "cubic-bezier(0.4, 0, 1, 1)".to_string(),
            sharp: "cubic-bezier(0.4, 0, 0.6, 1)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Stacking layers.
pub struct ZIndex {
    /// App bars.
    pub app_bar: i32,
    /// Drawers.
    pub drawer: i32,
    /// Modal-family overlays.
    pub modal: i32,
    /// Tooltips.
    pub tooltip: i32,
}

impl Default for ZIndex {
    fn default() -> Self {
        Self {
            app_bar: 1100,
            drawer: 1200,
            modal: 1300,
            tooltip: 1500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
/// Theme configuration object read by overlays.
pub struct ThemeTokens {
    /// Named durations.
    pub durations: Durations,
    /// Named easing curves.
    pub easing: Easings,
    /// Stacking layers.
    pub z_index: ZIndex,
    /// Text direction.
    pub direction: TextDirection,
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Optional parts of a generated transition string.
pub struct TransitionOptions<'a> {
    /// Duration in ms; defaults to `durations.standard`.
    pub duration: Option<f64>,
    /// Timing function; defaults to `easing.ease_in_out`.
    pub easing: Option<&'a str>,
    /// Delay in ms; defaults to 0.
    pub delay: Option<f64>,
}

impl ThemeTokens {
    /// Parses a (possibly partial) JSON theme document over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::InvalidJson`] when the document is not valid theme JSON.
    pub fn from_json_str(raw: &str) -> Result<Self, ThemeError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Renders a CSS `transition` value covering each property in `props`.
    pub fn create_transition(&self, props: &[&str], options: TransitionOptions<'_>) -> String {
        let duration = options.duration.unwrap_or(self.durations.standard);
        let easing = options.easing.unwrap_or(&self.easing.ease_in_out);
        let delay = options.delay.unwrap_or_default();
        let props: &[&str] = if props.is_empty() { &["all"] } else { props };
        props
            .iter()
            .map(|prop| {
                format!(
                    "{prop} {} {easing} {}",
                    format_ms(duration),
                    format_ms(delay)
                )
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Formats milliseconds the way CSS expects them (`"225ms"`), rounding to whole ms.
pub fn format_ms(ms: f64) -> String {
    format!("{}ms", ms.round() as i64)
}

/// Formats a CSS pixel quantity without a trailing `.0` for whole numbers.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Derives a transition duration from a rendered height.
///
/// Taller content animates longer, growing with roughly the fourth root of the height.
pub fn auto_height_duration(height: f64) -> f64 {
    if height <= 0.0 || !height.is_finite() {
        return 0.0;
    }
    let constant = height / 36.0;
    ((4.0 + 15.0 * constant.powf(0.25) + constant / 5.0) * 10.0).round()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn create_transition_renders_every_property() {
        let theme = ThemeTokens::default();
        let value = theme.create_transition(
            &["opacity", "transform"],
            TransitionOptions {
                duration: Some(225.0),
                ..TransitionOptions::default()
            },
        );
        assert_eq!(
            value,
            "opacity 225ms cubic-bezier(0.4, 0, 0.2, 1) 0ms,transform 225ms cubic-bezier(0.4, 0, 0.2, 1) 0ms"
        );
    }

    #[test]
    fn auto_height_duration_follows_fourth_root_curve() {
        assert_eq!(auto_height_duration(0.0), 0.0);
        assert_eq!(auto_height_duration(36.0), 192.0);
        assert_eq!(auto_height_duration(360.0), 327.0);
    }

    #[test]
    fn partial_json_merges_over_defaults() {
        let theme = ThemeTokens::from_json_str(r#"{"direction":"rtl","durations":{"standard":400}}"#)
            .expect("theme json");
        assert_eq!(theme.direction, TextDirection::Rtl);
        assert_eq!(theme.durations.standard, 400.0);
        assert_eq!(theme.durations.entering_screen, 225.0);
        assert_eq!(theme.z_index.modal, 1300);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(ThemeTokens::from_json_str("[1,2").is_err());
    }
}
