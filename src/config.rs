use crate::foundation::core::Fps;
use crate::foundation::error::{LiltError, LiltResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case", default)]
/// Visual and timing settings for one render.
///
/// Keys are kebab-case in JSON; every key is optional.
pub struct RenderConfig {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
    /// Left margin in pixels.
    pub margin_left: f64,
    /// Right margin in pixels.
    pub margin_right: f64,
    /// Font family name passed to the metrics provider and the rasterizer.
    pub font: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Line pitch as a multiple of the font size.
    pub line_height: f64,
    /// Resting text colour.
    pub text_color: String,
    /// Colour of a word while it is spoken.
    pub highlight_color: String,
    /// Optional background fill.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    /// Opacity of the background fill.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color_opacity: Option<f64>,
    /// Output frame rate (integer frames per second).
    pub fps: u32,
    /// Seconds a word spends flying in and warming up before it is spoken.
    pub lead_in: f64,
    /// Seconds a word takes to fade back after it is spoken.
    pub fade_out: f64,
    /// Bouncing indicator settings.
    pub indicator: IndicatorConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            margin_left: 100.0,
            margin_right: 100.0,
            font: "NotoSans".to_string(),
            font_size: 64.0,
            line_height: 1.5,
            text_color: "#000000".to_string(),
            highlight_color: "#ff0000".to_string(),
            bg_color: None,
            bg_color_opacity: None,
            fps: 24,
            lead_in: 1.2,
            fade_out: 0.2,
            indicator: IndicatorConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case", default)]
/// Settings for the bouncing indicator.
pub struct IndicatorConfig {
    /// Whether the indicator is drawn at all.
    pub enabled: bool,
    /// Height of each arc above the higher of its two endpoints.
    pub ascent: f64,
    /// Radius of the indicator dot.
    pub radius: f64,
    /// Distance the dot floats above a word's top edge.
    pub offset_y: f64,
    /// Minimum arc duration in seconds; shorter gaps steal time from the hold before them.
    pub min_arc: f64,
    /// Cumulative-amplitude fraction at which a hold starts.
    pub bounce_begin: f64,
    /// Cumulative-amplitude fraction at which a hold ends.
    pub bounce_end: f64,
    /// Dot colour.
    pub color: String,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ascent: 80.0,
            radius: 12.0,
            offset_y: 16.0,
            min_arc: 0.25,
            bounce_begin: 0.1,
            bounce_end: 0.8,
            color: "#ff0000".to_string(),
        }
    }
}

impl RenderConfig {
    /// Decode from JSON; absent keys take their defaults.
    pub fn from_json_str(s: &str) -> LiltResult<Self> {
        serde_json::from_str(s).map_err(|e| LiltError::serde(format!("render config: {e}")))
    }

    /// Reject settings that cannot produce a sensible render.
    pub fn validate(&self) -> LiltResult<()> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("font-size", self.font_size),
            ("line-height", self.line_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LiltError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        for (name, value) in [
            ("margin-left", self.margin_left),
            ("margin-right", self.margin_right),
            ("lead-in", self.lead_in),
            ("fade-out", self.fade_out),
            ("indicator.ascent", self.indicator.ascent),
            ("indicator.radius", self.indicator.radius),
            ("indicator.min-arc", self.indicator.min_arc),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LiltError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if self.margin_left + self.margin_right >= self.width {
            return Err(LiltError::validation("margins leave no room for text"));
        }
        if self.fps == 0 {
            return Err(LiltError::validation("fps must be > 0"));
        }
        if let Some(o) = self.bg_color_opacity
            && !(0.0..=1.0).contains(&o)
        {
            return Err(LiltError::validation("bg-color-opacity must be in [0, 1]"));
        }
        let (b, e) = (self.indicator.bounce_begin, self.indicator.bounce_end);
        if !(0.0..=1.0).contains(&b) || !(0.0..=1.0).contains(&e) || b > e {
            return Err(LiltError::validation(
                "indicator bounce-begin/bounce-end must satisfy 0 <= begin <= end <= 1",
            ));
        }
        if self.font.trim().is_empty() {
            return Err(LiltError::validation("font must be non-empty"));
        }
        Ok(())
    }

    /// Width available to text between the margins.
    pub fn content_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }

    /// Frame rate as an [`Fps`].
    pub fn frame_rate(&self) -> LiltResult<Fps> {
        Fps::new(self.fps, 1)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
