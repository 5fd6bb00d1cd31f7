//! The "current style" record and partial updates to it.

use serde::{Deserialize, Serialize};

/// Default cap on the recently-used color list
pub const COLOR_HISTORY_CAP: usize = 10;

/// Stroke dash pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashPattern {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl DashPattern {
    /// Dash/gap lengths for a stroke of `width`, empty for solid lines
    pub fn intervals(self, width: f64) -> Vec<f64> {
        let w = width.max(1.0);
        match self {
            DashPattern::Solid => Vec::new(),
            DashPattern::Dashed => vec![w * 4.0, w * 3.0],
            DashPattern::Dotted => vec![w, w * 2.0],
        }
    }
}

/// Paint and shape parameters applied to new shapes.
///
/// `fill: None` means transparent, which is not the same as a fill equal to
/// the document background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub stroke_color: String,
    pub fill: Option<String>,
    pub stroke_width: f64,
    pub dash: DashPattern,
    /// 0..=100
    pub opacity: u8,
    pub corner_radius: f64,
    pub sides: u32,
    pub start_arrowhead: bool,
    pub end_arrowhead: bool,
    pub font_family: String,
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke_color: "#000000".to_string(),
            fill: None,
            stroke_width: 2.0,
            dash: DashPattern::Solid,
            opacity: 100,
            corner_radius: 0.0,
            sides: 6,
            start_arrowhead: false,
            end_arrowhead: true,
            font_family: "sans-serif".to_string(),
            font_size: 20.0,
            bold: false,
            italic: false,
        }
    }
}

impl Style {
    /// Merge every field set in `patch`
    pub fn merge(&mut self, patch: &StylePatch) {
        self.merge_visual(patch);
        if let Some(v) = patch.corner_radius {
            self.corner_radius = v;
        }
        if let Some(v) = patch.sides {
            self.sides = v;
        }
        if let Some(v) = patch.start_arrowhead {
            self.start_arrowhead = v;
        }
        if let Some(v) = patch.end_arrowhead {
            self.end_arrowhead = v;
        }
    }

    /// Merge only the paint and font fields, the subset that is pushed onto
    /// already existing shapes
    pub fn merge_visual(&mut self, patch: &StylePatch) {
        if let Some(v) = &patch.stroke_color {
            self.stroke_color.clone_from(v);
        }
        if let Some(v) = &patch.fill {
            self.fill.clone_from(v);
        }
        if let Some(v) = patch.stroke_width {
            self.stroke_width = v;
        }
        if let Some(v) = patch.dash {
            self.dash = v;
        }
        if let Some(v) = patch.opacity {
            self.opacity = v.min(100);
        }
        if let Some(v) = &patch.font_family {
            self.font_family.clone_from(v);
        }
        if let Some(v) = patch.font_size {
            self.font_size = v;
        }
        if let Some(v) = patch.bold {
            self.bold = v;
        }
        if let Some(v) = patch.italic {
            self.italic = v;
        }
    }

    /// Opacity as a 0..1 alpha factor
    pub fn alpha(&self) -> f64 {
        f64::from(self.opacity.min(100)) / 100.0
    }
}

/// A partial style update; unset fields are left alone.
///
/// `fill` is doubly optional: `Some(None)` clears the fill.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePatch {
    pub stroke_color: Option<String>,
    #[serde(with = "double_option", skip_serializing_if = "Option::is_none")]
    pub fill: Option<Option<String>>,
    pub stroke_width: Option<f64>,
    pub dash: Option<DashPattern>,
    pub opacity: Option<u8>,
    pub corner_radius: Option<f64>,
    pub sides: Option<u32>,
    pub start_arrowhead: Option<bool>,
    pub end_arrowhead: Option<bool>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
}

impl StylePatch {
    pub fn stroke_color(color: impl Into<String>) -> Self {
        Self { stroke_color: Some(color.into()), ..Self::default() }
    }

    pub fn fill(color: Option<String>) -> Self {
        Self { fill: Some(color), ..Self::default() }
    }

    pub fn stroke_width(width: f64) -> Self {
        Self { stroke_width: Some(width), ..Self::default() }
    }

    /// Colors this patch sets, fill first so stroke ends up most recent
    pub fn colors(&self) -> impl Iterator<Item = &str> {
        let fill = self.fill.as_ref().and_then(|f| f.as_deref());
        fill.into_iter().chain(self.stroke_color.as_deref())
    }
}

/// `Option<Option<T>>` where an explicit `null` means `Some(None)`
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            None => serializer.serialize_none(),
            Some(inner) => inner.serialize(serializer),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// Recently used colors, most recent first, without duplicates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorHistory {
    colors: Vec<String>,
    cap: usize,
}

impl Default for ColorHistory {
    fn default() -> Self {
        Self::new(COLOR_HISTORY_CAP)
    }
}

impl ColorHistory {
    pub fn new(cap: usize) -> Self {
        Self { colors: Vec::new(), cap: cap.max(1) }
    }

    pub fn record(&mut self, color: &str) {
        self.colors.retain(|c| !c.eq_ignore_ascii_case(color));
        self.colors.insert(0, color.to_string());
        self.colors.truncate(self.cap);
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
