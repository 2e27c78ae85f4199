use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::foundation::{
    core::{AspectRatio, Canvas, Point, Size},
    error::{SignageError, SignageResult},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A persisted signage project.
///
/// Projects (de)serialize as the camelCase JSON documents the authoring tool stores, so a
/// published project can be fed to the engine without translation.
pub struct Project {
    /// Opaque project identifier.
    pub id: String,
    /// Human-readable project name.
    #[serde(default = "default_project_name")]
    pub name: String,
    /// Symbolic ratio label (for example `16:9`).
    #[serde(default = "default_ratio_label")]
    pub ratio: String,
    /// Canvas width in canvas units.
    pub canvas_width: u32,
    /// Canvas height in canvas units.
    pub canvas_height: u32,
    /// Elements in authoring order.
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Whether unattended displays may fetch this project.
    #[serde(default)]
    pub is_published: bool,
    /// Public display code, once published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_code: Option<String>,
    /// Timestamp of the latest publish.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_project_name() -> String {
    "Untitled Project".to_string()
}

fn default_ratio_label() -> String {
    "16:9".to_string()
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One positioned item on the canvas.
pub struct Element {
    /// Unique element identifier.
    pub id: String,
    /// Top-left corner in canvas units.
    pub position: Point,
    /// Extent in canvas units; both dimensions must be > 0.
    pub size: Size,
    /// Stacking order; higher values paint on top.
    #[serde(default)]
    pub z_index: i32,
    /// Type-specific content.
    #[serde(flatten)]
    pub kind: ElementKind,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
/// Type-specific element content, tagged by the JSON `type` field.
pub enum ElementKind {
    /// Single still image.
    Image(ImageContent),
    /// Timed sequence of images.
    Slideshow(SlideshowContent),
    /// Video playlist.
    Video(VideoContent),
    /// Scrolling marquee text.
    Ticker(TickerContent),
    /// Static text block.
    Text(TextContent),
    /// Background audio source.
    Audio(AudioContent),
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
/// Discriminant of [`ElementKind`].
pub enum ElementType {
    /// See [`ImageContent`].
    Image,
    /// See [`SlideshowContent`].
    Slideshow,
    /// See [`VideoContent`].
    Video,
    /// See [`TickerContent`].
    Ticker,
    /// See [`TextContent`].
    Text,
    /// See [`AudioContent`].
    Audio,
}

impl ElementType {
    /// Stable lowercase name, identical to the JSON tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Slideshow => "slideshow",
            Self::Video => "video",
            Self::Ticker => "ticker",
            Self::Text => "text",
            Self::Audio => "audio",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Still image configuration.
pub struct ImageContent {
    /// Image URI; empty means unset.
    #[serde(default)]
    pub src: String,
    /// Alternative text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// How the image fills its box.
    #[serde(default)]
    pub object_fit: ObjectFit,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Image fit mode.
pub enum ObjectFit {
    /// Scale to cover, cropping overflow.
    #[default]
    Cover,
    /// Scale to fit inside, letterboxing.
    Contain,
    /// Stretch to the box.
    Fill,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Slideshow configuration.
pub struct SlideshowContent {
    /// Ordered slides.
    #[serde(default)]
    pub images: Vec<Slide>,
    /// Visual transition between slides.
    #[serde(default)]
    pub transition: SlideTransition,
    /// Advance automatically on each slide's timer.
    #[serde(default)]
    pub auto_play: bool,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// One slideshow image and how long it stays on screen.
pub struct Slide {
    /// Image URI.
    #[serde(default)]
    pub src: String,
    /// Seconds on screen; values that are not finite and > 0 fall back to the default.
    #[serde(default)]
    pub duration: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Slideshow transition style.
pub enum SlideTransition {
    /// Cross-fade between slides.
    #[default]
    Fade,
    /// Slide the next image in.
    Slide,
    /// Cut without animation.
    None,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Video playlist configuration.
pub struct VideoContent {
    /// Legacy single source, used only when `videos` is empty.
    #[serde(default)]
    pub src: String,
    /// Ordered playlist.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<VideoSource>,
    /// Start playback without user interaction.
    #[serde(default)]
    pub auto_play: bool,
    /// Loop the single item, or wrap the playlist.
    #[serde(default, rename = "loop")]
    pub looping: bool,
    /// Start muted.
    #[serde(default)]
    pub muted: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One playlist entry.
pub struct VideoSource {
    /// Video URI.
    pub src: String,
}

impl VideoContent {
    /// Effective playlist: `videos` when non-empty, else the legacy `src`, else nothing.
    pub fn playlist(&self) -> Vec<&str> {
        if !self.videos.is_empty() {
            return self.videos.iter().map(|v| v.src.as_str()).collect();
        }
        if self.src.is_empty() {
            Vec::new()
        } else {
            vec![self.src.as_str()]
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Scrolling ticker configuration.
pub struct TickerContent {
    /// Marquee text.
    #[serde(default)]
    pub text: String,
    /// Unitless speed knob, snapped to a preset at playback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Font size in canvas units.
    #[serde(default = "default_ticker_font_size")]
    pub font_size: f64,
    /// CSS text color.
    #[serde(default = "default_light")]
    pub color: String,
    /// CSS background color.
    #[serde(default = "default_dark")]
    pub background_color: String,
}

impl Default for TickerContent {
    fn default() -> Self {
        Self {
            text: "Breaking news: Your ticker text here...".to_string(),
            speed: Some(5.0),
            font_size: default_ticker_font_size(),
            color: default_light(),
            background_color: default_dark(),
        }
    }
}

fn default_ticker_font_size() -> f64 {
    24.0
}

fn default_light() -> String {
    "#ffffff".to_string()
}

fn default_dark() -> String {
    "#000000".to_string()
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Static text configuration.
pub struct TextContent {
    /// Text body; newlines are preserved.
    #[serde(default)]
    pub content: String,
    /// Font size in canvas units.
    #[serde(default = "default_text_font_size")]
    pub font_size: f64,
    /// Font weight.
    #[serde(default)]
    pub font_weight: FontWeight,
    /// CSS text color.
    #[serde(default = "default_dark")]
    pub color: String,
    /// CSS background color.
    #[serde(default = "default_transparent")]
    pub background_color: String,
    /// Horizontal alignment.
    #[serde(default)]
    pub text_align: TextAlign,
    /// CSS font family.
    #[serde(default = "default_font_family")]
    pub font_family: String,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            content: "Enter your text".to_string(),
            font_size: default_text_font_size(),
            font_weight: FontWeight::Normal,
            color: default_dark(),
            background_color: default_transparent(),
            text_align: TextAlign::Center,
            font_family: default_font_family(),
        }
    }
}

fn default_text_font_size() -> f64 {
    32.0
}

fn default_transparent() -> String {
    "transparent".to_string()
}

fn default_font_family() -> String {
    "sans-serif".to_string()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Font weight.
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Horizontal text alignment.
pub enum TextAlign {
    /// Flush left.
    Left,
    /// Centered.
    #[default]
    Center,
    /// Flush right.
    Right,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Background audio configuration.
pub struct AudioContent {
    /// Audio URI; empty means unset.
    #[serde(default)]
    pub src: String,
    /// Start playback without user interaction.
    #[serde(default)]
    pub auto_play: bool,
    /// Loop natively.
    #[serde(default, rename = "loop")]
    pub looping: bool,
    /// Output volume in `[0, 1]`.
    #[serde(default = "default_volume")]
    pub volume: f64,
}

impl Default for AudioContent {
    fn default() -> Self {
        Self {
            src: String::new(),
            auto_play: true,
            looping: true,
            volume: default_volume(),
        }
    }
}

fn default_volume() -> f64 {
    1.0
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Image(_) => ElementType::Image,
            Self::Slideshow(_) => ElementType::Slideshow,
            Self::Video(_) => ElementType::Video,
            Self::Ticker(_) => ElementType::Ticker,
            Self::Text(_) => ElementType::Text,
            Self::Audio(_) => ElementType::Audio,
        }
    }

    /// Content a freshly added element of `ty` starts with.
    pub fn default_for(ty: ElementType) -> Self {
        match ty {
            ElementType::Image => Self::Image(ImageContent::default()),
            ElementType::Slideshow => Self::Slideshow(SlideshowContent {
                images: Vec::new(),
                transition: SlideTransition::Fade,
                auto_play: true,
            }),
            ElementType::Video => Self::Video(VideoContent {
                auto_play: true,
                looping: true,
                muted: true,
                ..VideoContent::default()
            }),
            ElementType::Ticker => Self::Ticker(TickerContent::default()),
            ElementType::Text => Self::Text(TextContent::default()),
            ElementType::Audio => Self::Audio(AudioContent::default()),
        }
    }
}

impl Element {
    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Validate geometry and content invariants.
    pub fn validate(&self) -> SignageResult<()> {
        if self.id.trim().is_empty() {
            return Err(SignageError::domain("element id must be non-empty"));
        }
        if !self.position.x.is_finite() || !self.position.y.is_finite() {
            return Err(SignageError::domain(format!(
                "element '{}' position must be finite",
                self.id
            )));
        }
        if !(self.size.width.is_finite() && self.size.width > 0.0)
            || !(self.size.height.is_finite() && self.size.height > 0.0)
        {
            return Err(SignageError::domain(format!(
                "element '{}' size must be finite and > 0",
                self.id
            )));
        }

        match &self.kind {
            ElementKind::Ticker(t) => validate_font_size(&self.id, t.font_size)?,
            ElementKind::Text(t) => validate_font_size(&self.id, t.font_size)?,
            ElementKind::Audio(a) => {
                if !a.volume.is_finite() || !(0.0..=1.0).contains(&a.volume) {
                    return Err(SignageError::domain(format!(
                        "element '{}' volume must be within [0, 1]",
                        self.id
                    )));
                }
            }
            ElementKind::Image(_) | ElementKind::Slideshow(_) | ElementKind::Video(_) => {}
        }
        Ok(())
    }
}

fn validate_font_size(id: &str, font_size: f64) -> SignageResult<()> {
    if !font_size.is_finite() || font_size <= 0.0 {
        return Err(SignageError::domain(format!(
            "element '{id}' font size must be finite and > 0"
        )));
    }
    Ok(())
}

impl Project {
    /// Create an empty project on a ratio preset.
    pub fn new(name: impl Into<String>, ratio: &AspectRatio) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            ratio: ratio.label.to_string(),
            canvas_width: ratio.width,
            canvas_height: ratio.height,
            elements: Vec::new(),
            is_published: false,
            publish_code: None,
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Parse a project document without validating it.
    pub fn from_json_str(s: &str) -> SignageResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.canvas_width,
            height: self.canvas_height,
        }
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Validate canvas and element invariants, including id uniqueness.
    pub fn validate(&self) -> SignageResult<()> {
        self.canvas().validate()?;
        let mut seen = HashSet::with_capacity(self.elements.len());
        for element in &self.elements {
            element.validate()?;
            if !seen.insert(element.id.as_str()) {
                return Err(SignageError::domain(format!(
                    "duplicate element id '{}'",
                    element.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
