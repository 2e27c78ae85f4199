use crate::foundation::error::{SignageError, SignageResult};

pub use kurbo::{Point, Rect, Size};

/// Fixed virtual resolution that element geometry is authored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> SignageResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    pub fn validate(self) -> SignageResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SignageError::domain(format!(
                "canvas dimensions must be > 0 (got {}x{})",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    pub fn rect(self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.size())
    }
}

/// A named canvas preset offered by the authoring tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AspectRatio {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Ratio presets in the order the authoring tool lists them; the first is the default.
pub const ASPECT_RATIOS: [AspectRatio; 4] = [
    AspectRatio {
        label: "16:9",
        width: 1920,
        height: 1080,
    },
    AspectRatio {
        label: "9:16",
        width: 1080,
        height: 1920,
    },
    AspectRatio {
        label: "1:1",
        width: 1080,
        height: 1080,
    },
    AspectRatio {
        label: "4:3",
        width: 1440,
        height: 1080,
    },
];

impl AspectRatio {
    pub fn find(label: &str) -> Option<&'static AspectRatio> {
        ASPECT_RATIOS.iter().find(|r| r.label == label.trim())
    }

    /// Like [`AspectRatio::find`], falling back to the default preset.
    pub fn resolve(label: &str) -> &'static AspectRatio {
        Self::find(label).unwrap_or(&ASPECT_RATIOS[0])
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
