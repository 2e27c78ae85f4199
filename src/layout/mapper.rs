use crate::{
    composition::model::Element,
    foundation::{
        core::{Canvas, Rect, Size},
        error::{SignageError, SignageResult},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
/// How canvas units are mapped onto the output surface.
pub enum ScaleMode {
    /// Multiply by a single scalar; results are pixels (editor previews).
    Pixel {
        /// Pixels per canvas unit.
        scale: f64,
    },
    /// Resolution independent: percentages of the canvas, fonts in viewport height.
    Percent,
}

impl ScaleMode {
    pub fn validate(self) -> SignageResult<()> {
        if let Self::Pixel { scale } = self
            && (!scale.is_finite() || scale <= 0.0)
        {
            return Err(SignageError::domain(format!(
                "pixel scale must be finite and > 0 (got {scale})"
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Unit of a mapped length.
pub enum LengthUnit {
    /// Device pixels.
    Px,
    /// Percent of the containing canvas dimension.
    Percent,
    /// Percent of the viewport height.
    Vh,
}

impl LengthUnit {
    fn css_suffix(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Percent => "%",
            Self::Vh => "vh",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A single mapped length.
pub struct ScreenLength {
    /// Magnitude in `unit`.
    pub value: f64,
    /// Unit of `value`.
    pub unit: LengthUnit,
}

impl ScreenLength {
    /// CSS notation, e.g. `50%` or `2.5vh`.
    pub fn css(self) -> String {
        format!("{}{}", self.value, self.unit.css_suffix())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// An element rectangle in renderer space.
pub struct ScreenRect {
    /// Left offset.
    pub x: f64,
    /// Top offset.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Unit shared by all four values.
    pub unit: LengthUnit,
}

/// Map a canvas-space rectangle into renderer space.
pub fn map_rect(rect: Rect, canvas: Canvas, mode: ScaleMode) -> SignageResult<ScreenRect> {
    canvas.validate()?;
    mode.validate()?;
    let rect = rect.abs();
    Ok(match mode {
        ScaleMode::Pixel { scale } => ScreenRect {
            x: rect.x0 * scale,
            y: rect.y0 * scale,
            width: rect.width() * scale,
            height: rect.height() * scale,
            unit: LengthUnit::Px,
        },
        ScaleMode::Percent => {
            let cw = f64::from(canvas.width);
            let ch = f64::from(canvas.height);
            ScreenRect {
                x: rect.x0 / cw * 100.0,
                y: rect.y0 / ch * 100.0,
                width: rect.width() / cw * 100.0,
                height: rect.height() / ch * 100.0,
                unit: LengthUnit::Percent,
            }
        }
    })
}

/// Map an element's position and size.
pub fn map_element(element: &Element, canvas: Canvas, mode: ScaleMode) -> SignageResult<ScreenRect> {
    map_rect(
        Rect::from_origin_size(element.position, element.size),
        canvas,
        mode,
    )
}

/// Map a font size authored in canvas units.
pub fn map_font_size(font_size: f64, canvas: Canvas, mode: ScaleMode) -> SignageResult<ScreenLength> {
    canvas.validate()?;
    mode.validate()?;
    Ok(match mode {
        ScaleMode::Pixel { scale } => ScreenLength {
            value: font_size * scale,
            unit: LengthUnit::Px,
        },
        ScaleMode::Percent => ScreenLength {
            value: font_size / f64::from(canvas.height) * 100.0,
            unit: LengthUnit::Vh,
        },
    })
}

/// Largest pixel scale at which the whole canvas fits inside `viewport`.
pub fn fit_scale(canvas: Canvas, viewport: Size) -> SignageResult<f64> {
    canvas.validate()?;
    if !(viewport.width.is_finite() && viewport.width > 0.0)
        || !(viewport.height.is_finite() && viewport.height > 0.0)
    {
        return Err(SignageError::domain("viewport must be finite and > 0"));
    }
    Ok((viewport.width / f64::from(canvas.width)).min(viewport.height / f64::from(canvas.height)))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/mapper.rs"]
mod tests;
