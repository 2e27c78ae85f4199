use crate::{
    animation::ticker::MarqueeTiming,
    composition::model::{
        AudioContent, Element, ElementKind, ElementType, FontWeight, ImageContent, ObjectFit,
        SlideTransition, SlideshowContent, TextAlign, VideoContent,
    },
    foundation::{core::Canvas, error::SignageResult},
    layout::mapper::{ScaleMode, ScreenLength, ScreenRect, map_element, map_font_size},
    runtime::registry::SequencerRegistry,
    sequencer::{AssetStatus, AudioState, PlaybackPhase, Sequencer},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Everything a renderer needs to draw one frame, in paint order.
pub struct Frame {
    pub canvas: Canvas,
    pub mode: ScaleMode,
    pub nodes: Vec<PaintNode>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One element, mapped and resolved against its runtime state.
pub struct PaintNode {
    pub element_id: String,
    pub element_type: ElementType,
    pub z_index: i32,
    pub rect: ScreenRect,
    pub content: PaintContent,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Visible (or audible) content of a paint node.
pub enum PaintContent {
    /// Type-specific empty state for an element with no source.
    Placeholder { element_type: ElementType },
    Image {
        src: String,
        alt: Option<String>,
        fit: ObjectFit,
        status: AssetStatus,
    },
    Slideshow {
        /// One layer per image, in slideshow order.
        layers: Vec<SlideLayer>,
        shown: Option<usize>,
        /// Cover the element until the first image has loaded.
        placeholder: bool,
        transition: SlideTransition,
    },
    Video {
        src: String,
        index: usize,
        count: usize,
        native_loop: bool,
        /// Includes the muted autoplay fallback.
        muted: bool,
        autoplay: bool,
        loading: bool,
        unavailable: bool,
        stalled: bool,
    },
    Ticker {
        text: String,
        font_size: ScreenLength,
        color: String,
        background_color: String,
        timing: MarqueeTiming,
    },
    Text {
        content: String,
        font_size: ScreenLength,
        font_weight: FontWeight,
        text_align: TextAlign,
        color: String,
        background_color: String,
        font_family: String,
    },
    /// Non-visual; drives the host's hidden audio element.
    Audio {
        src: String,
        state: AudioState,
        volume: f64,
        looping: bool,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One slideshow image and its current opacity.
pub struct SlideLayer {
    pub src: String,
    pub opacity: f64,
}

/// Turns an element snapshot plus runtime state into a [`Frame`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Composer;

impl Composer {
    /// Compose one frame. Elements paint in ascending `z_index`; ties keep list order.
    ///
    /// Never fails because of content. Errors come only from an invalid canvas or scale mode.
    #[tracing::instrument(skip(elements, registry), fields(elements = elements.len()))]
    pub fn compose_frame(
        elements: &[Element],
        canvas: Canvas,
        mode: ScaleMode,
        registry: &SequencerRegistry,
    ) -> SignageResult<Frame> {
        canvas.validate()?;
        mode.validate()?;

        let mut order: Vec<&Element> = elements.iter().collect();
        order.sort_by_key(|e| e.z_index);

        let mut nodes = Vec::with_capacity(order.len());
        for element in order {
            let rect = map_element(element, canvas, mode)?;
            let content = paint_content(element, canvas, mode, registry.sequencer_for(element))?;
            nodes.push(PaintNode {
                element_id: element.id.clone(),
                element_type: element.element_type(),
                z_index: element.z_index,
                rect,
                content,
            });
        }

        Ok(Frame {
            canvas,
            mode,
            nodes,
        })
    }
}

fn paint_content(
    element: &Element,
    canvas: Canvas,
    mode: ScaleMode,
    sequencer: Option<&Sequencer>,
) -> SignageResult<PaintContent> {
    let placeholder = PaintContent::Placeholder {
        element_type: element.element_type(),
    };
    Ok(match &element.kind {
        ElementKind::Image(c) if c.src.is_empty() => placeholder,
        ElementKind::Image(c) => image_content(c, sequencer),
        ElementKind::Slideshow(c) if c.images.is_empty() => placeholder,
        ElementKind::Slideshow(c) => slideshow_content(c, sequencer),
        ElementKind::Video(c) => match video_content(c, sequencer) {
            Some(content) => content,
            None => placeholder,
        },
        ElementKind::Audio(c) if c.src.is_empty() => placeholder,
        ElementKind::Audio(c) => audio_content(c, sequencer),
        ElementKind::Ticker(c) => PaintContent::Ticker {
            text: c.text.clone(),
            font_size: map_font_size(c.font_size, canvas, mode)?,
            color: c.color.clone(),
            background_color: c.background_color.clone(),
            timing: MarqueeTiming::for_speed(c.speed),
        },
        ElementKind::Text(c) => PaintContent::Text {
            content: c.content.clone(),
            font_size: map_font_size(c.font_size, canvas, mode)?,
            font_weight: c.font_weight,
            text_align: c.text_align,
            color: c.color.clone(),
            background_color: c.background_color.clone(),
            font_family: c.font_family.clone(),
        },
    })
}

fn image_content(c: &ImageContent, sequencer: Option<&Sequencer>) -> PaintContent {
    let status = match sequencer {
        Some(Sequencer::Image(t)) => t.status(),
        _ => AssetStatus::Loading,
    };
    PaintContent::Image {
        src: c.src.clone(),
        alt: c.alt.clone(),
        fit: c.object_fit,
        status,
    }
}

fn slideshow_content(c: &SlideshowContent, sequencer: Option<&Sequencer>) -> PaintContent {
    let (shown, placeholder) = match sequencer {
        Some(Sequencer::Slideshow(s)) => (s.shown(), s.placeholder()),
        _ => (None, true),
    };
    let layers = c
        .images
        .iter()
        .enumerate()
        .map(|(i, slide)| SlideLayer {
            src: slide.src.clone(),
            opacity: if shown == Some(i) { 1.0 } else { 0.0 },
        })
        .collect();
    PaintContent::Slideshow {
        layers,
        shown,
        placeholder,
        transition: c.transition,
    }
}

fn video_content(c: &VideoContent, sequencer: Option<&Sequencer>) -> Option<PaintContent> {
    let playlist = c.playlist();
    if playlist.is_empty() {
        return None;
    }
    let count = playlist.len();
    let content = match sequencer {
        Some(Sequencer::Playlist(p)) => PaintContent::Video {
            src: p.current_src().unwrap_or_default().to_string(),
            index: p.index(),
            count,
            native_loop: p.native_loop(),
            muted: p.is_muted(),
            autoplay: p.auto_play(),
            loading: p.phase() == PlaybackPhase::Loading,
            unavailable: p.phase() == PlaybackPhase::Errored,
            stalled: p.phase() == PlaybackPhase::Stalled,
        },
        _ => PaintContent::Video {
            src: playlist[0].to_string(),
            index: 0,
            count,
            native_loop: c.looping && count == 1,
            muted: c.muted,
            autoplay: c.auto_play,
            loading: true,
            unavailable: false,
            stalled: false,
        },
    };
    Some(content)
}

fn audio_content(c: &AudioContent, sequencer: Option<&Sequencer>) -> PaintContent {
    let state = match sequencer {
        Some(Sequencer::Audio(a)) => a.state(),
        _ => AudioState::Idle,
    };
    PaintContent::Audio {
        src: c.src.clone(),
        state,
        volume: c.volume,
        looping: c.looping,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/composer.rs"]
mod tests;
