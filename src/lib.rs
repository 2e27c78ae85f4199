//! Playback engine for published digital-signage projects.
//!
//! A project is a fixed-resolution canvas of typed elements (images, slideshows, video
//! playlists, tickers, text and background audio). The engine:
//!
//! - maps element geometry onto any output size ([`ScaleMode`])
//! - advances time-based content on a single cooperative timeline ([`DisplayEngine`])
//! - recovers from failed assets without an operator
//!
//! Media bytes never pass through the engine. It talks to its host in [`HostCommand`]s and
//! hears back through [`AssetEvent`]s.
#![forbid(unsafe_code)]

pub mod animation;
pub mod compose;
pub mod composition;
pub mod foundation;
pub mod layout;
pub mod player;
pub mod publish;
pub mod repository;
pub mod runtime;
pub mod sequencer;

pub use crate::animation::ticker::{MarqueeTiming, duration_seconds, start_offset_seconds};
pub use crate::compose::composer::{Composer, Frame, PaintContent, PaintNode, SlideLayer};
pub use crate::composition::edit::ElementPatch;
pub use crate::composition::model::{Element, ElementKind, ElementType, Project};
pub use crate::foundation::config::EngineConfig;
pub use crate::foundation::core::{ASPECT_RATIOS, AspectRatio, Canvas, Point, Rect, Size};
pub use crate::foundation::error::{SignageError, SignageResult};
pub use crate::layout::mapper::{ScaleMode, ScreenLength, ScreenRect, fit_scale, map_rect};
pub use crate::player::engine::{DisplayEngine, DisplayKey, DisplayStatus};
pub use crate::player::simulator::{HostSimulator, Simulation, SimulatorOptions};
pub use crate::publish::code::{PublishCode, publish_project, unpublish_project};
pub use crate::repository::memory::InMemoryProjectRepository;
pub use crate::repository::{ProjectRepository, ProjectUpdate};
pub use crate::runtime::clock::{Clock, ManualClock, SystemClock, TimePoint};
pub use crate::runtime::host::{AssetEvent, AssetTicket, Change, HostCommand, Transition};
