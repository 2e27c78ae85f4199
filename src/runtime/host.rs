//! Command/event contract between sequencers and the host that owns real media.
//!
//! Sequencers never touch bytes. They ask the host to load or play something by emitting a
//! [`HostCommand`], and the host reports back with an [`AssetEvent`] carrying the same
//! [`AssetTicket`]. Tickets name the sequencer instance that issued them, so events that
//! arrive after the instance was disposed are recognised and dropped.

use crate::runtime::clock::TimePoint;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
/// Generation number assigned to a sequencer when it is created.
pub struct InstanceId(pub u64);

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Identifies one load issued by one sequencer instance.
pub struct AssetTicket {
    /// Issuing sequencer.
    pub instance: InstanceId,
    /// Position of the asset within the element (slide or playlist index).
    pub slot: usize,
    /// Load attempt counter; distinguishes reloads of the same slot.
    pub attempt: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Kind of streamed media element the host should create.
pub enum MediaKind {
    /// `<video>`-like surface.
    Video,
    /// Invisible audio source.
    Audio,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
/// Request from a sequencer to the host.
pub enum HostCommand {
    /// Fetch and decode an image in the background.
    Preload {
        /// Echoed back in the resulting event.
        ticket: AssetTicket,
        /// Image URI.
        src: String,
    },
    /// Load a streamed media source, replacing whatever the instance had loaded before.
    LoadMedia {
        /// Echoed back in the resulting events.
        ticket: AssetTicket,
        /// Video or audio.
        kind: MediaKind,
        /// Media URI.
        src: String,
        /// Native looping of this single source.
        looping: bool,
        /// Start muted.
        muted: bool,
    },
    /// Start playback of the loaded source.
    Play {
        /// Ticket of the loaded source.
        ticket: AssetTicket,
        /// Play muted.
        muted: bool,
    },
    /// Apply a new output volume.
    SetVolume {
        /// Ticket of the loaded source.
        ticket: AssetTicket,
        /// Volume in `[0, 1]`.
        volume: f64,
    },
    /// Switch native looping on a loaded source.
    SetLoop {
        ticket: AssetTicket,
        looping: bool,
    },
    /// Drop every resource the instance holds.
    Release {
        /// Disposed sequencer.
        instance: InstanceId,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Callback from the host about a previously issued load.
pub enum AssetEvent {
    /// The asset is decoded and can be shown or played.
    Ready,
    /// The asset could not be loaded or decoded.
    Failed,
    /// Playback reached the natural end of the source.
    Ended,
    /// The platform refused to start playback without a user gesture.
    PlayBlocked,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One observable state change of a sequencer.
pub struct Transition {
    /// Owning element.
    pub element_id: String,
    /// Sequencer instance that changed.
    pub instance: InstanceId,
    /// Timeline position of the change.
    pub at: TimePoint,
    /// What happened.
    pub change: Change,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Kinds of sequencer state change.
pub enum Change {
    /// A still image finished loading.
    ImageReady,
    /// A still image failed to load.
    ImageFailed,
    /// A slideshow image finished loading.
    SlideLoaded {
        /// Slide index.
        index: usize,
    },
    /// A slideshow image failed to load.
    SlideFailed {
        /// Slide index.
        index: usize,
    },
    /// The slideshow timer moved to the next slide.
    SlideAdvanced {
        /// Previous slide.
        from: usize,
        /// New current slide.
        to: usize,
    },
    /// A playlist item started loading.
    ItemLoading {
        /// Playlist index.
        index: usize,
    },
    /// A playlist item is ready and playing (or paused without autoplay).
    ItemPlaying {
        /// Playlist index.
        index: usize,
    },
    /// A playlist item failed; a skip is pending if the wrap rule allows one.
    ItemFailed {
        /// Playlist index.
        index: usize,
    },
    /// Unmuted autoplay was refused; playback was retried muted.
    MutedFallback {
        /// Playlist index.
        index: usize,
    },
    /// The playlist moved to another item.
    PlaylistAdvanced {
        /// Previous item.
        from: usize,
        /// New current item.
        to: usize,
    },
    /// The playlist reached its end without looping and stopped for good.
    PlaylistStalled {
        /// Item the playlist stopped on.
        index: usize,
    },
    /// Background audio is ready.
    AudioReady,
    /// Background audio playback was requested.
    AudioPlaying,
    /// Autoplay was blocked; playback waits for a user interaction.
    AudioDeferred,
    /// Background audio failed to load.
    AudioFailed,
    /// A new output volume was sent to the host.
    VolumeChanged,
    /// The sequencer was disposed; no further changes follow for this instance.
    Disposed,
}
