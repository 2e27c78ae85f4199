//! The cooperative playback timeline: clock, timers, host contract and the registry that
//! routes stimuli to per-element sequencers.

pub mod clock;
pub mod effects;
pub mod host;
pub mod registry;
pub mod signature;
pub mod timers;
