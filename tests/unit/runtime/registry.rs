use super::*;
use crate::{
    composition::model::{
        ElementKind, Slide, SlideshowContent, TickerContent, VideoContent, VideoSource,
    },
    foundation::core::{Point, Size},
    runtime::host::Change,
};

fn element(id: &str, kind: ElementKind) -> Element {
    Element {
        id: id.to_string(),
        position: Point::new(0.0, 0.0),
        size: Size::new(100.0, 100.0),
        z_index: 0,
        kind,
    }
}

fn slideshow(id: &str, srcs: &[&str], auto_play: bool) -> Element {
    element(
        id,
        ElementKind::Slideshow(SlideshowContent {
            images: srcs
                .iter()
                .map(|s| Slide {
                    src: s.to_string(),
                    duration: 2.0,
                })
                .collect(),
            auto_play,
            ..SlideshowContent::default()
        }),
    )
}

fn video(id: &str, srcs: &[&str]) -> Element {
    element(
        id,
        ElementKind::Video(VideoContent {
            videos: srcs
                .iter()
                .map(|s| VideoSource { src: s.to_string() })
                .collect(),
            auto_play: true,
            looping: true,
            ..VideoContent::default()
        }),
    )
}

fn registry() -> SequencerRegistry {
    SequencerRegistry::new(EngineConfig::default())
}

#[test]
fn only_time_based_elements_get_sequencers() {
    let mut r = registry();
    r.replace_all(
        &[
            slideshow("s", &["a", "b"], true),
            element("t", ElementKind::Ticker(TickerContent::default())),
        ],
        TimePoint::ZERO,
    );
    assert_eq!(r.len(), 1);
    assert!(r.instance_of("s").is_some());
    assert!(r.instance_of("t").is_none());
}

#[test]
fn replacing_the_list_cancels_prior_timers() {
    let mut r = registry();
    r.replace_all(&[slideshow("s", &["a", "b"], true)], TimePoint::ZERO);
    let old = r.instance_of("s").unwrap();
    assert_eq!(r.pending_timers(), 1);

    r.replace_all(&[], TimePoint(500));
    assert_eq!(r.pending_timers(), 0);
    r.drain_transitions();

    assert_eq!(r.fire_due(TimePoint(60_000)), 0);
    let ticket = AssetTicket {
        instance: old,
        slot: 0,
        attempt: 0,
    };
    assert!(!r.deliver(ticket, AssetEvent::Ready, TimePoint(60_000)));
    assert!(
        r.drain_transitions()
            .iter()
            .all(|t| t.instance != old)
    );
}

#[test]
fn disposal_releases_host_resources() {
    let mut r = registry();
    r.replace_all(&[video("v", &["a.mp4"])], TimePoint::ZERO);
    let instance = r.instance_of("v").unwrap();
    r.drain_commands();
    r.dispose_all(TimePoint(1));
    assert_eq!(r.drain_commands(), vec![HostCommand::Release { instance }]);
    assert_eq!(
        r.drain_transitions().last().map(|t| t.change),
        Some(Change::Disposed)
    );
}

#[test]
fn reconcile_keeps_sequencers_with_unchanged_sources() {
    let mut r = registry();
    r.replace_all(&[slideshow("s", &["a", "b"], true)], TimePoint::ZERO);
    let before = r.instance_of("s");

    r.reconcile(&[slideshow("s", &["a", "b"], false)], TimePoint(100));
    assert_eq!(r.instance_of("s"), before);
    assert_eq!(r.pending_timers(), 0);

    r.reconcile(&[slideshow("s", &["a", "c"], false)], TimePoint(200));
    assert_ne!(r.instance_of("s"), before);
}

#[test]
fn reconcile_disposes_removed_elements() {
    let mut r = registry();
    r.replace_all(
        &[slideshow("s", &["a", "b"], true), video("v", &["x.mp4"])],
        TimePoint::ZERO,
    );
    r.reconcile(&[video("v", &["x.mp4"])], TimePoint(10));
    assert_eq!(r.len(), 1);
    assert!(r.instance_of("s").is_none());
    assert_eq!(r.pending_timers(), 0);
}

#[test]
fn sequencer_lookup_checks_identity() {
    let mut r = registry();
    let original = slideshow("s", &["a", "b"], true);
    r.replace_all(std::slice::from_ref(&original), TimePoint::ZERO);
    assert!(r.sequencer_for(&original).is_some());
    assert!(r.sequencer_for(&slideshow("s", &["z"], true)).is_none());
}

#[test]
fn timers_fire_at_their_deadline() {
    let mut r = registry();
    r.replace_all(&[slideshow("s", &["a", "b"], true)], TimePoint::ZERO);
    r.drain_transitions();
    assert_eq!(r.next_deadline(), Some(TimePoint(2000)));

    assert_eq!(r.fire_due(TimePoint(4500)), 2);
    let at: Vec<u64> = r
        .drain_transitions()
        .iter()
        .map(|t| t.at.as_millis())
        .collect();
    assert_eq!(at, vec![2000, 4000]);
}

#[test]
fn events_reach_the_live_instance() {
    let mut r = registry();
    r.replace_all(&[video("v", &["a.mp4", "b.mp4"])], TimePoint::ZERO);
    let ticket = match r.drain_commands().as_slice() {
        [HostCommand::LoadMedia { ticket, .. }] => *ticket,
        other => panic!("unexpected commands: {other:?}"),
    };
    assert!(r.deliver(ticket, AssetEvent::Ready, TimePoint(10)));
    assert!(r.deliver(ticket, AssetEvent::Ended, TimePoint(20)));
    let changes: Vec<Change> = r.drain_transitions().into_iter().map(|t| t.change).collect();
    assert!(changes.contains(&Change::PlaylistAdvanced { from: 0, to: 1 }));
}
