use super::*;
use crate::{
    composition::model::VideoSource, runtime::clock::TimePoint, sequencer::test_harness::Harness,
};

fn content(n: usize, looping: bool) -> VideoContent {
    VideoContent {
        videos: (0..n)
            .map(|i| VideoSource {
                src: format!("clip-{i}.mp4"),
            })
            .collect(),
        auto_play: true,
        looping,
        muted: false,
        ..VideoContent::default()
    }
}

fn started(n: usize, looping: bool) -> (Harness, PlaylistSequencer) {
    let mut h = Harness::new();
    let mut s = PlaylistSequencer::new(&content(n, looping));
    s.start(&mut h.ctx());
    (h, s)
}

fn current(h: &Harness, s: &PlaylistSequencer) -> AssetTicket {
    h.ticket(s.index, s.attempt)
}

fn answer(h: &mut Harness, s: &mut PlaylistSequencer, event: AssetEvent) {
    let ticket = current(h, s);
    s.on_asset(ticket, event, &mut h.ctx());
}

fn play_to_end(h: &mut Harness, s: &mut PlaylistSequencer) {
    answer(h, s, AssetEvent::Ready);
    answer(h, s, AssetEvent::Ended);
}

fn skip_timers(h: &mut Harness, s: &mut PlaylistSequencer, until_ms: u64) {
    h.run_until(TimePoint(until_ms), |fired, ctx| s.on_timer(fired, ctx));
}

#[test]
fn looping_playlist_wraps_after_last_item() {
    let (mut h, mut s) = started(3, true);
    for expected in [1, 2, 0] {
        play_to_end(&mut h, &mut s);
        assert_eq!(s.index(), expected);
        assert_eq!(s.phase(), PlaybackPhase::Loading);
    }
}

#[test]
fn non_looping_playlist_stalls_on_last_item() {
    let (mut h, mut s) = started(3, false);
    play_to_end(&mut h, &mut s);
    play_to_end(&mut h, &mut s);
    assert_eq!(s.index(), 2);
    play_to_end(&mut h, &mut s);
    assert_eq!(s.index(), 2);
    assert_eq!(s.phase(), PlaybackPhase::Stalled);
    assert!(
        h.changes()
            .contains(&Change::PlaylistStalled { index: 2 })
    );
}

#[test]
fn failed_item_is_skipped_after_delay() {
    let (mut h, mut s) = started(3, false);
    play_to_end(&mut h, &mut s);
    assert_eq!(s.index(), 1);

    answer(&mut h, &mut s, AssetEvent::Failed);
    assert_eq!(s.phase(), PlaybackPhase::Errored);
    assert!(s.skip_pending());

    skip_timers(&mut h, &mut s, 999);
    assert_eq!(s.index(), 1);

    skip_timers(&mut h, &mut s, 1000);
    assert_eq!(s.index(), 2);
    assert_eq!(s.phase(), PlaybackPhase::Loading);
    assert!(!s.skip_pending());
}

#[test]
fn error_on_last_item_follows_wrap_rule() {
    let (mut h, mut s) = started(2, true);
    play_to_end(&mut h, &mut s);
    answer(&mut h, &mut s, AssetEvent::Failed);
    skip_timers(&mut h, &mut s, 1000);
    assert_eq!(s.index(), 0);

    let (mut h, mut s) = started(2, false);
    play_to_end(&mut h, &mut s);
    answer(&mut h, &mut s, AssetEvent::Failed);
    assert!(!s.skip_pending());
    skip_timers(&mut h, &mut s, 60_000);
    assert_eq!(s.index(), 1);
    assert_eq!(s.phase(), PlaybackPhase::Errored);
}

#[test]
fn single_item_uses_native_loop() {
    let (mut h, s) = started(1, true);
    assert!(s.native_loop());
    assert!(matches!(
        h.commands().as_slice(),
        [HostCommand::LoadMedia { looping: true, kind: MediaKind::Video, .. }]
    ));

    let (mut h, s) = started(3, true);
    assert!(!s.native_loop());
    assert!(matches!(
        h.commands().as_slice(),
        [HostCommand::LoadMedia { looping: false, .. }]
    ));
}

#[test]
fn single_item_error_retries_only_when_looping() {
    let (mut h, mut s) = started(1, true);
    let first_attempt = s.attempt;
    answer(&mut h, &mut s, AssetEvent::Failed);
    skip_timers(&mut h, &mut s, 1000);
    assert_eq!(s.index(), 0);
    assert_eq!(s.phase(), PlaybackPhase::Loading);
    assert!(s.attempt > first_attempt);

    let (mut h, mut s) = started(1, false);
    answer(&mut h, &mut s, AssetEvent::Failed);
    skip_timers(&mut h, &mut s, 60_000);
    assert_eq!(s.phase(), PlaybackPhase::Errored);
}

#[test]
fn stale_callbacks_are_ignored() {
    let (mut h, mut s) = started(3, true);
    let old = current(&h, &s);
    play_to_end(&mut h, &mut s);
    assert_eq!(s.index(), 1);
    h.changes();

    s.on_asset(old, AssetEvent::Failed, &mut h.ctx());
    s.on_asset(old, AssetEvent::Ended, &mut h.ctx());
    assert_eq!(s.index(), 1);
    assert_eq!(s.phase(), PlaybackPhase::Loading);
    assert!(h.changes().is_empty());
    assert!(!s.skip_pending());
}

#[test]
fn blocked_autoplay_retries_muted_once() {
    let (mut h, mut s) = started(2, true);
    answer(&mut h, &mut s, AssetEvent::Ready);
    h.commands();

    answer(&mut h, &mut s, AssetEvent::PlayBlocked);
    assert!(s.is_muted());
    assert!(matches!(
        h.commands().as_slice(),
        [HostCommand::Play { muted: true, .. }]
    ));

    answer(&mut h, &mut s, AssetEvent::PlayBlocked);
    assert!(h.commands().is_empty());

    // The fallback does not carry over to the next item.
    answer(&mut h, &mut s, AssetEvent::Ended);
    assert!(!s.is_muted());
}

#[test]
fn without_autoplay_items_load_but_do_not_play() {
    let mut h = Harness::new();
    let mut s = PlaylistSequencer::new(&VideoContent {
        auto_play: false,
        ..content(2, true)
    });
    s.start(&mut h.ctx());
    answer(&mut h, &mut s, AssetEvent::Ready);
    assert!(
        !h.commands()
            .iter()
            .any(|c| matches!(c, HostCommand::Play { .. }))
    );
}

#[test]
fn empty_playlist_is_idle() {
    let (mut h, s) = started(0, true);
    assert_eq!(s.phase(), PlaybackPhase::Idle);
    assert_eq!(s.current_src(), None);
    assert!(h.commands().is_empty());
}
