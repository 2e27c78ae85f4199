use super::*;
use crate::sequencer::test_harness::Harness;

fn tracker(src: &str) -> ImageTracker {
    ImageTracker::new(&ImageContent {
        src: src.to_string(),
        ..ImageContent::default()
    })
}

#[test]
fn empty_source_is_never_preloaded() {
    let mut h = Harness::new();
    let mut t = tracker("");
    t.start(&mut h.ctx());
    assert!(h.commands().is_empty());
    assert_eq!(t.status(), AssetStatus::Unset);
}

#[test]
fn preload_then_ready() {
    let mut h = Harness::new();
    let mut t = tracker("logo.png");
    t.start(&mut h.ctx());
    assert_eq!(
        h.commands(),
        vec![HostCommand::Preload {
            ticket: h.ticket(0, 0),
            src: "logo.png".to_string(),
        }]
    );
    assert_eq!(t.status(), AssetStatus::Loading);

    let ticket = h.ticket(0, 0);
    t.on_asset(ticket, AssetEvent::Ready, &mut h.ctx());
    assert_eq!(t.status(), AssetStatus::Ready);
    assert_eq!(h.changes(), vec![Change::ImageReady]);
}

#[test]
fn failure_is_contained() {
    let mut h = Harness::new();
    let mut t = tracker("missing.png");
    t.start(&mut h.ctx());
    let ticket = h.ticket(0, 0);
    t.on_asset(ticket, AssetEvent::Failed, &mut h.ctx());
    assert_eq!(t.status(), AssetStatus::Failed);

    // A late duplicate answer does not flip the status back.
    t.on_asset(ticket, AssetEvent::Ready, &mut h.ctx());
    assert_eq!(t.status(), AssetStatus::Failed);
    assert_eq!(h.changes(), vec![Change::ImageFailed]);
}
