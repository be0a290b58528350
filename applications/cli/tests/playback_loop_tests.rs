//! Tests for the CLI playback loop, driven by the scriptable mock element

use std::sync::atomic::AtomicBool;
use tale_cli::commands::{pump, run_queue, start_queue, Flow};
use tale_cli::CliError;
use tale_playback::mock::MockMediaElement;
use tale_playback::{PlaybackConfig, PlaybackController, PlaybackStatus, QueueItem};

fn item(id: &str) -> QueueItem {
    QueueItem::new(id, format!("owner/{}", id)).with_audio_url(format!("https://cdn.test/{}.mp3", id))
}

fn controller() -> PlaybackController<MockMediaElement> {
    PlaybackController::new(MockMediaElement::new(), PlaybackConfig::default())
}

#[test]
fn test_plays_queue_to_the_end() {
    let mut controller = controller();
    start_queue(&mut controller, vec![item("a"), item("b")]).unwrap();

    controller.element_mut().resolve(30.0);
    assert_eq!(pump(&mut controller).unwrap(), Flow::Continue);
    assert_eq!(controller.status(), PlaybackStatus::Playing);

    controller.element_mut().finish();
    assert_eq!(pump(&mut controller).unwrap(), Flow::Continue);
    assert_eq!(controller.current_item().unwrap().id, "b");

    controller.element_mut().resolve(30.0);
    controller.element_mut().finish();
    assert_eq!(pump(&mut controller).unwrap(), Flow::Finished);
    assert_eq!(controller.status(), PlaybackStatus::Idle);
}

#[test]
fn test_first_item_is_loaded_once() {
    let mut controller = controller();
    start_queue(&mut controller, vec![item("a"), item("b"), item("c")]).unwrap();

    assert_eq!(controller.element().loads(), &["https://cdn.test/a.mp3"]);
    assert_eq!(controller.element().play_calls(), 1);
    assert_eq!(controller.queue_index(), Some(0));
    assert_eq!(controller.queue().len(), 3);
}

#[test]
fn test_failed_item_is_skipped() {
    let mut controller = controller();
    start_queue(&mut controller, vec![item("a"), item("b")]).unwrap();

    controller.element_mut().fail(Some(2), "network error");
    assert_eq!(pump(&mut controller).unwrap(), Flow::Continue);

    assert_eq!(controller.current_item().unwrap().id, "b");
    assert_eq!(
        controller.element().current_url(),
        Some("https://cdn.test/b.mp3")
    );
}

#[test]
fn test_failure_on_last_item_ends_playback() {
    let mut controller = controller();
    start_queue(&mut controller, vec![item("a")]).unwrap();

    controller.element_mut().fail(Some(4), "Source not supported");

    match pump(&mut controller) {
        Err(CliError::Playback(msg)) => assert!(msg.contains("Source not supported")),
        other => panic!("Expected Playback error, got {:?}", other),
    }
}

#[test]
fn test_hidden_player_stops_loop() {
    let mut controller = controller();
    start_queue(&mut controller, vec![item("a")]).unwrap();
    controller.element_mut().resolve(30.0);
    assert_eq!(pump(&mut controller).unwrap(), Flow::Continue);

    controller.hide_player();

    assert_eq!(pump(&mut controller).unwrap(), Flow::Finished);
    assert!(!controller.element().is_playing());
}

#[test]
fn test_empty_queue_rejected() {
    let mut controller = controller();

    assert!(matches!(
        start_queue(&mut controller, Vec::new()),
        Err(CliError::NothingToPlay)
    ));
}

#[test]
fn test_unplayable_item_rejected() {
    let mut controller = controller();

    let result = start_queue(&mut controller, vec![QueueItem::new("silent", "owner/silent")]);

    assert!(matches!(result, Err(CliError::Queue(_))));
    assert!(controller.queue().is_empty());
}

#[test]
fn test_interrupted_loop_returns_immediately() {
    let stop = AtomicBool::new(true);

    let result = run_queue(controller(), vec![item("a")], &stop);

    assert!(result.is_ok());
}
