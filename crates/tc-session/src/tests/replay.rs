use std::time::{Duration, Instant};

use super::*;

const LATER: Duration = Duration::from_secs(1);

#[test]
fn test_bushu_through_replay() {
    let mut session = make_session();
    let mut host = FakeHost::without_ranges();
    let t0 = Instant::now();

    type_keys(&mut session, &mut host, "kakb", t0);
    assert_eq!(host.contents(), "日月");
    assert_eq!(session.mirror().as_str(), "日月");

    type_keys(&mut session, &mut host, "jf", t0);
    // Nothing happens until the scheduled tasks run.
    assert_eq!(host.contents(), "日月");
    assert!(!session.replay_idle());
    let pending = session.pending_commit().unwrap();
    assert_eq!(pending.range, None);

    assert_eq!(session.tick(&mut host, t0 + LATER), 3);
    assert_eq!(host.contents(), "明");
    assert_eq!(session.mirror().as_str(), "明");
    assert_eq!(session.expected_deletes(), 2);

    echo_deletes(&mut session, &mut host, t0 + LATER);
    assert_eq!(session.expected_deletes(), 0);
    assert_eq!(host.contents(), "明");
    // The echoed deletes did not cancel the conversion.
    assert!(session.pending_commit().is_some());
}

#[test]
fn test_replay_runs_at_fixed_intervals() {
    let mut session = make_session();
    let mut host = FakeHost::without_ranges();
    let t0 = Instant::now();
    let delay = Settings::default().replay.synthetic_delete_delay();

    type_keys(&mut session, &mut host, "kakbjf", t0);
    assert_eq!(session.tick(&mut host, t0), 0);
    assert_eq!(session.tick(&mut host, t0 + delay), 1);
    assert_eq!(host.contents(), "日");
    assert_eq!(session.tick(&mut host, t0 + delay * 2), 1);
    assert_eq!(session.tick(&mut host, t0 + delay * 3), 1);
    assert_eq!(host.contents(), "明");
    assert!(session.replay_idle());
}

#[test]
fn test_cancel_through_replay() {
    let mut session = make_session();
    let mut host = FakeHost::without_ranges();
    let t0 = Instant::now();

    type_keys(&mut session, &mut host, "kakbjf", t0);
    session.tick(&mut host, t0 + Duration::from_millis(100));
    echo_deletes(&mut session, &mut host, t0 + Duration::from_millis(100));

    let resp = press(&mut session, &mut host, KeySymbol::Delete, t0 + Duration::from_millis(200));
    assert!(resp.consumed);
    assert_eq!(session.stats().cancelled, 1);

    session.tick(&mut host, t0 + LATER);
    assert_eq!(host.contents(), "日月");
    assert_eq!(session.expected_deletes(), 1);
    echo_deletes(&mut session, &mut host, t0 + LATER);
    assert_eq!(session.mirror().as_str(), "日月");
}

#[test]
fn test_real_key_finishes_replay_first() {
    let mut session = make_session();
    let mut host = FakeHost::without_ranges();
    let t0 = Instant::now();

    type_keys(&mut session, &mut host, "kakbjf", t0);
    let resp = press(&mut session, &mut host, KeySymbol::text("x"), t0 + Duration::from_millis(1));
    assert!(!resp.consumed);
    assert_eq!(host.contents(), "明x");
    echo_deletes(&mut session, &mut host, t0 + Duration::from_millis(2));
    assert_eq!(host.contents(), "明x");
    assert_eq!(session.stats().accepted, 1);
}

#[test]
fn test_replay_over_limit_is_refused() {
    let mut settings = Settings::default();
    settings.replay.synthetic_delete_count_limit = 1;
    let mut session = InputSession::new(resources_with(settings));
    let mut host = FakeHost::without_ranges();
    let t0 = Instant::now();

    type_keys(&mut session, &mut host, "kakbjf", t0);
    assert!(session.replay_idle());
    assert!(session.pending_commit().is_none());
    session.tick(&mut host, t0 + LATER);
    assert_eq!(host.contents(), "日月");
}

#[test]
fn test_teardown_drops_scheduled_tasks() {
    let mut session = make_session();
    let mut host = FakeHost::without_ranges();
    let t0 = Instant::now();

    type_keys(&mut session, &mut host, "kakbjf", t0);
    session.teardown();
    assert!(session.replay_idle());
    assert_eq!(session.stats().accepted, 1);
    session.tick(&mut host, t0 + LATER);
    assert_eq!(host.contents(), "日月");
}

#[test]
fn test_mazegaki_through_replay() {
    let mut session = make_session();
    let mut host = FakeHost::without_ranges();
    let t0 = Instant::now();

    type_keys(&mut session, &mut host, "xmc", t0);
    type_keys(&mut session, &mut host, "fj", t0);
    session.tick(&mut host, t0 + LATER);
    echo_deletes(&mut session, &mut host, t0 + LATER);
    assert_eq!(host.contents(), "x字");
    assert_eq!(session.mirror().as_str(), "x字");
}

#[test]
fn test_selection_commit_then_escape_through_replay() {
    let mut session = make_session();
    let mut host = FakeHost::without_ranges();
    let t0 = Instant::now();

    type_keys(&mut session, &mut host, "mambmcfj", t0);
    assert!(session.is_selecting());
    let resp = press(&mut session, &mut host, KeySymbol::text("x"), t0);
    assert!(!resp.consumed);
    assert_eq!(host.contents(), "漢字x");
    assert!(session.pending_commit().is_none());

    press(&mut session, &mut host, KeySymbol::Escape, t0 + Duration::from_millis(100));
    echo_deletes(&mut session, &mut host, t0 + Duration::from_millis(100));
    session.tick(&mut host, t0 + LATER);
    assert_eq!(host.contents(), "漢字x");
    assert_eq!(session.stats().cancelled, 0);
}

#[test]
fn test_delete_during_selection_reverts_through_replay() {
    let mut session = make_session();
    let mut host = FakeHost::without_ranges();
    let t0 = Instant::now();

    type_keys(&mut session, &mut host, "mambmcfj", t0);
    let resp = press(&mut session, &mut host, KeySymbol::Delete, t0 + Duration::from_millis(10));
    assert!(resp.consumed);
    assert_eq!(host.contents(), "漢字");
    assert_eq!(session.stats().cancelled, 1);
    echo_deletes(&mut session, &mut host, t0 + Duration::from_millis(20));

    session.tick(&mut host, t0 + LATER);
    echo_deletes(&mut session, &mut host, t0 + LATER);
    assert_eq!(host.contents(), "かんじ");
    assert_eq!(session.mirror().as_str(), "かんじ");
    assert!(session.pending_commit().is_none());
}
