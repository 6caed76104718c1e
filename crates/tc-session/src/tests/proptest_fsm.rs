//! Property-based tests for the InputSession state machine.
//!
//! Random keystrokes, clock advances and timer ticks are run against a fake
//! host, with and without addressable ranges. Structural invariants are
//! checked after every step.

use std::time::{Duration, Instant};

use proptest::prelude::*;

use super::*;
use crate::CandidateAction;

#[derive(Debug, Clone)]
enum Step {
    Key(KeySymbol),
    /// Advance the clock without delivering anything.
    Wait(u64),
    /// The host's replay timer fires.
    Tick,
    Teardown,
}

fn arb_key() -> impl Strategy<Value = KeySymbol> {
    prop_oneof![
        40 => prop::sample::select(vec![
            'k', 'a', 'b', 'c', 'e', 'm', 'd', 'f', 'j', '5', '8', '4', '3', 'x',
        ])
        .prop_map(KeySymbol::from_char),
        6 => Just(KeySymbol::Space),
        6 => Just(KeySymbol::Delete),
        3 => Just(KeySymbol::Escape),
        3 => Just(KeySymbol::Enter),
        2 => Just(KeySymbol::Left),
        2 => Just(KeySymbol::Right),
        2 => Just(KeySymbol::Up),
        2 => Just(KeySymbol::Down),
        2 => Just(KeySymbol::Control('g')),
    ]
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        60 => arb_key().prop_map(Step::Key),
        6 => prop::sample::select(vec![5u64, 30, 400, 2000]).prop_map(Step::Wait),
        6 => Just(Step::Tick),
        1 => Just(Step::Teardown),
    ]
}

fn assert_response(resp: &KeyResponse, step: &Step) {
    if let CandidateAction::Show { surfaces, selected } = &resp.candidates {
        assert!(!surfaces.is_empty(), "empty candidate list after {step:?}");
        assert!(
            (*selected as usize) < surfaces.len(),
            "selected ({selected}) out of bounds for {} candidates after {step:?}",
            surfaces.len(),
        );
    }
    if let Some(text) = &resp.commit {
        assert!(!text.is_empty(), "empty commit after {step:?}");
    }
}

fn assert_invariants(session: &InputSession, host: &FakeHost, step: &Step) {
    // 1. Every opened commit is accepted, cancelled, or still open.
    let stats = session.stats();
    let open = usize::from(session.pending_commit().is_some());
    assert_eq!(
        stats.accepted + stats.cancelled + open,
        stats.opened,
        "pending commit bookkeeping after {step:?}: {stats:?}",
    );

    // 2. Selection indices stay in range.
    if let Some((hit, cand, hits, cands)) = session.selection_position() {
        assert!(hit < hits, "hit {hit} of {hits} after {step:?}");
        assert!(cand < cands, "candidate {cand} of {cands} after {step:?}");
    }

    // 3. Every synthetic delete that ran is still owed an echo.
    assert_eq!(
        session.expected_deletes(),
        host.echoes,
        "expected deletes out of step with the host after {step:?}",
    );

    // 4. The mirror only ever holds text that really precedes the cursor.
    let before: String = host.text[..host.cursor].iter().collect();
    assert!(
        before.ends_with(session.mirror().as_str()),
        "mirror {:?} is not a suffix of {before:?} after {step:?}",
        session.mirror().as_str(),
    );
}

fn run(steps: &[Step], mut host: FakeHost) {
    let mut session = make_session();
    let mut now = Instant::now();
    for step in steps {
        match step {
            Step::Key(key) => {
                // The OS delivers our own backspaces before the next keystroke.
                echo_deletes(&mut session, &mut host, now);
                let resp = press(&mut session, &mut host, key.clone(), now);
                assert_response(&resp, step);
            }
            Step::Wait(ms) => now += Duration::from_millis(*ms),
            Step::Tick => {
                session.tick(&mut host, now);
            }
            Step::Teardown => session.teardown(),
        }
        assert_invariants(&session, &host, step);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn session_invariants_with_ranges(steps in prop::collection::vec(arb_step(), 1..120)) {
        run(&steps, FakeHost::new());
    }

    #[test]
    fn session_invariants_through_replay(steps in prop::collection::vec(arb_step(), 1..120)) {
        run(&steps, FakeHost::without_ranges());
    }
}
