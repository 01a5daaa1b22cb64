use super::{best_candidate, ActiveSectionResolver, Proposal};
use std::time::{Duration, Instant};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn test_candidate_commits_after_quiet_window() {
    let mut resolver = ActiveSectionResolver::default();
    let t0 = Instant::now();

    let proposal = resolver.propose([("section-1", 1.85)], t0);
    assert_eq!(proposal, Proposal::Staged("section-1".to_string()));
    assert_eq!(resolver.active(), None);

    // Not yet: the window has not elapsed.
    assert_eq!(resolver.poll(t0 + ms(99)), None);
    assert_eq!(resolver.poll(t0 + ms(100)), Some("section-1"));
    assert_eq!(resolver.active(), Some("section-1"));
    assert_eq!(resolver.staged(), None);
}

#[test]
fn test_same_candidate_keeps_its_deadline() {
    let mut resolver = ActiveSectionResolver::default();
    let t0 = Instant::now();

    resolver.propose([("a", 1.0)], t0);
    resolver.propose([("a", 1.2)], t0 + ms(60));
    assert_eq!(resolver.pending_deadline(), Some(t0 + ms(100)));
    assert_eq!(resolver.poll(t0 + ms(100)), Some("a"));
}

#[test]
fn test_different_candidate_restarts_window() {
    let mut resolver = ActiveSectionResolver::default();
    let t0 = Instant::now();

    resolver.propose([("a", 1.0), ("b", 0.5)], t0);
    resolver.propose([("a", 0.5), ("b", 1.0)], t0 + ms(60));
    assert_eq!(resolver.staged(), Some("b"));
    assert_eq!(resolver.poll(t0 + ms(100)), None);
    assert_eq!(resolver.poll(t0 + ms(160)), Some("b"));
}

#[test]
fn test_alternating_candidates_never_commit() {
    let mut resolver = ActiveSectionResolver::default();
    let t0 = Instant::now();

    // Scores flip every 50 ms for a second: no candidate survives a full window.
    for step in 0..20 {
        let now = t0 + ms(step * 50);
        let scores = if step % 2 == 0 {
            [("a", 1.0), ("b", 0.9)]
        } else {
            [("a", 0.9), ("b", 1.0)]
        };
        resolver.propose(scores, now);
        assert_eq!(resolver.poll(now), None);
    }
    assert_eq!(resolver.active(), None);
}

#[test]
fn test_commits_are_at_least_a_window_apart() {
    let mut resolver = ActiveSectionResolver::default();
    let t0 = Instant::now();
    let mut commits = Vec::new();

    // A changing best candidate every 10 ms, polled every 10 ms.
    for step in 0..200u64 {
        let now = t0 + ms(step * 10);
        let id = ["a", "b", "c"][(step / 13) as usize % 3];
        resolver.propose([(id, 1.0)], now);
        if resolver.poll(now).is_some() {
            commits.push(now);
        }
    }
    assert!(commits.len() > 1);
    for pair in commits.windows(2) {
        assert!(pair[1] - pair[0] >= ms(100));
    }
}

#[test]
fn test_floor_is_exclusive() {
    let mut resolver = ActiveSectionResolver::default();
    let t0 = Instant::now();

    assert_eq!(resolver.propose([("a", 0.1)], t0), Proposal::BelowFloor);
    assert_eq!(resolver.propose([("a", 0.05)], t0), Proposal::BelowFloor);
    assert_eq!(
        resolver.propose([("a", 0.1001)], t0),
        Proposal::Staged("a".to_string())
    );
}

#[test]
fn test_empty_batch_keeps_state() {
    let mut resolver = ActiveSectionResolver::default();
    let t0 = Instant::now();

    resolver.propose([("a", 1.0)], t0);
    resolver.poll(t0 + ms(100));
    assert_eq!(resolver.propose(Vec::<(&str, f64)>::new(), t0 + ms(200)), Proposal::Empty);
    assert_eq!(resolver.active(), Some("a"));
}

#[test]
fn test_candidate_that_leaves_is_not_committed() {
    let mut resolver = ActiveSectionResolver::default();
    let t0 = Instant::now();

    resolver.propose([("a", 1.0)], t0);
    resolver.poll(t0 + ms(100));
    resolver.propose([("b", 1.5)], t0 + ms(150));
    assert_eq!(resolver.staged(), Some("b"));

    // b scrolls out before its window ends; a stays active.
    assert_eq!(
        resolver.propose(Vec::<(&str, f64)>::new(), t0 + ms(200)),
        Proposal::Empty
    );
    assert_eq!(resolver.staged(), None);
    assert_eq!(resolver.poll(t0 + ms(250)), None);
    assert_eq!(resolver.active(), Some("a"));
}

#[test]
fn test_candidate_falling_below_floor_is_not_committed() {
    let mut resolver = ActiveSectionResolver::default();
    let t0 = Instant::now();

    resolver.propose([("a", 1.5)], t0);
    assert_eq!(resolver.propose([("a", 0.05)], t0 + ms(50)), Proposal::BelowFloor);
    assert_eq!(resolver.pending_deadline(), None);
    assert_eq!(resolver.poll(t0 + ms(100)), None);
    assert_eq!(resolver.active(), None);
}

#[test]
fn test_active_candidate_drops_staged() {
    let mut resolver = ActiveSectionResolver::default();
    let t0 = Instant::now();

    resolver.propose([("a", 1.0)], t0);
    resolver.poll(t0 + ms(100));
    resolver.propose([("b", 1.0)], t0 + ms(150));
    assert_eq!(resolver.staged(), Some("b"));

    // Scrolling back before b commits cancels it.
    assert_eq!(
        resolver.propose([("a", 1.0)], t0 + ms(180)),
        Proposal::Unchanged
    );
    assert_eq!(resolver.staged(), None);
    assert_eq!(resolver.poll(t0 + ms(400)), None);
    assert_eq!(resolver.active(), Some("a"));
}

#[test]
fn test_tie_goes_to_first_registered() {
    assert_eq!(
        best_candidate([("a", 1.0), ("b", 1.0), ("c", 0.5)]),
        Some(("a", 1.0))
    );
    assert_eq!(
        best_candidate([("c", 0.5), ("b", 1.0), ("a", 1.0)]),
        Some(("b", 1.0))
    );
    assert_eq!(best_candidate(Vec::<(&str, f64)>::new()), None);
}

#[test]
fn test_override_wins_over_pending_candidate() {
    let mut resolver = ActiveSectionResolver::default();
    let t0 = Instant::now();

    resolver.propose([("a", 1.0)], t0);
    resolver.override_active("c", t0 + ms(50));
    assert_eq!(resolver.active(), Some("c"));
    assert_eq!(resolver.staged(), None);

    // The old candidate reappears while the navigation settles: ignored.
    assert_eq!(resolver.propose([("a", 1.0)], t0 + ms(60)), Proposal::Held);
    assert_eq!(resolver.poll(t0 + ms(200)), None);
    assert_eq!(resolver.active(), Some("c"));

    // After the hold, automatic tracking resumes.
    assert!(!resolver.is_held(t0 + ms(150)));
    resolver.propose([("a", 1.0)], t0 + ms(150));
    assert_eq!(resolver.poll(t0 + ms(250)), Some("a"));
}

#[test]
fn test_extend_hold_only_while_held() {
    let mut resolver = ActiveSectionResolver::default();
    let t0 = Instant::now();

    // No hold to extend.
    resolver.extend_hold(t0);
    assert!(!resolver.is_held(t0));

    resolver.override_active("c", t0);
    resolver.extend_hold(t0 + ms(80));
    assert!(resolver.is_held(t0 + ms(179)));
    assert!(!resolver.is_held(t0 + ms(180)));
}

#[test]
fn test_cancel_pending_keeps_committed() {
    let mut resolver = ActiveSectionResolver::new(ms(50), 0.2);
    let t0 = Instant::now();

    resolver.propose([("a", 1.0)], t0);
    resolver.poll(t0 + ms(50));
    resolver.propose([("b", 1.0)], t0 + ms(60));
    resolver.cancel_pending();

    assert_eq!(resolver.pending_deadline(), None);
    assert_eq!(resolver.poll(t0 + ms(500)), None);
    assert_eq!(resolver.active(), Some("a"));
}
