use super::{even_thresholds, IntersectionWatch, Target};
use crate::fake_host::FakeHost;

fn target(id: &str) -> Target {
    Target {
        section_id: id.to_string(),
        anchor: id.to_string(),
    }
}

#[test]
fn test_even_thresholds() {
    assert_eq!(even_thresholds(4), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    assert_eq!(even_thresholds(0), vec![0.0, 1.0]);
}

#[test]
fn test_first_check_reports_every_mounted_target() {
    let host = FakeHost::new(800.0, 3000.0)
        .with_element("a", 0.0, 400.0)
        .with_element("b", 1000.0, 400.0);
    let mut watch = IntersectionWatch::default();
    watch.observe_all(vec![target("a"), target("b"), target("missing")]);

    let batch = watch.check(&host);
    let ids: Vec<_> = batch.iter().map(|o| o.section_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(batch[0].is_intersecting);
    assert!(!batch[1].is_intersecting);
}

#[test]
fn test_only_threshold_crossings_are_reported() {
    let mut host = FakeHost::new(800.0, 3000.0).with_element("a", 600.0, 400.0);
    let mut watch = IntersectionWatch::new(even_thresholds(4));
    watch.observe("a", "a");
    assert_eq!(watch.check(&host).len(), 1);

    // Ratio 0.5 -> 0.55: no threshold crossed.
    host.scroll_top = 20.0;
    assert!(watch.check(&host).is_empty());

    // Ratio 0.55 -> 0.8: crosses 0.75.
    host.scroll_top = 120.0;
    let batch = watch.check(&host);
    assert_eq!(batch.len(), 1);
    assert!((batch[0].intersection_ratio - 0.8).abs() < 1e-9);
}

#[test]
fn test_leaving_the_viewport_is_reported() {
    let mut host = FakeHost::new(800.0, 3000.0).with_element("a", 0.0, 400.0);
    let mut watch = IntersectionWatch::default();
    watch.observe("a", "a");
    watch.check(&host);

    host.scroll_top = 500.0;
    let batch = watch.check(&host);
    assert_eq!(batch.len(), 1);
    assert!(!batch[0].is_intersecting);

    // Staying out is not news.
    host.scroll_top = 900.0;
    assert!(watch.check(&host).is_empty());
}

#[test]
fn test_observed_through_anchor() {
    let host = FakeHost::new(800.0, 3000.0).with_element("lead-image", 0.0, 300.0);
    let mut watch = IntersectionWatch::default();
    watch.observe("introduction", "lead-image");
    watch.observe("introduction", "somewhere-else");
    assert_eq!(watch.observed().len(), 1);

    let batch = watch.check(&host);
    assert_eq!(batch[0].section_id, "introduction");
}

#[test]
fn test_reset_and_remount_report_again() {
    let mut host = FakeHost::new(800.0, 3000.0).with_element("a", 0.0, 400.0);
    let mut watch = IntersectionWatch::default();
    watch.observe("a", "a");
    watch.check(&host);
    assert!(watch.check(&host).is_empty());

    watch.reset();
    assert_eq!(watch.check(&host).len(), 1);

    // Unmounted and mounted again at the same place: reported as new.
    host.elements.remove("a");
    assert!(watch.check(&host).is_empty());
    host.insert("a", 0.0, 400.0);
    assert_eq!(watch.check(&host).len(), 1);
}

#[test]
fn test_observe_all_keeps_history_of_remaining_targets() {
    let host = FakeHost::new(800.0, 3000.0)
        .with_element("a", 0.0, 400.0)
        .with_element("b", 400.0, 400.0);
    let mut watch = IntersectionWatch::default();
    watch.observe_all(vec![target("a")]);
    watch.check(&host);

    watch.observe_all(vec![target("a"), target("b")]);
    let batch = watch.check(&host);
    let ids: Vec<_> = batch.iter().map(|o| o.section_id.as_str()).collect();
    assert_eq!(ids, vec!["b"]);

    watch.unobserve("a");
    watch.disconnect();
    assert!(watch.observed().is_empty());
    assert!(watch.check(&host).is_empty());
}
