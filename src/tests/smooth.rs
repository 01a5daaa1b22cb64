use super::SmoothScroll;

#[test]
fn test_settles_exactly_on_target() {
    let mut scroll = SmoothScroll::new(0.3);
    scroll.set_target(480.0);
    let mut frames = 0;
    while scroll.tick() {
        frames += 1;
        assert!(frames < 100, "animation never settled");
    }
    assert!((scroll.value() - 480.0).abs() < f64::EPSILON);
    assert!(!scroll.is_animating());
}

#[test]
fn test_eases_out() {
    let mut scroll = SmoothScroll::new(0.5);
    scroll.set_target(100.0);
    scroll.tick();
    let first = scroll.value();
    scroll.tick();
    let second = scroll.value() - first;
    assert!(first > second, "later frames should move less");
}

#[test]
fn test_jump_cancels_animation() {
    let mut scroll = SmoothScroll::new(0.3);
    scroll.set_target(300.0);
    scroll.tick();
    scroll.jump_to(40.0);
    assert!(!scroll.is_animating());
    assert!(!scroll.tick());
    assert!((scroll.value() - 40.0).abs() < f64::EPSILON);
}

#[test]
fn test_speed_is_clamped() {
    let mut scroll = SmoothScroll::new(5.0);
    scroll.set_target(200.0);
    scroll.tick();
    assert!((scroll.value() - 200.0).abs() < f64::EPSILON);
}
