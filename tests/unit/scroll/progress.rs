use super::*;

#[test]
fn set_scroll_normalizes_offset() {
    let mut s = ScrollProgress::default();
    s.set_scroll(500.0, 2000.0, 1000.0);
    assert_eq!(s.raw(), 0.5);

    s.set_scroll(5000.0, 2000.0, 1000.0);
    assert_eq!(s.raw(), 1.0);

    s.set_scroll(-20.0, 2000.0, 1000.0);
    assert_eq!(s.raw(), 0.0);
}

#[test]
fn unscrollable_document_reports_zero() {
    let mut s = ScrollProgress::default();
    s.set_raw(0.7);
    s.set_scroll(100.0, 800.0, 800.0);
    assert_eq!(s.raw(), 0.0);
}

#[test]
fn smoothed_lags_raw_then_catches_up() {
    let mut s = ScrollProgress::default();
    let sub = s.subscribe_smoothed();
    s.set_raw(1.0);

    let first = s.tick(1.0 / 60.0);
    assert!(first > 0.0 && first < 1.0);

    for _ in 0..600 {
        s.tick(1.0 / 60.0);
    }
    assert!(s.is_settled());
    assert_eq!(s.smoothed(), 1.0);

    let seen: Vec<f64> = sub.drain().collect();
    assert_eq!(seen.first().copied(), Some(first));
    assert_eq!(seen.last().copied(), Some(1.0));
    assert!(seen.windows(2).all(|w| w[0] != w[1]));
}

#[test]
fn jump_to_publishes_once_on_both_variants() {
    let mut s = ScrollProgress::default();
    let raw = s.subscribe_raw();
    let smoothed = s.subscribe_smoothed();
    s.jump_to(0.5);
    assert_eq!(raw.drain().collect::<Vec<_>>(), vec![0.5]);
    assert_eq!(smoothed.drain().collect::<Vec<_>>(), vec![0.5]);
    assert!(s.is_settled());
    assert_eq!(s.tick(1.0 / 60.0), 0.5);
    assert_eq!(smoothed.try_next(), None);
}

#[test]
fn unsubscribe_smoothed_detaches() {
    let mut s = ScrollProgress::default();
    let sub = s.subscribe_smoothed();
    assert_eq!(s.smoothed_subscriber_count(), 1);
    assert!(s.unsubscribe_smoothed(sub));
    assert_eq!(s.smoothed_subscriber_count(), 0);
}
