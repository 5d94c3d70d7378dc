use std::{
    io::Cursor,
    path::Path,
    sync::{Condvar, Mutex},
};

use super::*;
use crate::{PlayerError, assets::source::MemoryFrameSource, config::SequenceConfig};

fn color_for(i: u32) -> [u8; 4] {
    [(i * 3) as u8, 255 - (i * 3) as u8, 17, 255]
}

fn png_bytes(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(4, 3, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn config(count: u32) -> PlayerConfig {
    PlayerConfig {
        sequence: SequenceConfig {
            base: "mem".into(),
            prefix: "frame_".to_string(),
            extension: ".png".to_string(),
            frame_count: count,
        },
        preload_threads: Some(2),
        ..PlayerConfig::default()
    }
}

fn source(cfg: &PlayerConfig, missing: &[u32]) -> MemoryFrameSource {
    let mut src = MemoryFrameSource::new();
    for i in 0..cfg.sequence.frame_count {
        if !missing.contains(&i) {
            src.insert(
                cfg.sequence.frame_path(FrameIndex(i)),
                png_bytes(color_for(i)),
            );
        }
    }
    src
}

fn center_pixel(c: &PlayerController) -> [u8; 4] {
    let rgba = c.canvas().to_rgba();
    rgba.pixel(rgba.width / 2, rgba.height / 2).unwrap()
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= 1)
}

struct Gate {
    open: Mutex<bool>,
    cv: Condvar,
    inner: MemoryFrameSource,
}

impl FrameSource for Gate {
    fn fetch(&self, index: FrameIndex, path: &Path) -> PlayerResult<Vec<u8>> {
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.cv.wait(open).unwrap();
        }
        drop(open);
        self.inner.fetch(index, path)
    }
}

#[test]
fn stays_loading_and_ignores_scroll_until_frames_settle() {
    let cfg = config(5);
    let gate = Arc::new(Gate {
        open: Mutex::new(false),
        cv: Condvar::new(),
        inner: source(&cfg, &[]),
    });
    let mut viewport = Signal::new(Viewport::new(40, 30));
    let mut scroll = ScrollProgress::default();

    let mut player = PlayerController::mount(&cfg, gate.clone(), &mut viewport).unwrap();
    scroll.jump_to(0.8);
    viewport.set(Viewport::new(80, 60));

    assert_eq!(player.pump(&mut scroll).unwrap(), PlayerState::Loading);
    assert!(player.is_loading());
    assert_eq!(player.load_progress().percent(), 0);
    assert_eq!(player.current_frame(), None);
    assert_eq!(player.canvas().viewport(), Viewport::new(80, 60));
    assert_eq!(player.stats().renders_drawn, 0);

    *gate.open.lock().unwrap() = true;
    gate.cv.notify_all();

    let mut percents = Vec::new();
    player
        .wait_ready(&mut scroll, |p| percents.push(p.percent()))
        .unwrap();
    assert_eq!(player.state(), PlayerState::Ready);
    assert_eq!(percents.last().copied(), Some(100));
    assert_eq!(player.load_progress().percent(), 100);
    // already-scrolled position is drawn on entry
    assert_eq!(player.current_frame(), Some(FrameIndex(3)));
    assert!(close(center_pixel(&player), color_for(3)));
}

#[test]
fn pump_transitions_to_ready_exactly_once() {
    let cfg = config(6);
    let mut viewport = Signal::new(Viewport::new(40, 30));
    let mut scroll = ScrollProgress::default();
    let mut player =
        PlayerController::mount(&cfg, Arc::new(source(&cfg, &[])), &mut viewport).unwrap();

    let started = std::time::Instant::now();
    while player.pump(&mut scroll).unwrap() == PlayerState::Loading {
        assert!(started.elapsed() < std::time::Duration::from_secs(30));
        std::thread::yield_now();
    }
    assert_eq!(player.stats().renders_drawn, 1);
    assert_eq!(scroll.smoothed_subscriber_count(), 1);

    player.pump(&mut scroll).unwrap();
    assert_eq!(player.stats().renders_drawn, 1);
    assert_eq!(scroll.smoothed_subscriber_count(), 1);
    assert_eq!(player.current_frame(), Some(FrameIndex(0)));
}

#[test]
fn resize_rerenders_current_frame_at_new_size() {
    let cfg = config(81);
    let mut viewport = Signal::new(Viewport::new(800, 600));
    let mut scroll = ScrollProgress::default();
    let mut player =
        PlayerController::mount(&cfg, Arc::new(source(&cfg, &[])), &mut viewport).unwrap();
    player.wait_ready(&mut scroll, |_| {}).unwrap();

    scroll.jump_to(0.5);
    player.pump(&mut scroll).unwrap();
    assert_eq!(player.current_frame(), Some(FrameIndex(40)));
    assert!(close(center_pixel(&player), color_for(40)));
    let drawn_before = player.stats().renders_drawn;

    viewport.set(Viewport::new(1200, 800));
    player.pump(&mut scroll).unwrap();

    assert_eq!(player.canvas().viewport(), Viewport::new(1200, 800));
    assert_eq!(player.canvas().pixels().len(), 1200 * 800 * 4);
    assert_eq!(player.current_frame(), Some(FrameIndex(40)));
    assert_eq!(player.stats().resizes, 1);
    assert_eq!(player.stats().renders_drawn, drawn_before + 1);
    assert!(close(center_pixel(&player), color_for(40)));
}

#[test]
fn smoothed_scroll_walks_frames_forward() {
    let cfg = config(11);
    let mut viewport = Signal::new(Viewport::new(40, 30));
    let mut scroll = ScrollProgress::default();
    let mut player =
        PlayerController::mount(&cfg, Arc::new(source(&cfg, &[])), &mut viewport).unwrap();
    player.wait_ready(&mut scroll, |_| {}).unwrap();

    scroll.set_raw(1.0);
    let mut seen = Vec::new();
    for _ in 0..600 {
        scroll.tick(1.0 / 60.0);
        player.pump(&mut scroll).unwrap();
        seen.push(player.current_frame().unwrap().0);
        if scroll.is_settled() {
            break;
        }
    }

    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(seen.last().copied(), Some(10));
    assert!(close(center_pixel(&player), color_for(10)));
}

#[test]
fn missing_frame_keeps_previous_pixels() {
    let cfg = config(81);
    let mut viewport = Signal::new(Viewport::new(40, 30));
    let mut scroll = ScrollProgress::default();
    let mut player =
        PlayerController::mount(&cfg, Arc::new(source(&cfg, &[40])), &mut viewport).unwrap();
    player.wait_ready(&mut scroll, |_| {}).unwrap();
    assert_eq!(player.store().unwrap().failed_indices(), vec![FrameIndex(40)]);

    scroll.jump_to(0.25);
    player.pump(&mut scroll).unwrap();
    assert_eq!(player.current_frame(), Some(FrameIndex(20)));
    let shown = player.canvas().pixels().to_vec();

    scroll.jump_to(0.5);
    player.pump(&mut scroll).unwrap();
    assert_eq!(player.current_frame(), Some(FrameIndex(40)));
    assert_eq!(player.canvas().pixels(), shown.as_slice());
    assert_eq!(player.stats().renders_skipped, 1);
}

#[test]
fn unmount_detaches_all_subscriptions() {
    let cfg = config(3);
    let mut viewport = Signal::new(Viewport::new(10, 10));
    let mut scroll = ScrollProgress::default();
    let mut player =
        PlayerController::mount(&cfg, Arc::new(source(&cfg, &[])), &mut viewport).unwrap();
    player.wait_ready(&mut scroll, |_| {}).unwrap();
    assert_eq!(viewport.subscriber_count(), 1);
    assert_eq!(scroll.smoothed_subscriber_count(), 1);

    player.unmount(&mut scroll, &mut viewport);
    assert_eq!(viewport.subscriber_count(), 0);
    assert_eq!(scroll.smoothed_subscriber_count(), 0);
}

#[test]
fn mount_rejects_invalid_config() {
    let mut cfg = config(0);
    let mut viewport = Signal::new(Viewport::new(10, 10));
    let err = PlayerController::mount(&cfg, Arc::new(MemoryFrameSource::new()), &mut viewport)
        .unwrap_err();
    assert!(matches!(err, PlayerError::Validation(_)));

    cfg.sequence.frame_count = 1;
    let mut huge = Signal::new(Viewport::new(70_000, 10));
    let err = PlayerController::mount(&cfg, Arc::new(MemoryFrameSource::new()), &mut huge)
        .unwrap_err();
    assert!(matches!(err, PlayerError::Render(_)));
}
