use std::io::Cursor;

use super::*;
use crate::assets::source::MemoryFrameSource;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn sequence(count: u32) -> SequenceConfig {
    SequenceConfig {
        base: "seq".into(),
        prefix: "frame_".to_string(),
        extension: ".png".to_string(),
        frame_count: count,
    }
}

#[test]
fn placeholder_is_never_drawable() {
    let p = Frame::placeholder();
    assert!(p.is_placeholder());
    assert!(!p.is_drawable());
    assert_eq!((p.width(), p.height()), (0, 0));
    assert!(p.pixels().is_empty());
}

#[test]
fn inconsistent_payloads_are_rejected() {
    assert!(Frame::from_premul_rgba8(2, 2, &[0; 12]).is_err());
    assert!(Frame::from_premul_rgba8(0, 2, &[]).is_err());
    assert!(Frame::from_premul_rgba8(70_000, 1, &vec![0; 70_000 * 4]).is_err());

    let f = Frame::from_premul_rgba8(2, 1, &[1, 2, 3, 255, 4, 5, 6, 255]).unwrap();
    assert!(f.is_drawable());
    assert_eq!(f.pixels(), &[1, 2, 3, 255, 4, 5, 6, 255]);
}

#[test]
fn percent_rounds_settled_share() {
    let mut p = LoadProgress::new(81);
    assert_eq!(p.percent(), 0);
    p.settled = 1;
    assert_eq!(p.percent(), 1);
    p.settled = 40;
    assert_eq!(p.percent(), 49);
    p.settled = 81;
    assert_eq!(p.percent(), 100);
    assert!(p.is_complete());
}

#[test]
fn load_with_partial_failures_settles_every_index() {
    let cfg = sequence(5);
    let mut source = MemoryFrameSource::new();
    for i in [0u32, 2, 4] {
        source.insert(
            cfg.frame_path(FrameIndex(i)),
            png_bytes(4, 3, [i as u8, 0, 0, 255]),
        );
    }

    let mut seen = Vec::new();
    let store = FrameStore::load(&cfg, Arc::new(source), Some(2), |p| seen.push(p)).unwrap();

    assert_eq!(seen.len(), 5);
    assert!(seen.windows(2).all(|w| w[0].percent() <= w[1].percent()));
    assert_eq!(seen.last().unwrap().percent(), 100);
    assert_eq!(seen.iter().filter(|p| p.is_complete()).count(), 1);

    assert_eq!(store.len(), 5);
    assert_eq!(store.loaded_count(), 3);
    assert_eq!(store.failed_count(), 2);
    assert_eq!(store.progress().percent(), 100);
    assert_eq!(store.failed_indices(), vec![FrameIndex(1), FrameIndex(3)]);
    for i in [1u32, 3] {
        let f = store.get(FrameIndex(i)).unwrap();
        assert_eq!((f.width(), f.height()), (0, 0));
    }
    for i in [0u32, 2, 4] {
        let f = store.get(FrameIndex(i)).unwrap();
        assert!(f.is_drawable());
        assert_eq!(f.pixels()[0], i as u8);
    }
}

#[test]
fn undecodable_bytes_become_placeholders() {
    let cfg = sequence(2);
    let mut source = MemoryFrameSource::new();
    source.insert(cfg.frame_path(FrameIndex(0)), png_bytes(1, 1, [1, 2, 3, 255]));
    source.insert(cfg.frame_path(FrameIndex(1)), b"not a png".to_vec());

    let store = FrameStore::load(&cfg, Arc::new(source), None, |_| {}).unwrap();
    assert!(store.get(FrameIndex(0)).unwrap().is_drawable());
    assert!(store.get(FrameIndex(1)).unwrap().is_placeholder());
    assert!(store.get(FrameIndex(2)).is_none());
}

#[test]
fn zero_frames_is_rejected_up_front() {
    let err = FrameStore::load(&sequence(0), Arc::new(MemoryFrameSource::new()), None, |_| {})
        .unwrap_err();
    assert!(matches!(err, crate::PlayerError::Validation(_)));
}
