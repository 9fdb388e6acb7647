use super::*;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps { num: 30, den: 1 },
    }
}

#[test]
fn in_memory_sink_keeps_ordered_frames() {
    let mut sink = InMemorySink::new();
    assert!(sink.config().is_none());
    sink.begin(cfg(2, 2)).unwrap();
    for i in [0, 1, 4] {
        sink.push_frame(FrameIndex(i), &FrameRGBA::transparent(2, 2))
            .unwrap();
    }
    sink.end().unwrap();
    assert!(sink.is_ended());
    assert_eq!(sink.config(), Some(cfg(2, 2)));
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 4]);
}

#[test]
fn out_of_order_and_repeated_frames_are_rejected() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(1, 1)).unwrap();
    let f = FrameRGBA::transparent(1, 1);
    sink.push_frame(FrameIndex(3), &f).unwrap();
    assert!(matches!(
        sink.push_frame(FrameIndex(3), &f),
        Err(GlitchwaveError::Encode(_))
    ));
    assert!(sink.push_frame(FrameIndex(2), &f).is_err());
    assert_eq!(sink.frames().len(), 1);

    // A new range starts over.
    sink.begin(cfg(1, 1)).unwrap();
    sink.push_frame(FrameIndex(0), &f).unwrap();
    assert_eq!(sink.into_frames().len(), 1);
}

#[test]
fn frames_must_match_configured_size() {
    let mut sink = InMemorySink::new();
    assert!(
        sink.push_frame(FrameIndex(0), &FrameRGBA::transparent(1, 1))
            .is_err()
    );
    sink.begin(cfg(4, 4)).unwrap();
    assert!(matches!(
        sink.push_frame(FrameIndex(0), &FrameRGBA::transparent(2, 2)),
        Err(GlitchwaveError::Validation(_))
    ));
    let mut short = FrameRGBA::transparent(4, 4);
    short.data.truncate(8);
    assert!(sink.push_frame(FrameIndex(0), &short).is_err());
}
