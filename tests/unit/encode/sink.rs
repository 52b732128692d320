use super::*;

#[test]
fn in_memory_sink_records_config_and_frames() {
    let mut sink = InMemorySink::new();
    let cfg = SinkConfig {
        width: 2,
        height: 1,
        fps: Fps::new(25).unwrap(),
    };
    sink.begin(cfg.clone()).unwrap();
    sink.push_frame(FrameIndex(0), &RgbaImage::new(2, 1)).unwrap();
    sink.push_frame(FrameIndex(1), &RgbaImage::new(2, 1)).unwrap();
    assert!(!sink.is_finished());
    sink.end().unwrap();

    assert!(sink.is_finished());
    assert_eq!(sink.config(), Some(cfg.clone()));
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1]);

    sink.begin(cfg).unwrap();
    assert!(sink.frames().is_empty());
}
