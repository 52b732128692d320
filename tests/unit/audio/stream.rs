use std::path::PathBuf;

use super::*;

fn fixture_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_audio_stream").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_i16_wav(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn sample_block_rejects_ragged_frames() {
    assert!(SampleBlock::new(2, vec![0.0, 1.0, 2.0]).is_err());
    assert!(SampleBlock::new(0, vec![]).is_err());

    let b = SampleBlock::new(2, vec![0.1, -0.2, 0.3, -0.4]).unwrap();
    assert_eq!(b.len_frames(), 2);
    assert_eq!(b.frame(1), &[0.3, -0.4]);
    assert_eq!(b.amplitude(0, 1), -0.2);
    assert_eq!(b.frames().count(), 2);
}

#[test]
fn memory_stream_reads_in_blocks_and_ends_empty() {
    let mut s = MemoryStream::new(8, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    assert_eq!(s.spec().total_frames, 3);

    let a = s.read_block(2).unwrap();
    assert_eq!(a.len_frames(), 2);
    let b = s.read_block(2).unwrap();
    assert_eq!(b.len_frames(), 1);
    assert_eq!(b.frame(0), &[5.0, 6.0]);
    assert!(s.read_block(2).unwrap().is_empty());
}

#[test]
fn memory_stream_rejects_partial_frame() {
    assert!(MemoryStream::new(8, 2, vec![1.0, 2.0, 3.0]).is_err());
}

#[test]
fn wav_stream_normalises_int_pcm_and_keeps_channels() {
    let dir = fixture_dir("stereo_i16");
    let path = dir.join("tone.wav");
    write_i16_wav(&path, 8_000, 2, &[16_384, -16_384, -32_768, 0, 0, 8_192]);

    let mut s = WavStream::open(&path).unwrap();
    assert_eq!(
        s.spec(),
        StreamSpec {
            sample_rate: 8_000,
            channels: 2,
            total_frames: 3,
        }
    );

    let block = s.read_block(1024).unwrap();
    assert_eq!(block.len_frames(), 3);
    assert!((block.amplitude(0, 0) - 0.5).abs() < 1e-6);
    assert!((block.amplitude(0, 1) + 0.5).abs() < 1e-6);
    assert!((block.amplitude(1, 0) + 1.0).abs() < 1e-6);
    assert!((block.amplitude(2, 1) - 0.25).abs() < 1e-6);
    assert!(s.read_block(1024).unwrap().is_empty());
}

#[test]
fn wav_stream_reads_float_pcm() {
    let dir = fixture_dir("mono_f32");
    let path = dir.join("float.wav");
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 100,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for v in [0.25f32, -0.75, 1.0] {
        writer.write_sample(v).unwrap();
    }
    writer.finalize().unwrap();

    let mut s = WavStream::open(&path).unwrap();
    let first = s.read_block(2).unwrap();
    assert_eq!(first.frame(0), &[0.25]);
    assert_eq!(first.frame(1), &[-0.75]);
    let rest = s.read_block(2).unwrap();
    assert_eq!(rest.len_frames(), 1);
}

#[test]
fn wav_stream_missing_file_is_decode_error_naming_path() {
    let err = WavStream::open("target/definitely/not/here.wav").unwrap_err();
    assert!(matches!(err, ZvisError::Decode(_)));
    assert!(err.to_string().contains("not/here.wav"));
}

#[test]
fn wav_stream_garbage_file_is_decode_error() {
    let dir = fixture_dir("garbage");
    let path = dir.join("noise.wav");
    std::fs::write(&path, b"this is not a riff file").unwrap();
    assert!(matches!(WavStream::open(&path), Err(ZvisError::Decode(_))));
}
