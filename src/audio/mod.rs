pub mod envelope;
pub mod spectrogram;
pub mod stream;
