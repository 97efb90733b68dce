pub mod audio;
pub mod note;
pub mod oscillator;
pub mod voice;

pub use voice::ToneVoiceManager;
