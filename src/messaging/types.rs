use crate::core::note::NoteKey;
use crate::core::oscillator::Waveform;
use crate::ui::keyboard::KeyGesture;

/// Messages from the UI to the tone voice manager
#[derive(Debug, Clone, PartialEq)]
pub enum PianoMessage {
    Gesture(NoteKey, KeyGesture),
    SetVolume(f32),
    SelectWaveform(Waveform),
    ReleaseAll,
}
