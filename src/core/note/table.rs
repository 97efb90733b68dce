use super::pitch::{NoteNaming, PitchClass};

/// Number of keys on a standard piano
pub const KEY_COUNT: usize = 88;
/// Frequency of the lowest key, A0
pub const A0_FREQ: f32 = 27.5;
/// Octave indices run from 0 (A0..B0) to 8 (C8 only)
pub const OCTAVE_COUNT: u8 = 9;

/// Equal-tempered frequency of the key `n` semitones above A0
pub fn key_frequency(n: usize) -> f32 {
    A0_FREQ * 2.0f32.powf(n as f32 / 12.0)
}

/// Octave of the key `n` semitones above A0.
///
/// Octave numbers change at C rather than at A, so the three lowest keys
/// (A0, A#0, B0) sit in octave 0 and C1 starts octave 1.
pub fn key_octave(n: usize) -> u8 {
    let mut octave = n / 12;
    if n % 12 >= 3 {
        octave += 1;
    }
    octave as u8
}

/// Identifies one physical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteKey {
    pub octave: u8,
    pub pitch: PitchClass,
}

impl NoteKey {
    pub fn new(pitch: PitchClass, octave: u8) -> Self {
        Self { octave, pitch }
    }

    /// Semitones above A0, or `None` for keys outside the 88-key range
    pub fn key_index(&self) -> Option<usize> {
        let pitch = self.pitch.index();
        let octave = self.octave as usize;
        let base = if pitch >= 3 {
            octave.checked_sub(1)?
        } else {
            octave
        };
        let n = base * 12 + pitch;
        (n < KEY_COUNT).then_some(n)
    }

    pub fn label(&self, naming: NoteNaming) -> String {
        format!("{}{}", self.pitch.name(naming), self.octave)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEntry {
    pub key: NoteKey,
    pub index: usize,
    pub frequency: f32,
}

/// Frequencies of all 88 keys, in pitch order
#[derive(Debug, Clone)]
pub struct NoteTable {
    entries: Vec<NoteEntry>,
}

impl NoteTable {
    pub fn build() -> Self {
        let entries = (0..KEY_COUNT)
            .map(|n| NoteEntry {
                key: NoteKey::new(PitchClass::from_key_index(n), key_octave(n)),
                index: n,
                frequency: key_frequency(n),
            })
            .collect();

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: NoteKey) -> Option<&NoteEntry> {
        self.entries.get(key.key_index()?)
    }

    pub fn frequency(&self, key: NoteKey) -> Option<f32> {
        self.get(key).map(|entry| entry.frequency)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NoteEntry> {
        self.entries.iter()
    }

    /// Keys grouped by octave, each group in pitch order
    pub fn octaves(&self) -> impl Iterator<Item = (u8, &[NoteEntry])> {
        (0..OCTAVE_COUNT).map(move |octave| {
            let start = if octave == 0 { 0 } else { octave as usize * 12 - 9 };
            let end = (octave as usize * 12 + 3).min(self.entries.len());
            (octave, &self.entries[start..end])
        })
    }
}

impl Default for NoteTable {
    fn default() -> Self {
        Self::build()
    }
}
