use serde::{Serialize, Deserialize};
use std::fmt;

/// Script used for note labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameScript {
    #[default]
    Latin,
    Japanese,
}

/// How accidentals are spelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spelling {
    #[default]
    Sharp,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteNaming {
    pub script: NameScript,
    pub spelling: Spelling,
}

/// The twelve pitch classes, in key order starting from A (the lowest piano key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchClass {
    A,
    ASharp,
    B,
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
}

// (latin sharp, latin flat, japanese sharp, japanese flat); empty flat = natural
const NAMES: [[&str; 4]; 12] = [
    ["A", "", "ラ", ""],
    ["A#", "B♭", "ラ#", "シ♭"],
    ["B", "", "シ", ""],
    ["C", "", "ド", ""],
    ["C#", "D♭", "ド#", "レ♭"],
    ["D", "", "レ", ""],
    ["D#", "E♭", "レ#", "ミ♭"],
    ["E", "", "ミ", ""],
    ["F", "", "ファ", ""],
    ["F#", "G♭", "ファ#", "ソ♭"],
    ["G", "", "ソ", ""],
    ["G#", "A♭", "ソ#", "ラ♭"],
];

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
    ];

    /// Pitch class of the key `n` semitones above A0
    pub fn from_key_index(n: usize) -> Self {
        Self::ALL[n % 12]
    }

    /// Position within the A-first cycle (A = 0, G# = 11)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Accidentals are the black keys
    pub fn is_black(self) -> bool {
        !NAMES[self.index()][1].is_empty()
    }

    pub fn name(self, naming: NoteNaming) -> &'static str {
        let names = &NAMES[self.index()];
        let script = match naming.script {
            NameScript::Latin => 0,
            NameScript::Japanese => 2,
        };
        match naming.spelling {
            Spelling::Flat if self.is_black() => names[script + 1],
            _ => names[script],
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name(NoteNaming::default()))
    }
}
