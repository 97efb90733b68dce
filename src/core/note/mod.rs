mod pitch;
mod table;

pub use self::pitch::{NameScript, NoteNaming, PitchClass, Spelling};
pub use self::table::{key_frequency, key_octave, NoteEntry, NoteKey, NoteTable, KEY_COUNT};
