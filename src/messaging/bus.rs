use crossbeam_channel::{unbounded, Receiver, Sender};
use log::warn;

use super::PianoMessage;
use crate::core::audio::AudioOutput;
use crate::core::note::NoteTable;
use crate::core::ToneVoiceManager;
use crate::ui::keyboard::KeyAction;

/// MessageBus carries UI events to the tone voice manager.
///
/// Widgets post messages while the frame is being built; the app drains them
/// on the same thread once the frame is done.
pub struct MessageBus {
    sender: Sender<PianoMessage>,
    receiver: Receiver<PianoMessage>,
}

impl MessageBus {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        MessageBus { sender, receiver }
    }

    /// Get a sender that can be cloned and passed to UI components
    pub fn sender(&self) -> Sender<PianoMessage> {
        self.sender.clone()
    }

    pub fn send(&self, msg: PianoMessage) {
        // The bus owns its receiver, so sending cannot fail while it is alive
        self.sender.send(msg).ok();
    }

    pub fn try_receive(&self) -> Option<PianoMessage> {
        self.receiver.try_recv().ok()
    }

    /// Handle every pending message, returning how many were handled
    pub fn process_messages<O: AudioOutput>(
        &self,
        manager: &mut ToneVoiceManager<O>,
        table: &NoteTable,
    ) -> usize {
        let mut count = 0;
        while let Some(msg) = self.try_receive() {
            handle_message(manager, table, msg);
            count += 1;
        }
        count
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

pub fn handle_message<O: AudioOutput>(
    manager: &mut ToneVoiceManager<O>,
    table: &NoteTable,
    msg: PianoMessage,
) {
    match msg {
        PianoMessage::Gesture(key, gesture) => {
            let Some(entry) = table.get(key) else {
                debug_assert!(false, "keyboard sent a key outside the note table: {:?}", key);
                warn!("Ignoring {:?} for unknown key {:?}", gesture, key);
                return;
            };
            match gesture.action() {
                KeyAction::Press => manager.press(entry.key, entry.frequency),
                KeyAction::Release => manager.release(entry.key),
            }
        },
        PianoMessage::SetVolume(level) => manager.set_volume(level),
        PianoMessage::SelectWaveform(waveform) => manager.set_waveform(waveform),
        PianoMessage::ReleaseAll => manager.release_all(),
    }
}
