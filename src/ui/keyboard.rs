use crossbeam_channel::Sender;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, TouchDeviceId, TouchId, TouchPhase, Ui, Vec2};
use std::collections::{BTreeMap, HashSet};

use crate::core::note::{NoteKey, NoteNaming, NoteTable, PitchClass};
use crate::messaging::PianoMessage;
use crate::utils::helpers::format_frequency;

const WHITE_KEY_SIZE: Vec2 = Vec2::new(36.0, 160.0);
const BLACK_KEY_SIZE: Vec2 = Vec2::new(26.0, 100.0);
const SOUNDING_COLOR: Color32 = Color32::from_rgb(0, 188, 212);

/// Raw gestures a key can receive, mouse and touch alike
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyGesture {
    PointerDown,
    PointerUp,
    PointerLeave,
    TouchStart,
    TouchEnd,
    TouchMove,
    TouchCancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
}

impl KeyGesture {
    pub fn action(self) -> KeyAction {
        match self {
            KeyGesture::PointerDown | KeyGesture::TouchStart => KeyAction::Press,
            KeyGesture::PointerUp
            | KeyGesture::PointerLeave
            | KeyGesture::TouchEnd
            | KeyGesture::TouchMove
            | KeyGesture::TouchCancel => KeyAction::Release,
        }
    }
}

/// Mouse input for one key during one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerSnapshot {
    pub over_key: bool,
    pub pressed: bool,
    pub released: bool,
    /// Primary button state at the end of the frame
    pub down: bool,
}

/// Work out which mouse gesture, if any, a key saw this frame.
///
/// `held` is whether the keyboard currently considers the key down. A press
/// and release delivered in the same frame yields `PointerDown` now and
/// `PointerUp` on the next frame, since the button is no longer down.
pub fn detect_gesture(held: bool, pointer: PointerSnapshot) -> Option<KeyGesture> {
    if !held {
        return (pointer.pressed && pointer.over_key).then_some(KeyGesture::PointerDown);
    }

    if pointer.released || !pointer.down {
        Some(KeyGesture::PointerUp)
    } else if !pointer.over_key {
        Some(KeyGesture::PointerLeave)
    } else {
        None
    }
}

pub type Finger = (TouchDeviceId, TouchId);

/// Tracks which key each finger is on, so every touch holds its own note
#[derive(Debug, Default)]
pub struct TouchTracker {
    fingers: BTreeMap<Finger, NoteKey>,
}

impl TouchTracker {
    pub fn holds(&self, key: NoteKey) -> bool {
        self.fingers.values().any(|&held| held == key)
    }

    pub fn is_active(&self) -> bool {
        !self.fingers.is_empty()
    }

    pub fn clear(&mut self) {
        self.fingers.clear();
    }

    /// Feed one touch event. `under` is the key beneath the touch, if any.
    pub fn update(&mut self, finger: Finger, phase: TouchPhase, under: Option<NoteKey>) -> Option<(NoteKey, KeyGesture)> {
        match phase {
            TouchPhase::Start => {
                let key = under?;
                self.fingers.insert(finger, key);
                Some((key, KeyGesture::TouchStart))
            },
            TouchPhase::Move => {
                let key = *self.fingers.get(&finger)?;
                if under == Some(key) {
                    return None;
                }
                self.lift(finger, key, KeyGesture::TouchMove)
            },
            TouchPhase::End => {
                let key = *self.fingers.get(&finger)?;
                self.lift(finger, key, KeyGesture::TouchEnd)
            },
            TouchPhase::Cancel => {
                let key = *self.fingers.get(&finger)?;
                self.lift(finger, key, KeyGesture::TouchCancel)
            },
        }
    }

    // Another finger still on the same key keeps it sounding
    fn lift(&mut self, finger: Finger, key: NoteKey, gesture: KeyGesture) -> Option<(NoteKey, KeyGesture)> {
        self.fingers.remove(&finger);
        (!self.holds(key)).then_some((key, gesture))
    }
}

/// Scrollable 88-key keyboard
pub struct Keyboard {
    held: HashSet<NoteKey>,
    touches: TouchTracker,
    scroll_target: Option<NoteKey>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            touches: TouchTracker::default(),
            scroll_target: Some(NoteKey::new(PitchClass::F, 5)),
        }
    }

    pub fn is_held(&self, key: NoteKey) -> bool {
        self.held.contains(&key) || self.touches.holds(key)
    }

    /// Forget every held key, e.g. after the window lost focus
    pub fn clear(&mut self) {
        self.held.clear();
        self.touches.clear();
    }

    /// Record a mouse gesture for `key` and forward it to the voice manager
    pub fn apply_gesture(&mut self, key: NoteKey, gesture: KeyGesture, sender: &Sender<PianoMessage>) {
        match gesture.action() {
            KeyAction::Press => self.held.insert(key),
            KeyAction::Release => self.held.remove(&key),
        };
        sender.send(PianoMessage::Gesture(key, gesture)).ok();
    }

    /// Record a touch event and forward the resulting gesture, if any
    pub fn apply_touch(
        &mut self,
        finger: Finger,
        phase: TouchPhase,
        under: Option<NoteKey>,
        sender: &Sender<PianoMessage>,
    ) {
        if let Some((key, gesture)) = self.touches.update(finger, phase, under) {
            sender.send(PianoMessage::Gesture(key, gesture)).ok();
        }
    }

    fn mouse_held(&self, key: NoteKey) -> bool {
        self.held.contains(&key)
    }

    pub fn show(
        &mut self,
        ui: &mut Ui,
        table: &NoteTable,
        naming: NoteNaming,
        is_sounding: impl Fn(NoteKey) -> bool,
        sender: &Sender<PianoMessage>,
    ) {
        let (pressed, released, down, touches, any_touches) = ui.input(|i| {
            let touches: Vec<(Finger, TouchPhase, Pos2)> = i
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Touch { device_id, id, phase, pos, .. } => {
                        Some(((*device_id, *id), *phase, *pos))
                    },
                    _ => None,
                })
                .collect();
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
                touches,
                i.any_touches(),
            )
        });
        // egui mirrors the first finger as the mouse; fingers are handled per touch id
        let touch_input = any_touches || !touches.is_empty() || self.touches.is_active();

        egui::ScrollArea::horizontal().show(ui, |ui| {
            let mut key_rects: Vec<(NoteKey, Rect)> = Vec::with_capacity(table.len());

            ui.horizontal_top(|ui| {
                ui.spacing_mut().item_spacing.x = 2.0;

                for (_, keys) in table.octaves() {
                    for entry in keys {
                        let key = entry.key;
                        let size = if key.pitch.is_black() { BLACK_KEY_SIZE } else { WHITE_KEY_SIZE };
                        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
                        key_rects.push((key, rect));

                        let pointer = PointerSnapshot {
                            over_key: response.contains_pointer(),
                            pressed: pressed && !touch_input,
                            released,
                            down,
                        };
                        if let Some(gesture) = detect_gesture(self.mouse_held(key), pointer) {
                            self.apply_gesture(key, gesture, sender);
                        }

                        if ui.is_rect_visible(rect) {
                            paint_key(ui, rect, key, naming, is_sounding(key));
                        }

                        if self.scroll_target == Some(key) {
                            response.scroll_to_me(Some(egui::Align::Max));
                            self.scroll_target = None;
                        }

                        response.on_hover_text(format!(
                            "{}: {} (key {})",
                            key.label(naming),
                            format_frequency(entry.frequency),
                            entry.index + 1,
                        ));
                    }
                    ui.add_space(6.0);
                }
            });

            let visible = ui.clip_rect();
            for (finger, phase, pos) in touches {
                let under = visible
                    .contains(pos)
                    .then(|| key_at(&key_rects, pos))
                    .flatten();
                self.apply_touch(finger, phase, under, sender);
            }
        });
    }
}

fn key_at(key_rects: &[(NoteKey, Rect)], pos: Pos2) -> Option<NoteKey> {
    key_rects
        .iter()
        .find(|(_, rect)| rect.contains(pos))
        .map(|(key, _)| *key)
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

fn paint_key(ui: &Ui, rect: Rect, key: NoteKey, naming: NoteNaming, sounding: bool) {
    let painter = ui.painter();
    let black = key.pitch.is_black();

    let (fill, text_color) = match (sounding, black) {
        (true, _) => (SOUNDING_COLOR, Color32::BLACK),
        (false, true) => (Color32::from_gray(20), Color32::WHITE),
        (false, false) => (Color32::from_gray(245), Color32::BLACK),
    };

    painter.rect_filled(rect, 4.0, fill);
    painter.rect_stroke(rect, 4.0, Stroke::new(1.0, Color32::from_gray(90)), egui::StrokeKind::Inside);

    // Name with the octave as a subscript
    let name = key.pitch.name(naming);
    let baseline = Pos2::new(rect.center().x - 3.0, rect.bottom() - 10.0);
    painter.text(baseline, Align2::CENTER_BOTTOM, name, FontId::proportional(13.0), text_color);
    painter.text(
        baseline + Vec2::new(9.0, 4.0),
        Align2::CENTER_BOTTOM,
        key.octave.to_string(),
        FontId::proportional(9.0),
        text_color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    // Mouse over (or off) the key with the button still down
    fn mouse(over_key: bool) -> PointerSnapshot {
        PointerSnapshot { over_key, down: true, ..PointerSnapshot::default() }
    }

    fn finger(id: u64) -> Finger {
        (TouchDeviceId(0), TouchId(id))
    }

    #[test]
    fn test_gesture_actions() {
        assert_eq!(KeyGesture::PointerDown.action(), KeyAction::Press);
        assert_eq!(KeyGesture::TouchStart.action(), KeyAction::Press);
        for gesture in [
            KeyGesture::PointerUp,
            KeyGesture::PointerLeave,
            KeyGesture::TouchEnd,
            KeyGesture::TouchMove,
            KeyGesture::TouchCancel,
        ] {
            assert_eq!(gesture.action(), KeyAction::Release);
        }
    }

    #[test]
    fn test_mouse_gestures() {
        let down = PointerSnapshot { pressed: true, ..mouse(true) };
        assert_eq!(detect_gesture(false, down), Some(KeyGesture::PointerDown));
        // pressing elsewhere does not press this key
        assert_eq!(detect_gesture(false, PointerSnapshot { pressed: true, ..mouse(false) }), None);
        // dragging onto a key without a fresh press does not press it
        assert_eq!(detect_gesture(false, mouse(true)), None);

        assert_eq!(detect_gesture(true, mouse(true)), None);
        assert_eq!(detect_gesture(true, mouse(false)), Some(KeyGesture::PointerLeave));
        let up = PointerSnapshot { released: true, down: false, ..mouse(true) };
        assert_eq!(detect_gesture(true, up), Some(KeyGesture::PointerUp));
    }

    #[test]
    fn test_click_within_one_frame_is_released_next_frame() {
        let tap = PointerSnapshot { over_key: true, pressed: true, released: true, down: false };
        assert_eq!(detect_gesture(false, tap), Some(KeyGesture::PointerDown));

        // Next frame carries no edges, but the button is up
        let idle = PointerSnapshot { over_key: true, ..PointerSnapshot::default() };
        assert_eq!(detect_gesture(true, idle), Some(KeyGesture::PointerUp));
    }

    #[test]
    fn test_missed_release_event_still_releases() {
        let button_up = PointerSnapshot { down: false, ..mouse(false) };
        assert_eq!(detect_gesture(true, button_up), Some(KeyGesture::PointerUp));
    }

    #[test]
    fn test_leave_without_release_sends_release() {
        let (sender, receiver) = unbounded();
        let mut keyboard = Keyboard::new();
        let a0 = NoteKey::new(PitchClass::A, 0);

        keyboard.apply_gesture(a0, KeyGesture::PointerDown, &sender);
        assert!(keyboard.is_held(a0));

        let gesture = detect_gesture(keyboard.is_held(a0), mouse(false)).unwrap();
        keyboard.apply_gesture(a0, gesture, &sender);
        assert!(!keyboard.is_held(a0));

        let sent: Vec<_> = receiver.try_iter().collect();
        assert_eq!(sent, vec![
            PianoMessage::Gesture(a0, KeyGesture::PointerDown),
            PianoMessage::Gesture(a0, KeyGesture::PointerLeave),
        ]);
    }

    #[test]
    fn test_touch_phases() {
        let mut touches = TouchTracker::default();
        let c4 = NoteKey::new(PitchClass::C, 4);
        let d4 = NoteKey::new(PitchClass::D, 4);

        // starting off the keyboard tracks nothing
        assert_eq!(touches.update(finger(1), TouchPhase::Start, None), None);
        assert!(!touches.is_active());

        assert_eq!(touches.update(finger(1), TouchPhase::Start, Some(c4)), Some((c4, KeyGesture::TouchStart)));
        assert_eq!(touches.update(finger(1), TouchPhase::Move, Some(c4)), None);
        assert_eq!(touches.update(finger(1), TouchPhase::Move, Some(d4)), Some((c4, KeyGesture::TouchMove)));
        // sliding onto a key does not press it
        assert_eq!(touches.update(finger(1), TouchPhase::End, Some(d4)), None);

        touches.update(finger(2), TouchPhase::Start, Some(d4));
        assert_eq!(touches.update(finger(2), TouchPhase::Cancel, None), Some((d4, KeyGesture::TouchCancel)));
        assert!(!touches.is_active());
    }

    #[test]
    fn test_two_fingers_hold_a_chord() {
        let (sender, receiver) = unbounded();
        let mut keyboard = Keyboard::new();
        let c4 = NoteKey::new(PitchClass::C, 4);
        let e4 = NoteKey::new(PitchClass::E, 4);

        keyboard.apply_touch(finger(1), TouchPhase::Start, Some(c4), &sender);
        keyboard.apply_touch(finger(2), TouchPhase::Start, Some(e4), &sender);
        assert!(keyboard.is_held(c4));
        assert!(keyboard.is_held(e4));

        keyboard.apply_touch(finger(1), TouchPhase::End, Some(c4), &sender);
        assert!(!keyboard.is_held(c4));
        assert!(keyboard.is_held(e4));

        keyboard.apply_touch(finger(2), TouchPhase::End, Some(e4), &sender);

        let sent: Vec<_> = receiver.try_iter().collect();
        assert_eq!(sent, vec![
            PianoMessage::Gesture(c4, KeyGesture::TouchStart),
            PianoMessage::Gesture(e4, KeyGesture::TouchStart),
            PianoMessage::Gesture(c4, KeyGesture::TouchEnd),
            PianoMessage::Gesture(e4, KeyGesture::TouchEnd),
        ]);
    }

    #[test]
    fn test_tap_within_one_frame_releases() {
        let (sender, receiver) = unbounded();
        let mut keyboard = Keyboard::new();
        let a4 = NoteKey::new(PitchClass::A, 4);

        keyboard.apply_touch(finger(7), TouchPhase::Start, Some(a4), &sender);
        keyboard.apply_touch(finger(7), TouchPhase::End, Some(a4), &sender);

        assert!(!keyboard.is_held(a4));
        assert_eq!(receiver.try_iter().count(), 2);
    }

    #[test]
    fn test_second_finger_keeps_key_down() {
        let mut touches = TouchTracker::default();
        let g4 = NoteKey::new(PitchClass::G, 4);

        touches.update(finger(1), TouchPhase::Start, Some(g4));
        touches.update(finger(2), TouchPhase::Start, Some(g4));
        assert_eq!(touches.update(finger(1), TouchPhase::End, Some(g4)), None);
        assert!(touches.holds(g4));
        assert_eq!(touches.update(finger(2), TouchPhase::End, Some(g4)), Some((g4, KeyGesture::TouchEnd)));
    }

    #[test]
    fn test_key_at_position() {
        let c4 = NoteKey::new(PitchClass::C, 4);
        let cs4 = NoteKey::new(PitchClass::CSharp, 4);
        let rects = [
            (c4, Rect::from_min_size(Pos2::new(0.0, 0.0), WHITE_KEY_SIZE)),
            (cs4, Rect::from_min_size(Pos2::new(38.0, 0.0), BLACK_KEY_SIZE)),
        ];
        assert_eq!(key_at(&rects, Pos2::new(10.0, 50.0)), Some(c4));
        assert_eq!(key_at(&rects, Pos2::new(40.0, 50.0)), Some(cs4));
        assert_eq!(key_at(&rects, Pos2::new(40.0, 150.0)), None);
    }
}
