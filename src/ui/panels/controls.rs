use crossbeam_channel::Sender;
use egui::Ui;

use crate::config::{PianoConfig, MAX_VOLUME, MIN_VOLUME};
use crate::core::oscillator::{OscillatorShape, Waveform};
use crate::messaging::PianoMessage;
use crate::ui::components::WaveformPlot;
use crate::utils::audio_visualizer::generate_waveform_preview;

const PREVIEW_POINTS: usize = 200;

/// Waveform selector, volume slider and a preview of the selected shape
pub struct ControlPanel {
    pub volume: f32,
    pub waveform: Waveform,
}

impl ControlPanel {
    pub fn new(config: &PianoConfig) -> Self {
        Self {
            volume: config.volume,
            waveform: config.waveform,
        }
    }

    pub fn show(&mut self, ui: &mut Ui, preview: &OscillatorShape, sender: &Sender<PianoMessage>) {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                let previous = self.waveform;
                egui::ComboBox::from_label("Waveform")
                    .selected_text(self.waveform.label())
                    .show_ui(ui, |ui| {
                        for waveform in Waveform::ALL {
                            ui.selectable_value(&mut self.waveform, waveform, waveform.label());
                        }
                    });
                if self.waveform != previous {
                    sender.send(PianoMessage::SelectWaveform(self.waveform)).ok();
                }

                let slider = egui::Slider::new(&mut self.volume, MIN_VOLUME..=MAX_VOLUME)
                    .text("Volume")
                    .step_by(0.01);
                if ui.add(slider).changed() {
                    sender.send(PianoMessage::SetVolume(self.volume)).ok();
                }
            });

            ui.add_space(20.0);

            ui.vertical(|ui| {
                ui.set_max_width(240.0);
                WaveformPlot::new(generate_waveform_preview(preview, PREVIEW_POINTS))
                    .height(80.0)
                    .show(ui, "waveform_preview");
            });
        });
    }
}
