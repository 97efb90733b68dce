use anyhow::{Context, Result};
use eframe::egui;
use log::info;

use crate::config::{clamp_volume, PianoConfig};
use crate::core::audio::CpalOutput;
use crate::core::note::{NoteNaming, NoteTable};
use crate::core::ToneVoiceManager;
use crate::messaging::{MessageBus, PianoMessage};
use crate::ui::panels::ControlPanel;
use crate::ui::Keyboard;

// Main app state
pub struct PianoApp {
    manager: ToneVoiceManager<CpalOutput>,
    table: NoteTable,
    message_bus: MessageBus,
    keyboard: Keyboard,
    controls: ControlPanel,
    naming: NoteNaming,
}

impl PianoApp {
    pub fn new(config: PianoConfig) -> Result<Self> {
        let output = CpalOutput::open(clamp_volume(config.volume))
            .context("No audio output available")?;
        let manager = ToneVoiceManager::new(output, &config)?;
        let table = NoteTable::build();
        info!("Built note table with {} keys", table.len());

        Ok(Self {
            manager,
            table,
            message_bus: MessageBus::new(),
            keyboard: Keyboard::new(),
            controls: ControlPanel::new(&config),
            naming: config.note_names,
        })
    }
}

impl eframe::App for PianoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // A key held while the window loses focus would never see its release
        let focus_lost = ctx.input(|i| {
            i.events.iter().any(|event| matches!(event, egui::Event::WindowFocused(false)))
        });
        if focus_lost {
            self.keyboard.clear();
            self.message_bus.send(PianoMessage::ReleaseAll);
        }

        let sender = self.message_bus.sender();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.heading("Virtual Piano");
            let preview = self.manager.shape_for(self.controls.waveform);
            self.controls.show(ui, &preview, &sender);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let manager = &self.manager;
            self.keyboard.show(ui, &self.table, self.naming, |key| manager.is_sounding(key), &sender);
        });

        if self.message_bus.process_messages(&mut self.manager, &self.table) > 0 {
            ctx.request_repaint();
        }
    }
}
