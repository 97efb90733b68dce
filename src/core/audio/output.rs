use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat, Stream};
use crossbeam_channel::{unbounded, Sender};
use log::{info, warn};

use super::{AudioOutput, Mixer, MixerCommand, OscillatorId};
use crate::core::oscillator::OscillatorShape;

/// Default output device, driven by a [`Mixer`] running in the cpal callback
pub struct CpalOutput {
    commands: Sender<MixerCommand>,
    gain: f32,
    next_id: u64,
    _stream: Stream,
}

impl CpalOutput {
    /// Open the default output device and start the stream.
    ///
    /// Fails when the platform offers no output device or refuses to build
    /// a stream for it.
    pub fn open(gain: f32) -> Result<Self> {
        let host = cpal::default_host();
        info!("Using audio host: {}", host.id().name());

        let device = host.default_output_device()
            .ok_or_else(|| anyhow::anyhow!("No output device available"))?;
        info!("Using output device: {}", device.name().unwrap_or_else(|_| "unknown".into()));

        let config = device.default_output_config()
            .context("Failed to query the default output config")?;
        info!("Device config: {:?}", config);

        let sample_format = config.sample_format();
        let config = cpal::StreamConfig::from(config);
        let sample_rate = config.sample_rate.0 as f32;

        let (commands, receiver) = unbounded();
        let mixer = Mixer::new(sample_rate, gain, receiver);

        let stream = match sample_format {
            SampleFormat::F32 => create_stream::<f32>(&device, &config, mixer),
            SampleFormat::I16 => create_stream::<i16>(&device, &config, mixer),
            SampleFormat::U16 => create_stream::<u16>(&device, &config, mixer),
            other => anyhow::bail!("Unsupported sample format {:?}", other),
        }?;

        stream.play().context("Failed to start the audio stream")?;
        info!("Audio stream started at {} Hz", sample_rate);

        Ok(Self {
            commands,
            gain,
            next_id: 0,
            _stream: stream,
        })
    }

    fn send(&self, command: MixerCommand) {
        if self.commands.send(command).is_err() {
            warn!("Audio stream is gone, dropping mixer command");
        }
    }
}

impl AudioOutput for CpalOutput {
    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
        self.send(MixerCommand::SetGain(gain));
    }

    fn gain(&self) -> f32 {
        self.gain
    }

    fn start_oscillator(&mut self, shape: OscillatorShape, frequency: f32) -> OscillatorId {
        self.next_id += 1;
        let id = OscillatorId(self.next_id);
        self.send(MixerCommand::Start { id, shape, frequency });
        id
    }

    fn stop_oscillator(&mut self, id: OscillatorId) {
        self.send(MixerCommand::Stop(id));
    }
}

fn create_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut mixer: Mixer,
) -> Result<Stream>
where
    T: Sample + Send + 'static + cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    let err_fn = |err| warn!("An error occurred on the audio stream: {}", err);

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            mixer.render(data, channels);
        },
        err_fn,
        None,
    ).context("Failed to build the output stream")?;

    Ok(stream)
}
