mod waveform_plot;

pub use waveform_plot::WaveformPlot;
