// src/waveform/layout.rs

//! Canvas geometry for the bar waveform and its trim overlay.
//!
//! Any renderer that draws bars and markers should go through here so the
//! markers line up with the bars they cover.

use serde::Serialize;

use super::WaveformProfile;
use crate::config::EditorConfig;
use crate::trim::{fraction_to_pixel, time_to_fraction, TrimWindow};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    /// Fraction of `height` a full-scale bar occupies.
    pub bar_height_ratio: f64,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            bar_height_ratio: 0.8,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            width: config.canvas_width as f64,
            height: config.canvas_height as f64,
            bar_height_ratio: config.bar_height_ratio,
        }
    }
}

/// One vertically centred bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Inside the kept region.
    pub active: bool,
}

/// Pixel positions of the start and end markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Markers {
    pub start_x: f64,
    pub end_x: f64,
}

impl Markers {
    pub fn for_window(window: &TrimWindow, width: f64) -> Self {
        Self {
            start_x: fraction_to_pixel(time_to_fraction(window.duration(), window.start()), width),
            end_x: fraction_to_pixel(time_to_fraction(window.duration(), window.end()), width),
        }
    }

    /// Width of the kept span in pixels.
    pub fn span(&self) -> f64 {
        self.end_x - self.start_x
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveformLayout {
    pub bars: Vec<Bar>,
    pub markers: Markers,
}

pub fn layout(profile: &WaveformProfile, window: &TrimWindow, canvas: &Canvas) -> WaveformLayout {
    let markers = Markers::for_window(window, canvas.width);
    if profile.is_empty() {
        return WaveformLayout { bars: Vec::new(), markers };
    }

    let slot = canvas.width / profile.len() as f64;
    let bars = profile
        .bins()
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let x = i as f64 * slot;
            let height = value as f64 * canvas.height * canvas.bar_height_ratio;
            Bar {
                x,
                y: (canvas.height - height) / 2.0,
                // 1px gutter between bars.
                width: (slot - 1.0).max(0.0),
                height,
                active: x >= markers.start_x && x <= markers.end_x,
            }
        })
        .collect();

    WaveformLayout { bars, markers }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::summarize;

    #[test]
    fn bars_fill_canvas_and_centre_vertically() {
        let profile = summarize(&[0.0, 0.0, 0.5, 0.5, 1.0, 1.0, 0.0, 0.0], 4).unwrap();
        let window = TrimWindow::create(8.0).unwrap();
        let canvas = Canvas::from_config(&EditorConfig::default());
        assert_eq!(canvas, Canvas::new(800.0, 150.0));
        let out = layout(&profile, &window, &canvas);

        assert_eq!(out.bars.len(), 4);
        assert_eq!(out.bars[2].x, 400.0);
        assert_eq!(out.bars[2].width, 199.0);
        assert!((out.bars[2].height - 120.0).abs() < 1e-9);
        assert!((out.bars[2].y - 15.0).abs() < 1e-9);
        assert_eq!(out.bars[0].height, 0.0);
        assert!(out.bars.iter().all(|b| b.active));
    }

    #[test]
    fn bars_outside_trim_are_inactive() {
        let profile = summarize(&[1.0; 4], 4).unwrap();
        let window = TrimWindow::create(4.0).unwrap().set_start(1.0).set_end(2.0);
        let out = layout(&profile, &window, &Canvas::new(400.0, 100.0));

        assert_eq!(out.markers, Markers { start_x: 100.0, end_x: 200.0 });
        let active: Vec<bool> = out.bars.iter().map(|b| b.active).collect();
        assert_eq!(active, vec![false, true, true, false]);
        assert_eq!(out.markers.span(), 100.0);
    }
}
