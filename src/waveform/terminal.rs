// src/waveform/terminal.rs

use super::WaveformProfile;
use crate::trim::TrimWindow;

const ACTIVE: char = '█';
const TRIMMED: char = '░';
const MARKER: char = '│';

/// Draw the profile as centred bars, `columns` wide and `rows` tall.
///
/// Columns inside the trim window use solid blocks, the rest are shaded, and
/// the two trim handles are drawn as vertical lines.
pub fn render_profile(
    profile: &WaveformProfile,
    window: &TrimWindow,
    columns: usize,
    rows: usize,
) -> Vec<String> {
    let w = columns.max(1);
    let h = rows.max(4);
    let mut lines = vec![vec![' '; w]; h];

    let start_frac = window.start_fraction();
    let end_frac = window.end_fraction();
    let bins = profile.bins();

    for x in 0..w {
        let Some(&value) = bins.get(x * bins.len() / w) else {
            continue;
        };
        let frac = x as f64 / w as f64;
        let glyph = if frac >= start_frac && frac <= end_frac { ACTIVE } else { TRIMMED };

        let bar = ((value.clamp(0.0, 1.0) * h as f32).round() as usize).min(h);
        let top = (h - bar) / 2;
        for row in lines.iter_mut().skip(top).take(bar) {
            row[x] = glyph;
        }
    }

    let to_col = |f: f64| -> usize { ((f * w as f64).floor() as usize).min(w - 1) };
    for col in [to_col(start_frac), to_col(end_frac)] {
        for row in lines.iter_mut() {
            row[col] = MARKER;
        }
    }

    lines.into_iter().map(|row| row.into_iter().collect()).collect()
}
