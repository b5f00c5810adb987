// src/trim_controller.rs

//! Terminal front-end for the trim editor: draws the waveform with its trim
//! overlay and maps key presses onto editor operations.

use std::fmt::Write as _;
use std::io::{stdout, Write};
use std::path::PathBuf;

use crossterm::cursor::MoveTo;
use crossterm::event::KeyCode;
use crossterm::execute;
use crossterm::terminal::{BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate};
use tracing::warn;

use crate::config::EditorConfig;
use crate::decoder::DecodedAudio;
use crate::error::Result;
use crate::session::{export_trimmed_wav, TrimManifest, TrimStore};
use crate::trim::{format_time, EditorState, TrimEditor};
use crate::waveform::{terminal, WaveformProfile};

const GRID_COLUMNS: usize = 100;
const GRID_ROWS: usize = 16;

pub struct TrimController {
    audio: DecodedAudio,
    profile: WaveformProfile,
    editor: TrimEditor,
    config: EditorConfig,
    manifest: TrimManifest,
    manifest_path: PathBuf,
    export_path: Option<PathBuf>,
    status: String,
    draw_buffer: String,
    force_redraw: bool,
}

impl TrimController {
    /// Summarize `audio` and open the editor from whatever `manifest` holds for `track_id`.
    pub fn new(
        track_id: String,
        audio: DecodedAudio,
        config: EditorConfig,
        manifest: TrimManifest,
        manifest_path: PathBuf,
        export_path: Option<PathBuf>,
    ) -> Result<Self> {
        config.validate()?;
        let profile = WaveformProfile::from_decoded(&audio, config.bin_count)?;
        let duration = audio.duration_secs();
        let stored = manifest
            .lookup(&track_id)
            .map(|t| t.committed_range(duration));
        let editor = TrimEditor::open(track_id, duration, stored, config.min_gap)?;

        Ok(Self {
            audio,
            profile,
            editor,
            config,
            manifest,
            manifest_path,
            export_path,
            status: String::from("Ready"),
            draw_buffer: String::new(),
            force_redraw: true,
        })
    }

    pub fn editor(&self) -> &TrimEditor {
        &self.editor
    }

    pub fn manifest(&self) -> &TrimManifest {
        &self.manifest
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn should_quit(&self, key: KeyCode) -> bool {
        matches!(key, KeyCode::Char('q') | KeyCode::Char('Q'))
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        let step = self.config.slider_step;
        match key {
            KeyCode::Char('a') => self.editor.nudge_start(-step),
            KeyCode::Char('d') => self.editor.nudge_start(step),
            KeyCode::Char('j') => self.editor.nudge_end(-step),
            KeyCode::Char('l') => self.editor.nudge_end(step),
            KeyCode::Char('r') => {
                self.editor.reset();
                self.status = String::from("Trim reset (press Enter to apply)");
            }
            KeyCode::Esc => {
                self.editor.cancel();
                self.status = String::from("Changes discarded");
            }
            KeyCode::Enter => self.apply(),
            _ => return,
        }
        self.force_redraw = true;
    }

    fn apply(&mut self) {
        let commit = match self.editor.apply_to(&mut self.manifest) {
            Ok(commit) => commit,
            Err(e) => {
                self.status = e.to_string();
                return;
            }
        };

        if let Err(e) = self.manifest.save_to_disk(&self.manifest_path) {
            warn!(error = %e, "could not save trim manifest");
            self.status = format!("Trim applied but not saved: {e}");
            return;
        }

        self.status = format!(
            "Applied {} - {}",
            format_time(commit.start),
            format_time(commit.end)
        );

        if let Some(path) = &self.export_path {
            match export_trimmed_wav(&self.audio, self.editor.committed(), path) {
                Ok(_) => {
                    let _ = write!(self.status, " | exported {}", path.display());
                }
                Err(e) => {
                    let _ = write!(self.status, " | export failed: {e}");
                }
            }
        }
    }

    pub fn run_tick(&mut self) -> anyhow::Result<()> {
        if !self.force_redraw {
            return Ok(());
        }
        self.force_redraw = false;
        self.draw_buffer.clear();

        let draft = *self.editor.draft();
        let grid = terminal::render_profile(&self.profile, &draft, GRID_COLUMNS, GRID_ROWS);

        let _ = write!(self.draw_buffer, "{}", MoveTo(0, 0));
        let _ = write!(self.draw_buffer, "Track: {}\x1b[K\r\n", self.editor.track_id());
        for line in &grid {
            let _ = write!(self.draw_buffer, "{}\x1b[K\r\n", line);
        }

        let state = match self.editor.state() {
            EditorState::Draft if self.editor.is_dirty() => "draft*",
            EditorState::Draft => "draft",
            EditorState::Committed => "applied",
        };
        let _ = write!(
            self.draw_buffer,
            "Start {}  End {}  Duration {} / {}  [{}]\x1b[K\r\n",
            format_time(draft.start()),
            format_time(draft.end()),
            format_time(draft.kept_duration()),
            format_time(draft.duration()),
            state
        );
        let _ = write!(
            self.draw_buffer,
            "[A/D] start  [J/L] end  [Enter] apply  [R] reset  [Esc] cancel  [Q] quit\x1b[K\r\n"
        );
        let _ = write!(self.draw_buffer, "{}", Clear(ClearType::UntilNewLine));
        let _ = write!(self.draw_buffer, "{}", self.status);

        let mut stdout = stdout();
        execute!(stdout, BeginSynchronizedUpdate)?;
        stdout.write_all(self.draw_buffer.as_bytes())?;
        execute!(stdout, EndSynchronizedUpdate)?;
        stdout.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(dir: &tempfile::TempDir, config: EditorConfig) -> TrimController {
        let samples: Vec<f32> = (0..1000).map(|i| ((i % 50) as f32 / 50.0) - 0.5).collect();
        let audio = DecodedAudio::new(100, vec![samples]).unwrap();
        TrimController::new(
            "clip".into(),
            audio,
            config,
            TrimManifest::default(),
            dir.path().join("trims.json"),
            Some(dir.path().join("clip_trimmed.wav")),
        )
        .unwrap()
    }

    #[test]
    fn keys_drive_the_draft() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(&dir, EditorConfig { slider_step: 1.0, ..EditorConfig::default() });
        c.handle_key(KeyCode::Char('d'));
        c.handle_key(KeyCode::Char('d'));
        c.handle_key(KeyCode::Char('j'));
        assert_eq!(c.editor().draft().start(), 2.0);
        assert_eq!(c.editor().draft().end(), 9.0);
        c.handle_key(KeyCode::Esc);
        assert!(c.editor().draft().is_full());
    }

    #[test]
    fn enter_persists_and_exports() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(&dir, EditorConfig { slider_step: 1.0, ..EditorConfig::default() });
        c.handle_key(KeyCode::Char('d'));
        c.handle_key(KeyCode::Enter);
        assert!(c.status().starts_with("Applied 0:01 - 0:10"), "{}", c.status());

        let saved = TrimManifest::load_from_disk(dir.path().join("trims.json")).unwrap();
        assert_eq!(saved.lookup("clip").unwrap().trim_start, Some(1.0));
        assert!(dir.path().join("clip_trimmed.wav").exists());
    }

    #[test]
    fn invalid_apply_reports_on_status_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(&dir, EditorConfig { slider_step: 20.0, ..EditorConfig::default() });
        c.handle_key(KeyCode::Char('d'));
        c.handle_key(KeyCode::Enter);
        assert!(c.status().starts_with("Start time must be less than end time"));
        assert!(c.manifest().lookup("clip").is_none());
        assert!(!dir.path().join("trims.json").exists());
    }

    #[test]
    fn quit_keys() {
        let dir = tempfile::tempdir().unwrap();
        let c = controller(&dir, EditorConfig::default());
        assert!(c.should_quit(KeyCode::Char('q')));
        assert!(!c.should_quit(KeyCode::Enter));
    }
}
