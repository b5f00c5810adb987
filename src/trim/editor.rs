// src/trim/editor.rs

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::TrimWindow;
use crate::error::Result;
use crate::session::TrimStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorState {
    /// Handles are being moved; nothing persisted yet.
    Draft,
    /// The draft matches the last applied window.
    Committed,
}

/// What the track store receives when the user hits Apply.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrimCommit {
    pub track_id: String,
    pub start: f64,
    pub end: f64,
}

/// Draft/committed pair for one open track.
///
/// Opening the editor copies the committed window into a draft. Slider and
/// drag input only touch the draft; `apply` promotes it, `cancel` throws it away.
#[derive(Debug, Clone)]
pub struct TrimEditor {
    track_id: String,
    committed: TrimWindow,
    draft: TrimWindow,
    state: EditorState,
}

impl TrimEditor {
    /// Open the editor on a track, starting from its stored `(start, end)` if any.
    pub fn open(
        track_id: impl Into<String>,
        duration: f64,
        committed: Option<(f64, f64)>,
        min_gap: f64,
    ) -> Result<Self> {
        let full = TrimWindow::create_with_gap(duration, min_gap)?;
        let committed = match committed {
            Some((start, end)) => full.set_end(end).set_start(start),
            None => full,
        };
        let track_id = track_id.into();
        debug!(%track_id, start = committed.start(), end = committed.end(), "trim editor opened");
        Ok(Self {
            track_id,
            committed,
            draft: committed,
            state: EditorState::Draft,
        })
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn draft(&self) -> &TrimWindow {
        &self.draft
    }

    pub fn committed(&self) -> &TrimWindow {
        &self.committed
    }

    /// Draft differs from what was last applied.
    pub fn is_dirty(&self) -> bool {
        self.draft != self.committed
    }

    pub fn set_start(&mut self, candidate: f64) {
        self.edit(self.draft.set_start(candidate));
    }

    pub fn set_end(&mut self, candidate: f64) {
        self.edit(self.draft.set_end(candidate));
    }

    pub fn nudge_start(&mut self, delta: f64) {
        self.set_start(self.draft.start() + delta);
    }

    pub fn nudge_end(&mut self, delta: f64) {
        self.set_end(self.draft.end() + delta);
    }

    pub fn reset(&mut self) {
        self.edit(self.draft.reset());
    }

    /// Validate the draft and make it the committed window.
    ///
    /// On error the committed window is untouched and the editor stays in draft.
    pub fn apply(&mut self) -> Result<TrimCommit> {
        let window = self.draft.apply()?;
        Ok(self.promote(window))
    }

    /// Like [`apply`](Self::apply), but only promotes once `store` accepted the commit.
    pub fn apply_to<S: TrimStore + ?Sized>(&mut self, store: &mut S) -> Result<TrimCommit> {
        let window = self.draft.apply()?;
        let commit = self.commit_for(&window);
        store.commit(&commit)?;
        Ok(self.promote(window))
    }

    /// Drop the draft and go back to the last committed window.
    pub fn cancel(&mut self) {
        self.draft = self.committed;
        self.state = EditorState::Committed;
    }

    fn edit(&mut self, next: TrimWindow) {
        self.draft = next;
        self.state = EditorState::Draft;
    }

    fn commit_for(&self, window: &TrimWindow) -> TrimCommit {
        TrimCommit {
            track_id: self.track_id.clone(),
            start: window.start(),
            end: window.end(),
        }
    }

    fn promote(&mut self, window: TrimWindow) -> TrimCommit {
        self.committed = window;
        self.draft = window;
        self.state = EditorState::Committed;
        info!(
            track_id = %self.track_id,
            start = window.start(),
            end = window.end(),
            "trim applied"
        );
        self.commit_for(&window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StudioError;
    use crate::session::{TrackTrim, TrimManifest};

    #[test]
    fn opens_in_draft_with_stored_values() {
        let ed = TrimEditor::open("t1", 180.0, Some((12.0, 90.0)), 0.0).unwrap();
        assert_eq!(ed.state(), EditorState::Draft);
        assert_eq!((ed.draft().start(), ed.draft().end()), (12.0, 90.0));
        assert!(!ed.is_dirty());
    }

    #[test]
    fn opens_untrimmed_without_stored_values() {
        let ed = TrimEditor::open("t1", 42.0, None, 1.0).unwrap();
        assert!(ed.draft().is_full());
    }

    #[test]
    fn stored_values_outside_track_are_clamped() {
        let ed = TrimEditor::open("t1", 30.0, Some((-5.0, 300.0)), 0.0).unwrap();
        assert_eq!((ed.committed().start(), ed.committed().end()), (0.0, 30.0));
    }

    #[test]
    fn apply_commits_and_returns_triple() {
        let mut ed = TrimEditor::open("song", 120.0, None, 1.0).unwrap();
        ed.set_start(150.0);
        let commit = ed.apply().unwrap();
        assert_eq!(
            commit,
            TrimCommit { track_id: "song".into(), start: 119.0, end: 120.0 }
        );
        assert_eq!(ed.state(), EditorState::Committed);
        assert_eq!(ed.committed().start(), 119.0);
    }

    #[test]
    fn failed_apply_keeps_previous_commit() {
        let mut ed = TrimEditor::open("song", 60.0, Some((5.0, 50.0)), 0.0).unwrap();
        ed.set_end(0.0);
        ed.set_start(60.0);
        let err = ed.apply().unwrap_err();
        assert!(matches!(err, StudioError::InvalidTrimRange { .. }));
        assert_eq!(ed.state(), EditorState::Draft);
        assert_eq!((ed.committed().start(), ed.committed().end()), (5.0, 50.0));
    }

    #[test]
    fn cancel_discards_draft() {
        let mut ed = TrimEditor::open("song", 60.0, Some((5.0, 50.0)), 0.0).unwrap();
        ed.nudge_start(2.5);
        ed.nudge_end(-10.0);
        assert!(ed.is_dirty());
        ed.cancel();
        assert!(!ed.is_dirty());
        assert_eq!(ed.state(), EditorState::Committed);
        assert_eq!(ed.draft().start(), 5.0);
    }

    #[test]
    fn reset_is_draft_only() {
        let mut ed = TrimEditor::open("song", 60.0, Some((5.0, 50.0)), 0.0).unwrap();
        ed.reset();
        assert!(ed.draft().is_full());
        assert_eq!(ed.committed().start(), 5.0);
        assert_eq!(ed.state(), EditorState::Draft);
    }

    struct FailingStore;

    impl TrimStore for FailingStore {
        fn commit(&mut self, _commit: &TrimCommit) -> Result<()> {
            Err(StudioError::Io(std::io::Error::other("disk full")))
        }

        fn lookup(&self, _track_id: &str) -> Option<&TrackTrim> {
            None
        }
    }

    #[test]
    fn rejected_store_commit_keeps_draft() {
        let mut ed = TrimEditor::open("song", 60.0, Some((5.0, 50.0)), 0.0).unwrap();
        ed.set_start(10.0);
        let err = ed.apply_to(&mut FailingStore).unwrap_err();
        assert_eq!(err.code(), "IO_ERROR");
        assert_eq!(ed.state(), EditorState::Draft);
        assert_eq!((ed.committed().start(), ed.committed().end()), (5.0, 50.0));
        assert_eq!(ed.draft().start(), 10.0);
        assert!(ed.is_dirty());
    }

    #[test]
    fn apply_to_store_persists() {
        let mut store = TrimManifest::default();
        let mut ed = TrimEditor::open("song", 60.0, None, 0.0).unwrap();
        ed.set_start(3.0);
        ed.apply_to(&mut store).unwrap();
        assert_eq!(
            store.lookup("song"),
            Some(&TrackTrim {
                track_id: "song".into(),
                trim_start: Some(3.0),
                trim_end: Some(60.0),
            })
        );
    }
}
