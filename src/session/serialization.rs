use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, info};

use super::TrimStore;
use crate::error::Result;
use crate::trim::TrimCommit;

pub const MANIFEST_VERSION: u32 = 1;

// Trim stored on a track record; `None` means untrimmed on that side.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackTrim {
    pub track_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim_start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim_end: Option<f64>,
}

impl TrackTrim {
    /// `(start, end)` for [`TrimEditor::open`](crate::trim::TrimEditor::open).
    ///
    /// A missing or zero end means "to the end of the track".
    pub fn committed_range(&self, duration: f64) -> (f64, f64) {
        let start = self.trim_start.unwrap_or(0.0);
        let end = match self.trim_end {
            Some(end) if end > 0.0 => end,
            _ => duration,
        };
        (start, end)
    }
}

impl From<&TrimCommit> for TrackTrim {
    fn from(commit: &TrimCommit) -> Self {
        Self {
            track_id: commit.track_id.clone(),
            trim_start: Some(commit.start),
            trim_end: Some(commit.end),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrimManifest {
    pub version: u32,
    pub tracks: Vec<TrackTrim>,
}

impl Default for TrimManifest {
    fn default() -> Self {
        Self {
            version: MANIFEST_VERSION,
            tracks: Vec::new(),
        }
    }
}

impl TrimManifest {
    pub fn save_to_disk(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        debug!(path = %path.display(), tracks = self.tracks.len(), "saved trim manifest");
        Ok(())
    }

    pub fn load_from_disk(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let manifest = serde_json::from_reader(reader)?;
        Ok(manifest)
    }

    /// Load `path`, or start empty if it does not exist yet.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_disk(path)
        } else {
            Ok(Self::default())
        }
    }
}

impl TrimStore for TrimManifest {
    fn commit(&mut self, commit: &TrimCommit) -> Result<()> {
        let record = TrackTrim::from(commit);
        match self.tracks.iter_mut().find(|t| t.track_id == commit.track_id) {
            Some(existing) => *existing = record,
            None => self.tracks.push(record),
        }
        info!(track_id = %commit.track_id, start = commit.start, end = commit.end, "trim stored");
        Ok(())
    }

    fn lookup(&self, track_id: &str) -> Option<&TrackTrim> {
        self.tracks.iter().find(|t| t.track_id == track_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(id: &str, start: f64, end: f64) -> TrimCommit {
        TrimCommit { track_id: id.into(), start, end }
    }

    #[test]
    fn commit_upserts_by_track() {
        let mut m = TrimManifest::default();
        m.commit(&commit("a", 1.0, 2.0)).unwrap();
        m.commit(&commit("b", 3.0, 4.0)).unwrap();
        m.commit(&commit("a", 5.0, 6.0)).unwrap();
        assert_eq!(m.tracks.len(), 2);
        assert_eq!(m.lookup("a").unwrap().trim_start, Some(5.0));
        assert!(m.lookup("zzz").is_none());
    }

    #[test]
    fn committed_range_defaults() {
        let t = TrackTrim { track_id: "x".into(), trim_start: None, trim_end: None };
        assert_eq!(t.committed_range(90.0), (0.0, 90.0));
        let t = TrackTrim { track_id: "x".into(), trim_start: Some(4.0), trim_end: Some(0.0) };
        assert_eq!(t.committed_range(90.0), (4.0, 90.0));
    }

    #[test]
    fn untrimmed_sides_are_omitted_from_json() {
        let m = TrimManifest {
            version: MANIFEST_VERSION,
            tracks: vec![TrackTrim { track_id: "x".into(), trim_start: Some(1.5), trim_end: None }],
        };
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("trim_start"));
        assert!(!json.contains("trim_end"));
    }

    #[test]
    fn disk_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trims.json");
        assert_eq!(TrimManifest::load_or_default(&path).unwrap(), TrimManifest::default());

        let mut m = TrimManifest::default();
        m.commit(&commit("a", 0.5, 10.0)).unwrap();
        m.save_to_disk(&path).unwrap();
        assert_eq!(TrimManifest::load_or_default(&path).unwrap(), m);
    }
}
