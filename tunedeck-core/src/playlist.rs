use std::path::Path;

use lofty::{file::TaggedFileExt, probe::Probe, tag::Accessor};

use crate::error::{PlayerError, Result};

/// A single playable item with display metadata and a media source locator
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Track title shown in the UI
    pub name: String,
    /// Artist line shown under the title
    pub artist: String,
    /// Locator handed to the media port's `load`
    pub audio_source: String,
    /// Cover art locator, if the track has one
    pub cover_source: Option<String>,
}

impl Track {
    /// Build a track from an audio file, reading title/artist tags when present
    /// and falling back to the file stem.
    pub fn from_path(path: &str) -> Self {
        let mut name = None;
        let mut artist = None;

        match Probe::open(path).and_then(|p| p.read()) {
            Ok(tagged_file) => {
                if let Some(tag) = tagged_file.primary_tag() {
                    name = tag.title().map(|s| s.to_string());
                    artist = tag.artist().map(|s| s.to_string());

                    log::info!("Tags loaded: {:?} by {:?}", name, artist);
                }
            }
            Err(e) => {
                log::warn!("Failed to read tags from {}: {}", path, e);
            }
        }

        let name = name.unwrap_or_else(|| {
            Path::new(path)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Unknown")
                .to_string()
        });

        Track {
            name,
            artist: artist.unwrap_or_else(|| "Unknown Artist".to_string()),
            audio_source: path.to_string(),
            cover_source: None,
        }
    }
}

/// Fixed, insertion-ordered track list. Immutable once built; the only moving
/// part is the current index the controller keeps, so the store is just
/// bounds-checked lookup plus wrap-around index arithmetic.
#[derive(Debug, Clone)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    /// Build a playlist. At least one track is required.
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(PlayerError::EmptyPlaylist);
        }
        Ok(Playlist { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Get a track by index
    pub fn get(&self, index: usize) -> Result<&Track> {
        self.tracks
            .get(index)
            .ok_or(PlayerError::IndexOutOfRange(index))
    }

    /// Index of the track after `current`, wrapping to the first
    pub fn next_index(&self, current: usize) -> usize {
        (current + 1) % self.tracks.len()
    }

    /// Index of the track before `current`, wrapping to the last
    pub fn previous_index(&self, current: usize) -> usize {
        (current + self.tracks.len() - 1) % self.tracks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(name: &str) -> Track {
        Track {
            name: name.to_string(),
            artist: "Artist".to_string(),
            audio_source: format!("{name}.mp3"),
            cover_source: None,
        }
    }

    fn playlist(len: usize) -> Playlist {
        let tracks = (0..len).map(|i| track(&format!("t{i}"))).collect();
        Playlist::new(tracks).unwrap()
    }

    #[test]
    fn empty_playlist_rejected() {
        assert!(matches!(
            Playlist::new(vec![]),
            Err(PlayerError::EmptyPlaylist)
        ));
    }

    #[test]
    fn get_out_of_range() {
        let list = playlist(3);
        assert!(list.get(2).is_ok());
        assert!(matches!(list.get(3), Err(PlayerError::IndexOutOfRange(3))));
    }

    #[test]
    fn next_wraps_to_first() {
        let list = playlist(3);
        assert_eq!(list.next_index(0), 1);
        assert_eq!(list.next_index(2), 0);
    }

    #[test]
    fn previous_wraps_to_last() {
        let list = playlist(3);
        assert_eq!(list.previous_index(1), 0);
        assert_eq!(list.previous_index(0), 2);
    }

    #[test]
    fn full_cycle_returns_to_start() {
        let list = playlist(5);
        let mut index = 2;
        for _ in 0..list.len() {
            index = list.next_index(index);
        }
        assert_eq!(index, 2);
    }

    #[test]
    fn single_track_wraps_onto_itself() {
        let list = playlist(1);
        assert_eq!(list.next_index(0), 0);
        assert_eq!(list.previous_index(0), 0);
    }
}
