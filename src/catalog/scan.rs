use std::collections::HashSet;
use std::path::Path;

use lofty::prelude::{ItemKey, TaggedFileExt};
use walkdir::{DirEntry, WalkDir};

use crate::config::LibrarySettings;

use super::model::{Track, TrackId};

/// Lower-cased extensions from the settings, leading dots dropped.
fn extension_set(settings: &LibrarySettings) -> HashSet<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn has_audio_extension(path: &Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| extensions.contains(&ext.to_ascii_lowercase()))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

/// Name of the first directory under `root` that contains `path`, if `path`
/// is nested at least one directory deep.
fn top_level_folder(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut components = rel.components();
    let first = components.next()?;
    // A file directly under the root has no folder to borrow a name from.
    components.next()?;
    first
        .as_os_str()
        .to_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Default)]
struct Tags {
    title: Option<String>,
    artist: Option<String>,
}

fn non_blank(v: &str) -> Option<String> {
    let v = v.trim();
    (!v.is_empty()).then(|| v.to_string())
}

/// Whatever `lofty` can tell about `path`. Unreadable files give empty tags.
fn read_tags(path: &Path) -> Tags {
    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no readable tags");
            return Tags::default();
        }
    };
    match tagged.primary_tag().or_else(|| tagged.first_tag()) {
        Some(tag) => Tags {
            title: tag.get_string(ItemKey::TrackTitle).and_then(non_blank),
            artist: tag.get_string(ItemKey::TrackArtist).and_then(non_blank),
        },
        None => Tags::default(),
    }
}

fn walker(dir: &Path, settings: &LibrarySettings) -> WalkDir {
    let walker = WalkDir::new(dir).follow_links(settings.follow_links);
    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    match depth_cap {
        Some(d) => walker.max_depth(d),
        None => walker,
    }
}

/// Walk `dir` and read every audio file into a `Track`.
///
/// The file path doubles as id and preview uri. Paths that are not valid
/// UTF-8 get no preview uri, which makes the track unplayable.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let extensions = extension_set(settings);

    let mut tracks: Vec<Track> = walker(dir, settings)
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e))
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() || e.path().is_file())
        .filter(|e| has_audio_extension(e.path(), &extensions))
        .map(|e| track_from_file(dir, e.path(), settings))
        .collect();

    // Group by performer, then title, so listings read naturally.
    tracks.sort_by_cached_key(|t| {
        (
            t.artist.as_deref().unwrap_or_default().to_lowercase(),
            t.title.to_lowercase(),
        )
    });
    tracing::debug!(dir = %dir.display(), count = tracks.len(), "library scanned");
    tracks
}

fn track_from_file(root: &Path, path: &Path, settings: &LibrarySettings) -> Track {
    let tags = read_tags(path);
    let title = tags.title.unwrap_or_else(|| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string()
    });
    let artist = tags
        .artist
        .or_else(|| settings.folder_as_performer.then(|| top_level_folder(root, path)).flatten());

    Track {
        id: TrackId::new(path.to_string_lossy()),
        title,
        preview_uri: path.to_str().map(str::to_string),
        artist,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"not really audio").unwrap();
    }

    fn titles(tracks: &[Track]) -> Vec<&str> {
        tracks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn extensions_are_normalized_and_case_insensitive() {
        let settings = LibrarySettings {
            extensions: vec![".MP3".into(), " flac ".into(), "".into()],
            ..LibrarySettings::default()
        };
        let exts = extension_set(&settings);
        assert_eq!(exts.len(), 2);
        assert!(has_audio_extension(Path::new("/m/a.mp3"), &exts));
        assert!(has_audio_extension(Path::new("/m/a.Flac"), &exts));
        assert!(!has_audio_extension(Path::new("/m/a.ogg"), &exts));
        assert!(!has_audio_extension(Path::new("/m/mp3"), &exts));
    }

    #[test]
    fn top_level_folder_needs_a_nested_file() {
        let root = Path::new("/music");
        assert_eq!(
            top_level_folder(root, Path::new("/music/Nina Simone/Pastel Blues/01.mp3")),
            Some("Nina Simone".to_string())
        );
        assert_eq!(top_level_folder(root, Path::new("/music/loose.mp3")), None);
        assert_eq!(top_level_folder(root, Path::new("/elsewhere/x/y.mp3")), None);
    }

    #[test]
    fn untagged_files_fall_back_to_file_stem_and_path() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("b.MP3"));
        touch(&dir.path().join("A.ogg"));
        touch(&dir.path().join("notes.txt"));

        let tracks = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(titles(&tracks), vec!["A", "b"]);
        for t in &tracks {
            assert!(t.is_playable());
            assert_eq!(t.preview_uri.as_deref(), Some(t.id.as_str()));
        }
    }

    #[test]
    fn performer_comes_from_folder_when_untagged() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("Portishead/Dummy/Roads.mp3"));
        touch(&dir.path().join("Low/Things We Lost/Sunflower.mp3"));
        touch(&dir.path().join("loose.mp3"));

        let tracks = scan(dir.path(), &LibrarySettings::default());
        let artists: Vec<Option<&str>> = tracks.iter().map(|t| t.artist.as_deref()).collect();
        // Untagged and folderless sorts first.
        assert_eq!(artists, vec![None, Some("Low"), Some("Portishead")]);

        let settings = LibrarySettings {
            folder_as_performer: false,
            ..LibrarySettings::default()
        };
        assert!(scan(dir.path(), &settings).iter().all(|t| t.artist.is_none()));
    }

    #[test]
    fn hidden_entries_need_opting_in() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join(".hidden.mp3"));
        touch(&dir.path().join(".stash/inside.mp3"));
        touch(&dir.path().join("visible.mp3"));

        let tracks = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(titles(&tracks), vec!["visible"]);

        let settings = LibrarySettings {
            include_hidden: true,
            ..LibrarySettings::default()
        };
        assert_eq!(scan(dir.path(), &settings).len(), 3);
    }

    #[test]
    fn depth_settings_limit_the_walk() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("root.mp3"));
        touch(&dir.path().join("d1/one.mp3"));
        touch(&dir.path().join("d1/d2/two.mp3"));

        let flat = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        assert_eq!(titles(&scan(dir.path(), &flat)), vec!["root"]);

        // Root is depth 0, so 2 reaches d1/* but not d1/d2/*.
        let capped = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &capped);
        let names = titles(&tracks);
        assert!(names.contains(&"root"));
        assert!(names.contains(&"one"));
        assert!(!names.contains(&"two"));

        assert_eq!(scan(dir.path(), &LibrarySettings::default()).len(), 3);
    }
}
