use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use common::{Album, AlbumWithSongs, Artist, ArtistWithAlbums, Song, SongPatch};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const FIRST_GENERATED_ID: u64 = 2;

const ARTISTS_FILE: &str = "artists.json";
const ALBUMS_FILE: &str = "albums.json";
const SONGS_FILE: &str = "songs.json";

#[derive(Clone, Debug)]
pub struct Catalog {
    artists: BTreeMap<u64, Artist>,
    albums: BTreeMap<u64, Album>,
    songs: BTreeMap<u64, Song>,
    next_artist_id: u64,
    next_album_id: u64,
    next_song_id: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogStats {
    pub artists: usize,
    pub albums: usize,
    pub songs: usize,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            artists: BTreeMap::new(),
            albums: BTreeMap::new(),
            songs: BTreeMap::new(),
            next_artist_id: FIRST_GENERATED_ID,
            next_album_id: FIRST_GENERATED_ID,
            next_song_id: FIRST_GENERATED_ID,
        }
    }

    // Counters start past the largest seeded id.
    pub fn from_seed(artists: Vec<Artist>, albums: Vec<Album>, songs: Vec<Song>) -> Self {
        let mut catalog = Self::new();
        for artist in artists {
            catalog.next_artist_id = catalog.next_artist_id.max(artist.artist_id.saturating_add(1));
            catalog.artists.insert(artist.artist_id, artist);
        }
        for album in albums {
            catalog.next_album_id = catalog.next_album_id.max(album.album_id.saturating_add(1));
            catalog.albums.insert(album.album_id, album);
        }
        for song in songs {
            catalog.next_song_id = catalog.next_song_id.max(song.song_id.saturating_add(1));
            catalog.songs.insert(song.song_id, song);
        }
        catalog
    }

    pub fn load_seed(dir: &Path) -> Result<Self, LibraryError> {
        if !dir.exists() {
            warn!("Seed directory {:?} not found; starting empty", dir);
            return Ok(Self::new());
        }
        let artists: Vec<Artist> = read_seed_file(&dir.join(ARTISTS_FILE))?;
        let albums: Vec<Album> = read_seed_file(&dir.join(ALBUMS_FILE))?;
        let songs: Vec<Song> = read_seed_file(&dir.join(SONGS_FILE))?;
        let max_ids = [
            artists.iter().map(|artist| artist.artist_id).max(),
            albums.iter().map(|album| album.album_id).max(),
            songs.iter().map(|song| song.song_id).max(),
        ];
        if max_ids.contains(&Some(u64::MAX)) {
            return Err(LibraryError::Seed(format!(
                "{}: id {} leaves no room for new records",
                dir.display(),
                u64::MAX
            )));
        }
        let catalog = Self::from_seed(artists, albums, songs);
        info!("Loaded seed data from {:?}", dir);
        Ok(catalog)
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            artists: self.artists.len(),
            albums: self.albums.len(),
            songs: self.songs.len(),
        }
    }

    pub fn artist(&self, artist_id: u64) -> Option<&Artist> {
        self.artists.get(&artist_id)
    }

    pub fn album(&self, album_id: u64) -> Option<&Album> {
        self.albums.get(&album_id)
    }

    pub fn song(&self, song_id: u64) -> Option<&Song> {
        self.songs.get(&song_id)
    }

    pub fn list_artists(&self) -> Vec<Artist> {
        self.artists.values().cloned().collect()
    }

    pub fn next_artist_id(&mut self) -> u64 {
        let id = self.next_artist_id;
        self.next_artist_id = self.next_artist_id.saturating_add(1);
        id
    }

    pub fn next_album_id(&mut self) -> u64 {
        let id = self.next_album_id;
        self.next_album_id = self.next_album_id.saturating_add(1);
        id
    }

    pub fn next_song_id(&mut self) -> u64 {
        let id = self.next_song_id;
        self.next_song_id = self.next_song_id.saturating_add(1);
        id
    }

    pub fn insert_artist(&mut self, artist: Artist) {
        self.artists.insert(artist.artist_id, artist);
    }

    pub fn insert_album(&mut self, album: Album) {
        self.albums.insert(album.album_id, album);
    }

    pub fn insert_song(&mut self, song: Song) {
        self.songs.insert(song.song_id, song);
    }

    pub fn remove_artist(&mut self, artist_id: u64) -> Option<Artist> {
        self.artists.remove(&artist_id)
    }

    pub fn remove_album(&mut self, album_id: u64) -> Option<Album> {
        self.albums.remove(&album_id)
    }

    pub fn remove_song(&mut self, song_id: u64) -> Option<Song> {
        self.songs.remove(&song_id)
    }

    pub fn create_artist(&mut self, name: String) -> Artist {
        let artist = Artist {
            artist_id: self.next_artist_id(),
            name,
        };
        self.insert_artist(artist.clone());
        artist
    }

    pub fn create_album(&mut self, artist_id: u64, name: String) -> Option<Album> {
        if !self.artists.contains_key(&artist_id) {
            return None;
        }
        let album = Album {
            album_id: self.next_album_id(),
            name,
            artist_id,
        };
        self.insert_album(album.clone());
        Some(album)
    }

    pub fn create_song(
        &mut self,
        album_id: u64,
        name: String,
        lyrics: String,
        track_number: i64,
    ) -> Option<Song> {
        if !self.albums.contains_key(&album_id) {
            return None;
        }
        let song = Song {
            song_id: self.next_song_id(),
            name,
            lyrics,
            track_number,
            album_id,
        };
        self.insert_song(song.clone());
        Some(song)
    }

    pub fn rename_artist(&mut self, artist_id: u64, name: String) -> Option<Artist> {
        let artist = self.artists.get_mut(&artist_id)?;
        artist.name = name;
        Some(artist.clone())
    }

    pub fn rename_album(&mut self, album_id: u64, name: String) -> Option<Album> {
        let album = self.albums.get_mut(&album_id)?;
        album.name = name;
        Some(album.clone())
    }

    pub fn update_song(&mut self, song_id: u64, patch: SongPatch) -> Option<Song> {
        let song = self.songs.get_mut(&song_id)?;
        if let Some(name) = patch.name {
            song.name = name;
        }
        if let Some(lyrics) = patch.lyrics {
            song.lyrics = lyrics;
        }
        if let Some(track_number) = patch.track_number {
            song.track_number = track_number;
        }
        Some(song.clone())
    }

    pub fn albums_by_artist(&self, artist_id: u64) -> Vec<Album> {
        self.albums
            .values()
            .filter(|album| album.artist_id == artist_id)
            .cloned()
            .collect()
    }

    pub fn songs_by_album(&self, album_id: u64) -> Vec<Song> {
        self.songs
            .values()
            .filter(|song| song.album_id == album_id)
            .cloned()
            .collect()
    }

    pub fn songs_by_artist(&self, artist_id: u64) -> Vec<Song> {
        let mut songs = Vec::new();
        for album in self.albums_by_artist(artist_id) {
            let mut album_songs = self.songs_by_album(album.album_id);
            songs.append(&mut album_songs);
        }
        songs
    }

    pub fn songs_by_track_number(&self, track_number: i64) -> Vec<Song> {
        self.songs
            .values()
            .filter(|song| song.track_number == track_number)
            .cloned()
            .collect()
    }

    pub fn artist_with_albums(&self, artist_id: u64) -> Option<ArtistWithAlbums> {
        let artist = self.artist(artist_id)?.clone();
        Some(ArtistWithAlbums {
            albums: self.albums_by_artist(artist_id),
            artist,
        })
    }

    pub fn album_with_songs(&self, album_id: u64) -> Option<AlbumWithSongs> {
        let album = self.album(album_id)?.clone();
        Some(AlbumWithSongs {
            songs: self.songs_by_album(album_id),
            album,
        })
    }
}

// Array of records, or an object keyed by id.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeedCollection<T> {
    List(Vec<T>),
    Keyed(BTreeMap<String, T>),
}

impl<T> SeedCollection<T> {
    fn into_records(self) -> Vec<T> {
        match self {
            SeedCollection::List(items) => items,
            SeedCollection::Keyed(items) => items.into_values().collect(),
        }
    }
}

pub fn parse_seed<T: DeserializeOwned>(contents: &str) -> Result<Vec<T>, LibraryError> {
    let collection: SeedCollection<T> = serde_json::from_str(contents)?;
    Ok(collection.into_records())
}

fn read_seed_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LibraryError> {
    if !path.exists() {
        warn!("Seed file {:?} not found", path);
        return Ok(Vec::new());
    }
    let contents = fs::read_to_string(path)?;
    parse_seed(&contents).map_err(|err| match err {
        LibraryError::Json(err) => LibraryError::Seed(format!("{}: {}", path.display(), err)),
        other => other,
    })
}

#[derive(Debug)]
pub enum LibraryError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Seed(String),
}

impl std::fmt::Display for LibraryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LibraryError::Io(err) => write!(f, "io error: {}", err),
            LibraryError::Json(err) => write!(f, "json error: {}", err),
            LibraryError::Seed(message) => write!(f, "invalid seed file {}", message),
        }
    }
}

impl std::error::Error for LibraryError {}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::Io(err)
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Catalog {
        Catalog::from_seed(
            vec![Artist {
                artist_id: 1,
                name: "Seed Artist".to_string(),
            }],
            vec![Album {
                album_id: 1,
                name: "Seed Album".to_string(),
                artist_id: 1,
            }],
            vec![Song {
                song_id: 1,
                name: "Seed Song".to_string(),
                lyrics: "la la".to_string(),
                track_number: 1,
                album_id: 1,
            }],
        )
    }

    #[test]
    fn generated_ids_start_at_two_and_increase() {
        let mut catalog = seeded();
        let first = catalog.create_artist("New Artist".to_string());
        let second = catalog.create_artist("Another".to_string());
        assert_eq!(first.artist_id, 2);
        assert!(second.artist_id > first.artist_id);
    }

    #[test]
    fn counters_skip_past_larger_seed_ids() {
        let mut catalog = Catalog::from_seed(
            vec![Artist {
                artist_id: 7,
                name: "Seven".to_string(),
            }],
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(catalog.next_artist_id(), 8);
        assert_eq!(catalog.next_album_id(), 2);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut catalog = seeded();
        let artist = catalog.create_artist("Gone".to_string());
        catalog.remove_artist(artist.artist_id);
        let next = catalog.create_artist("Next".to_string());
        assert_eq!(next.artist_id, artist.artist_id + 1);
    }

    #[test]
    fn album_under_missing_artist_leaves_state_untouched() {
        let mut catalog = seeded();
        let before = catalog.stats();
        assert!(catalog.create_album(99, "Orphan".to_string()).is_none());
        assert_eq!(catalog.stats(), before);
        let album = catalog.create_album(1, "Real".to_string()).unwrap();
        assert_eq!(album.album_id, 2);
    }

    #[test]
    fn song_under_missing_album_is_rejected() {
        let mut catalog = seeded();
        assert!(catalog
            .create_song(42, "Nope".to_string(), String::new(), 1)
            .is_none());
        assert_eq!(catalog.next_song_id(), 2);
    }

    #[test]
    fn deleting_artist_keeps_its_albums() {
        let mut catalog = seeded();
        let artist = catalog.create_artist("Short Lived".to_string());
        let album = catalog
            .create_album(artist.artist_id, "Survivor".to_string())
            .unwrap();
        catalog.remove_artist(artist.artist_id);
        assert!(catalog.artist(artist.artist_id).is_none());
        assert_eq!(catalog.album(album.album_id), Some(&album));
    }

    #[test]
    fn albums_by_artist_follows_insertion_order() {
        let mut catalog = seeded();
        let artist = catalog.create_artist("Prolific".to_string());
        let a = catalog.create_album(artist.artist_id, "A".to_string()).unwrap();
        let other = catalog.create_album(1, "Elsewhere".to_string()).unwrap();
        let b = catalog.create_album(artist.artist_id, "B".to_string()).unwrap();
        let c = catalog.create_album(artist.artist_id, "C".to_string()).unwrap();
        catalog.remove_album(b.album_id);

        let albums = catalog.albums_by_artist(artist.artist_id);
        assert_eq!(albums, vec![a, c]);
        assert!(!albums.contains(&other));
    }

    #[test]
    fn songs_by_artist_is_flat_in_album_then_song_order() {
        let mut catalog = seeded();
        let first = catalog.create_album(1, "Second Album".to_string()).unwrap();
        let s1 = catalog
            .create_song(first.album_id, "B-side".to_string(), String::new(), 1)
            .unwrap();
        let s2 = catalog
            .create_song(1, "Bonus".to_string(), String::new(), 2)
            .unwrap();

        let names: Vec<String> = catalog
            .songs_by_artist(1)
            .into_iter()
            .map(|song| song.name)
            .collect();
        assert_eq!(names, vec!["Seed Song", s2.name.as_str(), s1.name.as_str()]);
    }

    #[test]
    fn songs_by_track_number_scans_all_albums() {
        let mut catalog = seeded();
        let album = catalog.create_album(1, "Other".to_string()).unwrap();
        catalog
            .create_song(album.album_id, "Opener".to_string(), String::new(), 1)
            .unwrap();
        catalog
            .create_song(album.album_id, "Closer".to_string(), String::new(), 9)
            .unwrap();
        assert_eq!(catalog.songs_by_track_number(1).len(), 2);
        assert!(catalog.songs_by_track_number(3).is_empty());
    }

    #[test]
    fn update_song_applies_only_present_fields() {
        let mut catalog = seeded();
        let patch = SongPatch {
            lyrics: Some("new words".to_string()),
            ..SongPatch::default()
        };
        let song = catalog.update_song(1, patch).unwrap();
        assert_eq!(song.lyrics, "new words");
        assert_eq!(song.name, "Seed Song");
        assert_eq!(song.track_number, 1);
        assert!(catalog.update_song(5, SongPatch::default()).is_none());
    }

    #[test]
    fn decorated_views_are_computed_not_stored() {
        let catalog = seeded();
        let view = catalog.artist_with_albums(1).unwrap();
        assert_eq!(view.albums.len(), 1);
        let view = catalog.album_with_songs(1).unwrap();
        assert_eq!(view.songs.len(), 1);
        assert!(catalog.artist_with_albums(2).is_none());
    }

    #[test]
    fn parse_seed_accepts_array_and_keyed_object() {
        let list: Vec<Artist> = parse_seed(r#"[{"artistId":1,"name":"Seed Artist"}]"#).unwrap();
        let keyed: Vec<Artist> =
            parse_seed(r#"{"1":{"artistId":1,"name":"Seed Artist"}}"#).unwrap();
        assert_eq!(list, keyed);
    }

    #[test]
    fn load_seed_reads_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(ARTISTS_FILE),
            r#"{"1":{"artistId":1,"name":"Seed Artist"}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(ALBUMS_FILE),
            r#"[{"albumId":1,"name":"Seed Album","artistId":1}]"#,
        )
        .unwrap();

        let catalog = Catalog::load_seed(dir.path()).unwrap();
        assert_eq!(
            catalog.stats(),
            CatalogStats {
                artists: 1,
                albums: 1,
                songs: 0
            }
        );
    }

    #[test]
    fn load_seed_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SONGS_FILE), "{not json").unwrap();
        let err = Catalog::load_seed(dir.path()).unwrap_err();
        assert!(matches!(err, LibraryError::Seed(_)));
    }

    #[test]
    fn load_seed_rejects_exhausted_id_space() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(ARTISTS_FILE),
            format!(r#"[{{"artistId":{},"name":"Last"}}]"#, u64::MAX),
        )
        .unwrap();
        let err = Catalog::load_seed(dir.path()).unwrap_err();
        assert!(matches!(err, LibraryError::Seed(_)));
    }
}
