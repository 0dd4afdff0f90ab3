use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub artist_id: u64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub album_id: u64,
    pub name: String,
    pub artist_id: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub song_id: u64,
    pub name: String,
    #[serde(default)]
    pub lyrics: String,
    pub track_number: i64,
    pub album_id: u64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistWithAlbums {
    #[serde(flatten)]
    pub artist: Artist,
    pub albums: Vec<Album>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumWithSongs {
    #[serde(flatten)]
    pub album: Album,
    pub songs: Vec<Song>,
}

#[derive(Clone, Debug, Default)]
pub struct SongPatch {
    pub name: Option<String>,
    pub lyrics: Option<String>,
    pub track_number: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::{Album, Artist, ArtistWithAlbums, Song};

    #[test]
    fn wire_names_are_camel_case() {
        let song = Song {
            song_id: 3,
            name: "Intro".to_string(),
            lyrics: String::new(),
            track_number: 1,
            album_id: 2,
        };
        let value = serde_json::to_value(&song).unwrap();
        assert_eq!(value["songId"], 3);
        assert_eq!(value["trackNumber"], 1);
        assert_eq!(value["albumId"], 2);
    }

    #[test]
    fn decorated_artist_flattens_record() {
        let view = ArtistWithAlbums {
            artist: Artist {
                artist_id: 2,
                name: "New Artist".to_string(),
            },
            albums: vec![Album {
                album_id: 4,
                name: "First Album".to_string(),
                artist_id: 2,
            }],
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["artistId"], 2);
        assert_eq!(value["name"], "New Artist");
        assert_eq!(value["albums"][0]["albumId"], 4);
    }

    #[test]
    fn seed_song_without_lyrics_defaults_to_empty() {
        let song: Song = serde_json::from_str(
            r#"{"songId":1,"name":"Seed Song","trackNumber":1,"albumId":1}"#,
        )
        .unwrap();
        assert_eq!(song.lyrics, "");
    }
}
