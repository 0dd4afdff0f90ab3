use common::SongPatch;
use library::Catalog;
use tracing::info;

use crate::body::RequestBody;
use crate::routes::RouteParams;

use super::albums::existing_album;
use super::artists::existing_artist;
use super::{required_text, ApiError, Reply};

const SONG_NOT_FOUND: ApiError = ApiError::NotFound("song not found");

pub fn list_artist_songs(
    catalog: &mut Catalog,
    params: &RouteParams<'_>,
    _body: &RequestBody,
) -> Result<Reply, ApiError> {
    let artist_id = existing_artist(catalog, params)?;
    Reply::ok(&catalog.songs_by_artist(artist_id))
}

pub fn list_album_songs(
    catalog: &mut Catalog,
    params: &RouteParams<'_>,
    _body: &RequestBody,
) -> Result<Reply, ApiError> {
    let album_id = existing_album(catalog, params)?;
    Reply::ok(&catalog.songs_by_album(album_id))
}

pub fn list_track_number_songs(
    catalog: &mut Catalog,
    params: &RouteParams<'_>,
    _body: &RequestBody,
) -> Result<Reply, ApiError> {
    let songs = match params.number() {
        Some(track_number) => catalog.songs_by_track_number(track_number),
        None => Vec::new(),
    };
    Reply::ok(&songs)
}

pub fn get_song(
    catalog: &mut Catalog,
    params: &RouteParams<'_>,
    _body: &RequestBody,
) -> Result<Reply, ApiError> {
    let song = params
        .id()
        .and_then(|song_id| catalog.song(song_id))
        .ok_or(SONG_NOT_FOUND)?;
    Reply::ok(song)
}

pub fn create_song(
    catalog: &mut Catalog,
    params: &RouteParams<'_>,
    body: &RequestBody,
) -> Result<Reply, ApiError> {
    let album_id = existing_album(catalog, params)?;
    let name = required_text(body, "name")?;
    let track_number = body.number("trackNumber").ok_or_else(|| {
        ApiError::ValidationFailed("trackNumber is required and must be a number".to_string())
    })?;
    let lyrics = body.text("lyrics").unwrap_or_default();
    let song = catalog
        .create_song(album_id, name, lyrics, track_number)
        .ok_or(ApiError::NotFound("album not found"))?;
    info!("Created song {} on album {}", song.song_id, album_id);
    Reply::created(&song)
}

pub fn update_song(
    catalog: &mut Catalog,
    params: &RouteParams<'_>,
    body: &RequestBody,
) -> Result<Reply, ApiError> {
    let song_id = existing_song(catalog, params)?;
    let track_number = match body.number("trackNumber") {
        Some(track_number) => Some(track_number),
        None if body.has("trackNumber") => {
            return Err(ApiError::ValidationFailed(
                "trackNumber must be a number".to_string(),
            ))
        }
        None => None,
    };
    let patch = SongPatch {
        name: body.text("name"),
        lyrics: body.text("lyrics"),
        track_number,
    };
    let song = catalog.update_song(song_id, patch).ok_or(SONG_NOT_FOUND)?;
    Reply::ok(&song)
}

pub fn delete_song(
    catalog: &mut Catalog,
    params: &RouteParams<'_>,
    _body: &RequestBody,
) -> Result<Reply, ApiError> {
    let song_id = existing_song(catalog, params)?;
    catalog.remove_song(song_id);
    info!("Deleted song {}", song_id);
    Reply::deleted()
}

fn existing_song(catalog: &Catalog, params: &RouteParams<'_>) -> Result<u64, ApiError> {
    params
        .id()
        .filter(|song_id| catalog.song(*song_id).is_some())
        .ok_or(SONG_NOT_FOUND)
}
