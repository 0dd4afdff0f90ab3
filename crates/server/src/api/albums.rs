use library::Catalog;
use tracing::info;

use crate::body::RequestBody;
use crate::routes::RouteParams;

use super::artists::existing_artist;
use super::{required_text, ApiError, Reply};

const ALBUM_NOT_FOUND: ApiError = ApiError::NotFound("album not found");

pub fn list_artist_albums(
    catalog: &mut Catalog,
    params: &RouteParams<'_>,
    _body: &RequestBody,
) -> Result<Reply, ApiError> {
    let artist_id = existing_artist(catalog, params)?;
    Reply::ok(&catalog.albums_by_artist(artist_id))
}

pub fn get_album(
    catalog: &mut Catalog,
    params: &RouteParams<'_>,
    _body: &RequestBody,
) -> Result<Reply, ApiError> {
    let album = params
        .id()
        .and_then(|album_id| catalog.album_with_songs(album_id))
        .ok_or(ALBUM_NOT_FOUND)?;
    Reply::ok(&album)
}

pub fn create_album(
    catalog: &mut Catalog,
    params: &RouteParams<'_>,
    body: &RequestBody,
) -> Result<Reply, ApiError> {
    let artist_id = existing_artist(catalog, params)?;
    let name = required_text(body, "name")?;
    let album = catalog
        .create_album(artist_id, name)
        .ok_or(ApiError::NotFound("artist not found"))?;
    info!("Created album {} for artist {}", album.album_id, artist_id);
    Reply::created(&album)
}

pub fn update_album(
    catalog: &mut Catalog,
    params: &RouteParams<'_>,
    body: &RequestBody,
) -> Result<Reply, ApiError> {
    let album_id = existing_album(catalog, params)?;
    let name = required_text(body, "name")?;
    let album = catalog.rename_album(album_id, name).ok_or(ALBUM_NOT_FOUND)?;
    Reply::ok(&album)
}

pub fn delete_album(
    catalog: &mut Catalog,
    params: &RouteParams<'_>,
    _body: &RequestBody,
) -> Result<Reply, ApiError> {
    let album_id = existing_album(catalog, params)?;
    catalog.remove_album(album_id);
    info!("Deleted album {}", album_id);
    Reply::deleted()
}

pub(crate) fn existing_album(
    catalog: &Catalog,
    params: &RouteParams<'_>,
) -> Result<u64, ApiError> {
    params
        .id()
        .filter(|album_id| catalog.album(*album_id).is_some())
        .ok_or(ALBUM_NOT_FOUND)
}
