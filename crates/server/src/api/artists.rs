use library::Catalog;
use tracing::info;

use crate::body::RequestBody;
use crate::routes::RouteParams;

use super::{required_text, ApiError, Reply};

const ARTIST_NOT_FOUND: ApiError = ApiError::NotFound("artist not found");

pub fn list_artists(
    catalog: &mut Catalog,
    _params: &RouteParams<'_>,
    _body: &RequestBody,
) -> Result<Reply, ApiError> {
    Reply::ok(&catalog.list_artists())
}

pub fn get_artist(
    catalog: &mut Catalog,
    params: &RouteParams<'_>,
    _body: &RequestBody,
) -> Result<Reply, ApiError> {
    let artist = params
        .id()
        .and_then(|artist_id| catalog.artist_with_albums(artist_id))
        .ok_or(ARTIST_NOT_FOUND)?;
    Reply::ok(&artist)
}

pub fn create_artist(
    catalog: &mut Catalog,
    _params: &RouteParams<'_>,
    body: &RequestBody,
) -> Result<Reply, ApiError> {
    let name = required_text(body, "name")?;
    let artist = catalog.create_artist(name);
    info!("Created artist {}", artist.artist_id);
    Reply::created(&artist)
}

pub fn update_artist(
    catalog: &mut Catalog,
    params: &RouteParams<'_>,
    body: &RequestBody,
) -> Result<Reply, ApiError> {
    let artist_id = existing_artist(catalog, params)?;
    let name = required_text(body, "name")?;
    let artist = catalog
        .rename_artist(artist_id, name)
        .ok_or(ARTIST_NOT_FOUND)?;
    Reply::ok(&artist)
}

pub fn delete_artist(
    catalog: &mut Catalog,
    params: &RouteParams<'_>,
    _body: &RequestBody,
) -> Result<Reply, ApiError> {
    let artist_id = existing_artist(catalog, params)?;
    catalog.remove_artist(artist_id);
    info!("Deleted artist {}", artist_id);
    Reply::deleted()
}

pub(crate) fn existing_artist(
    catalog: &Catalog,
    params: &RouteParams<'_>,
) -> Result<u64, ApiError> {
    params
        .id()
        .filter(|artist_id| catalog.artist(*artist_id).is_some())
        .ok_or(ARTIST_NOT_FOUND)
}
