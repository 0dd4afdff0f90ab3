use axum::http::Method;
use library::Catalog;
use tracing::debug;

use crate::api::{albums, artists, songs, ApiError, Reply};
use crate::body::RequestBody;

pub type Handler = fn(&mut Catalog, &RouteParams<'_>, &RequestBody) -> Result<Reply, ApiError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteMethod {
    Get,
    Post,
    Update,
    Delete,
}

impl RouteMethod {
    pub fn from_http(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Self::Get),
            Method::POST => Some(Self::Post),
            Method::PUT | Method::PATCH => Some(Self::Update),
            Method::DELETE => Some(Self::Delete),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum PathShape {
    Collection(&'static str),
    Item(&'static str),
    Nested(&'static str, &'static str),
    // at least one segment after the parameter
    Prefixed(&'static str),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteParams<'a> {
    pub param: Option<&'a str>,
}

impl<'a> RouteParams<'a> {
    // Only canonical decimal ids: "01" and "+1" match no record.
    pub fn id(&self) -> Option<u64> {
        let param = self.param?;
        let canonical = !param.is_empty()
            && param.bytes().all(|byte| byte.is_ascii_digit())
            && (param == "0" || !param.starts_with('0'));
        if canonical {
            param.parse().ok()
        } else {
            None
        }
    }

    pub fn number(&self) -> Option<i64> {
        self.param?.parse().ok()
    }
}

impl PathShape {
    pub fn matches<'a>(&self, segments: &[&'a str]) -> Option<RouteParams<'a>> {
        match (*self, segments) {
            (PathShape::Collection(prefix), [first]) if *first == prefix => {
                Some(RouteParams::default())
            }
            (PathShape::Item(prefix), [first, param]) if *first == prefix => Some(RouteParams {
                param: Some(*param),
            }),
            (PathShape::Nested(prefix, suffix), [first, param, last])
                if *first == prefix && *last == suffix =>
            {
                Some(RouteParams {
                    param: Some(*param),
                })
            }
            (PathShape::Prefixed(prefix), [first, param, _, ..]) if *first == prefix => {
                Some(RouteParams {
                    param: Some(*param),
                })
            }
            _ => None,
        }
    }
}

pub struct RouteRule {
    pub name: &'static str,
    pub method: RouteMethod,
    pub shape: PathShape,
    pub handler: Handler,
}

pub const ROUTES: &[RouteRule] = &[
    RouteRule {
        name: "list_artists",
        method: RouteMethod::Get,
        shape: PathShape::Collection("artists"),
        handler: artists::list_artists,
    },
    RouteRule {
        name: "get_artist",
        method: RouteMethod::Get,
        shape: PathShape::Item("artists"),
        handler: artists::get_artist,
    },
    RouteRule {
        name: "create_artist",
        method: RouteMethod::Post,
        shape: PathShape::Collection("artists"),
        handler: artists::create_artist,
    },
    RouteRule {
        name: "update_artist",
        method: RouteMethod::Update,
        shape: PathShape::Item("artists"),
        handler: artists::update_artist,
    },
    RouteRule {
        name: "delete_artist",
        method: RouteMethod::Delete,
        shape: PathShape::Item("artists"),
        handler: artists::delete_artist,
    },
    RouteRule {
        name: "list_artist_albums",
        method: RouteMethod::Get,
        shape: PathShape::Nested("artists", "albums"),
        handler: albums::list_artist_albums,
    },
    RouteRule {
        name: "get_album",
        method: RouteMethod::Get,
        shape: PathShape::Item("albums"),
        handler: albums::get_album,
    },
    RouteRule {
        name: "create_album",
        method: RouteMethod::Post,
        shape: PathShape::Nested("artists", "albums"),
        handler: albums::create_album,
    },
    RouteRule {
        name: "update_album",
        method: RouteMethod::Update,
        shape: PathShape::Item("albums"),
        handler: albums::update_album,
    },
    RouteRule {
        name: "delete_album",
        method: RouteMethod::Delete,
        shape: PathShape::Item("albums"),
        handler: albums::delete_album,
    },
    RouteRule {
        name: "list_artist_songs",
        method: RouteMethod::Get,
        shape: PathShape::Nested("artists", "songs"),
        handler: songs::list_artist_songs,
    },
    RouteRule {
        name: "list_album_songs",
        method: RouteMethod::Get,
        shape: PathShape::Nested("albums", "songs"),
        handler: songs::list_album_songs,
    },
    RouteRule {
        name: "list_track_number_songs",
        method: RouteMethod::Get,
        shape: PathShape::Prefixed("trackNumbers"),
        handler: songs::list_track_number_songs,
    },
    RouteRule {
        name: "get_song",
        method: RouteMethod::Get,
        shape: PathShape::Item("songs"),
        handler: songs::get_song,
    },
    RouteRule {
        name: "create_song",
        method: RouteMethod::Post,
        shape: PathShape::Nested("albums", "songs"),
        handler: songs::create_song,
    },
    RouteRule {
        name: "update_song",
        method: RouteMethod::Update,
        shape: PathShape::Item("songs"),
        handler: songs::update_song,
    },
    RouteRule {
        name: "delete_song",
        method: RouteMethod::Delete,
        shape: PathShape::Item("songs"),
        handler: songs::delete_song,
    },
];

pub fn split_path(path: &str) -> Vec<&str> {
    let path = path.split('?').next().unwrap_or("");
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

// First match owns the request; its outcome is final.
pub fn dispatch(
    catalog: &mut Catalog,
    method: &Method,
    path: &str,
    body: &RequestBody,
) -> Result<Reply, ApiError> {
    let method = RouteMethod::from_http(method).ok_or(ApiError::NoRouteMatched)?;
    let segments = split_path(path);
    for rule in ROUTES {
        if rule.method != method {
            continue;
        }
        if let Some(params) = rule.shape.matches(&segments) {
            debug!(route = rule.name, "Route matched");
            return (rule.handler)(catalog, &params, body);
        }
    }
    Err(ApiError::NoRouteMatched)
}
