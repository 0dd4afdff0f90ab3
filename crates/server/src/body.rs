use serde_json::{Map, Value};

const JSON_MEDIA_TYPE: &str = "application/json";
const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestBody {
    fields: Map<String, Value>,
}

#[derive(Debug)]
pub enum BodyError {
    Json(serde_json::Error),
    NotAnObject,
    Form(serde_urlencoded::de::Error),
}

impl std::fmt::Display for BodyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BodyError::Json(err) => write!(f, "invalid json body: {}", err),
            BodyError::NotAnObject => write!(f, "json body must be an object"),
            BodyError::Form(err) => write!(f, "invalid form body: {}", err),
        }
    }
}

impl std::error::Error for BodyError {}

impl From<serde_json::Error> for BodyError {
    fn from(err: serde_json::Error) -> Self {
        BodyError::Json(err)
    }
}

impl From<serde_urlencoded::de::Error> for BodyError {
    fn from(err: serde_urlencoded::de::Error) -> Self {
        BodyError::Form(err)
    }
}

pub fn parse_body(content_type: Option<&str>, bytes: &[u8]) -> Result<RequestBody, BodyError> {
    if bytes.iter().all(|byte| byte.is_ascii_whitespace()) {
        return Ok(RequestBody::default());
    }
    let media_type = content_type
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match media_type.as_str() {
        JSON_MEDIA_TYPE => match serde_json::from_slice::<Value>(bytes)? {
            Value::Object(fields) => Ok(RequestBody { fields }),
            _ => Err(BodyError::NotAnObject),
        },
        FORM_MEDIA_TYPE => {
            let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(bytes)?;
            let mut fields = Map::new();
            for (key, value) in pairs {
                fields.insert(key, Value::String(value));
            }
            Ok(RequestBody { fields })
        }
        _ => Ok(RequestBody::default()),
    }
}

impl RequestBody {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has(&self, key: &str) -> bool {
        match self.fields.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(value)) => !value.is_empty(),
            Some(_) => true,
        }
    }

    pub fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(value) if !value.is_empty() => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            _ => None,
        }
    }

    pub fn number(&self, key: &str) -> Option<i64> {
        match self.fields.get(key)? {
            Value::Number(value) => value.as_i64().or_else(|| {
                value
                    .as_f64()
                    .filter(|float| float.fract() == 0.0)
                    .filter(|float| *float >= i64::MIN as f64 && *float < i64::MAX as f64)
                    .map(|float| float as i64)
            }),
            Value::String(value) => value.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for RequestBody {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
