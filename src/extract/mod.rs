//! Best-effort field extraction from loosely shaped API payloads.
//!
//! The upstream response shape differs between hosts and model providers, so
//! identifiers and video URLs are located by walking literal, ordered tables of
//! candidate paths. The first candidate that passes its validator wins; the order
//! of the tables decides which field is used when a payload carries several.

use serde_json::Value;

/// Location of a candidate value inside a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    /// `payload[field]`
    Top(&'static str),
    /// `payload[container][field]`, container must be an object
    Nested(&'static str, &'static str),
    /// `payload[array][0][field]`, array must be non-empty
    FirstOf(&'static str, &'static str),
}

impl FieldPath {
    pub fn resolve<'a>(&self, payload: &'a Value) -> Option<&'a Value> {
        match *self {
            FieldPath::Top(field) => payload.get(field),
            FieldPath::Nested(container, field) => payload
                .get(container)
                .filter(|c| c.is_object())
                .and_then(|c| c.get(field)),
            FieldPath::FirstOf(array, field) => payload
                .get(array)
                .and_then(Value::as_array)
                .and_then(|items| items.first())
                .filter(|item| item.is_object())
                .and_then(|item| item.get(field)),
        }
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldPath::Top(field) => write!(f, "{}", field),
            FieldPath::Nested(container, field) => write!(f, "{}.{}", container, field),
            FieldPath::FirstOf(array, field) => write!(f, "{}[0].{}", array, field),
        }
    }
}

/// Where a submit response may carry the task identifier, in priority order.
pub const TASK_ID_PATHS: &[FieldPath] = &[
    FieldPath::Top("id"),
    FieldPath::Top("task_id"),
    FieldPath::Nested("data", "id"),
    FieldPath::Nested("data", "task_id"),
    FieldPath::Nested("data", "taskId"),
];

/// Field names that may hold a video URL, in priority order.
pub const URL_FIELDS: &[&str] = &[
    "video_url",
    "videoUrl",
    "url",
    "video",
    "output_url",
    "outputUrl",
    "file_url",
    "fileUrl",
    "video_path",
    "download_url",
    "downloadUrl",
    "media_url",
    "mediaUrl",
];

/// Object-valued keys searched after the top level.
pub const NESTED_CONTAINERS: &[&str] = &["data", "result", "output", "file", "response"];

/// Array-valued keys whose first element is searched last.
pub const ARRAY_CONTAINERS: &[&str] = &["results", "files", "videos", "data"];

/// Acceptance rule for a video URL candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlValidity {
    /// Any string that is non-empty after trimming; the trimmed value is returned.
    Loose,
    /// A string starting with the `http` scheme prefix; returned unchanged.
    Strict,
}

impl UrlValidity {
    pub fn accept(self, candidate: &Value) -> Option<String> {
        let s = candidate.as_str()?;
        match self {
            UrlValidity::Loose => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            UrlValidity::Strict => s.starts_with("http").then(|| s.to_string()),
        }
    }
}

/// Every URL candidate path: top level, then nested containers, then first array items.
pub fn video_url_paths() -> impl Iterator<Item = FieldPath> {
    let top = URL_FIELDS.iter().copied().map(FieldPath::Top);
    let nested = NESTED_CONTAINERS.iter().copied().flat_map(|c| {
        URL_FIELDS
            .iter()
            .copied()
            .map(move |f| FieldPath::Nested(c, f))
    });
    let arrays = ARRAY_CONTAINERS.iter().copied().flat_map(|a| {
        URL_FIELDS
            .iter()
            .copied()
            .map(move |f| FieldPath::FirstOf(a, f))
    });
    top.chain(nested).chain(arrays)
}

/// Locate the task identifier in a submit response.
///
/// Non-empty strings are taken as-is; non-zero integers are rendered to text.
pub fn find_task_id(payload: &Value) -> Option<String> {
    TASK_ID_PATHS.iter().find_map(|path| {
        path.resolve(payload).and_then(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            _ => None,
        })
    })
}

/// Locate a playable video URL, returning the matched path alongside it.
pub fn locate_video_url(payload: &Value, validity: UrlValidity) -> Option<(FieldPath, String)> {
    video_url_paths().find_map(|path| {
        path.resolve(payload)
            .and_then(|v| validity.accept(v))
            .map(|url| (path, url))
    })
}

/// Locate a playable video URL.
pub fn find_video_url(payload: &Value, validity: UrlValidity) -> Option<String> {
    locate_video_url(payload, validity).map(|(_, url)| url)
}

/// First field among `fields` holding a non-empty string.
pub fn first_text(payload: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|f| {
        payload
            .get(*f)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}
