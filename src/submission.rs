//! Turns an inbound rating submission into a [`NewRating`].
//!
//! A submission can arrive as form fields or as a JSON object in the body.
//! Each encoding has its own [`SubmissionDecoder`]; they are tried in
//! [`DECODERS`] order and the first one that yields a beer name wins. Field
//! names match case-insensitively in both encodings.
//!
//! The rating only has to parse as an `i32`. Values outside 1–4 are stored
//! as given.

use axum::body::Bytes;
use serde_json::Value;

use crate::{errors::AppError, models::NewRating};

const BEER_NAME: &str = "beerName";
const STYLE: &str = "style";
const NOTES: &str = "notes";
const RATING: &str = "rating";

/// Transport-neutral view of a submit request.
///
/// `form` holds decoded form fields in arrival order (empty when the request
/// carried no form), `body` the raw request body.
#[derive(Debug, Default, Clone)]
pub struct RawSubmission {
    pub form: Vec<(String, String)>,
    pub body: Bytes,
}

impl RawSubmission {
    pub fn from_form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            form: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            body: Bytes::new(),
        }
    }

    pub fn from_body(body: impl Into<Bytes>) -> Self {
        Self {
            form: Vec::new(),
            body: body.into(),
        }
    }
}

/// The four logical fields of a submission, still as text.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubmissionFields {
    pub beer_name: Option<String>,
    pub style: Option<String>,
    pub notes: Option<String>,
    pub rating: Option<String>,
}

impl SubmissionFields {
    fn has_beer_name(&self) -> bool {
        self.beer_name
            .as_deref()
            .is_some_and(|name| !name.is_empty())
    }
}

pub trait SubmissionDecoder: Sync {
    fn name(&self) -> &'static str;

    /// `None` when this encoding is not present in the request at all.
    fn decode(&self, raw: &RawSubmission) -> Option<SubmissionFields>;
}

pub struct FormDecoder;

impl SubmissionDecoder for FormDecoder {
    fn name(&self) -> &'static str {
        "form"
    }

    fn decode(&self, raw: &RawSubmission) -> Option<SubmissionFields> {
        if raw.form.is_empty() {
            return None;
        }

        let field = |key: &str| {
            raw.form
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.clone())
        };

        Some(SubmissionFields {
            beer_name: field(BEER_NAME),
            style: field(STYLE),
            notes: field(NOTES),
            rating: field(RATING),
        })
    }
}

pub struct JsonDecoder;

impl SubmissionDecoder for JsonDecoder {
    fn name(&self) -> &'static str {
        "json"
    }

    fn decode(&self, raw: &RawSubmission) -> Option<SubmissionFields> {
        if raw.body.is_empty() {
            return None;
        }

        let value: Value = match serde_json::from_slice(&raw.body) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("Submission body is not JSON: {}", e);
                return None;
            }
        };
        let object = value.as_object()?;

        let field = |key: &str| {
            object
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        };
        let text = |key: &str| field(key).and_then(Value::as_str).map(str::to_string);

        // Numbers keep their JSON spelling so 4.5 fails the integer parse below.
        let rating = field(RATING).and_then(|v| match v {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        });

        Some(SubmissionFields {
            beer_name: text(BEER_NAME),
            style: text(STYLE),
            notes: text(NOTES),
            rating,
        })
    }
}

pub const DECODERS: [&dyn SubmissionDecoder; 2] = [&FormDecoder, &JsonDecoder];

/// Pick the first encoding that carries a beer name.
pub fn decode(raw: &RawSubmission) -> SubmissionFields {
    DECODERS
        .iter()
        .find_map(|decoder| {
            let fields = decoder.decode(raw).filter(SubmissionFields::has_beer_name)?;
            tracing::debug!("Submission decoded as {}", decoder.name());
            Some(fields)
        })
        .unwrap_or_default()
}

pub fn validate(fields: SubmissionFields) -> Result<NewRating, AppError> {
    let SubmissionFields {
        beer_name,
        style,
        notes,
        rating,
    } = fields;

    let beer_name = match beer_name {
        Some(name) if !name.is_empty() => name,
        _ => {
            tracing::warn!("Invalid data received: missing beer name (rating={:?})", rating);
            return Err(AppError::InvalidSubmission(
                "Invalid data - missing beer name".into(),
            ));
        }
    };

    let rating_text = match rating {
        Some(text) if !text.trim().is_empty() => text,
        _ => {
            tracing::warn!("Invalid data received: BeerName={}, missing rating", beer_name);
            return Err(AppError::InvalidSubmission(
                "Invalid data - missing rating".into(),
            ));
        }
    };

    let rating = rating_text.trim().parse::<i32>().map_err(|_| {
        tracing::warn!(
            "Invalid data received: BeerName={}, Rating={}",
            beer_name,
            rating_text
        );
        AppError::InvalidSubmission(format!(
            "Invalid data - rating must be a whole number, got '{}'",
            rating_text
        ))
    })?;

    Ok(NewRating {
        beer_name,
        brewery: notes.unwrap_or_default(),
        style: style.unwrap_or_default(),
        rating,
    })
}

pub fn normalize(raw: &RawSubmission) -> Result<NewRating, AppError> {
    validate(decode(raw))
}
