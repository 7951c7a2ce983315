use std::{
    fmt,
    sync::{
        OnceLock,
        atomic::{AtomicU32, Ordering},
    },
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::movie;

/// Hex digits in a record identifier (12 bytes).
const ID_LEN: usize = 24;

/// Store-assigned record identifier in the object-id shape: a 4-byte seconds
/// timestamp, a 5-byte per-process value and a 3-byte counter, hex encoded.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    pub fn generate() -> Self {
        static COUNTER: AtomicU32 = AtomicU32::new(0);

        let secs = jiff::Timestamp::now().as_second() as u32;
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;
        Self(format!("{secs:08x}{:010x}{count:06x}", process_unique()))
    }

    /// Returns `None` unless `raw` is exactly 24 hex digits.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::is_valid(raw).then(|| Self(raw.to_ascii_lowercase()))
    }

    pub fn is_valid(raw: &str) -> bool {
        raw.len() == ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn process_unique() -> u64 {
    static VALUE: OnceLock<u64> = OnceLock::new();
    *VALUE.get_or_init(|| {
        let nanos = jiff::Timestamp::now().subsec_nanosecond() as u64;
        ((u64::from(std::process::id()) << 24) ^ nanos) & 0xff_ffff_ffff
    })
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub poster: Option<String>,
    pub released: Option<String>,
    pub metascore: Option<f64>,
}

impl From<movie::Model> for Movie {
    fn from(row: movie::Model) -> Self {
        Self {
            id: MovieId(row.id),
            title: row.title,
            poster: row.poster,
            released: row.released,
            metascore: row.metascore,
        }
    }
}

/// The four mutable fields. An update replaces all of them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieFields {
    pub title: String,
    pub poster: Option<String>,
    pub released: Option<String>,
    pub metascore: Option<f64>,
}

impl MovieFields {
    pub fn into_movie(self, id: MovieId) -> Movie {
        Movie {
            id,
            title: self.title,
            poster: self.poster,
            released: self.released,
            metascore: self.metascore,
        }
    }
}

/// Raw add/edit submission, as decoded from a form or JSON body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MovieInput {
    pub title: Option<String>,
    pub poster: Option<String>,
    pub released: Option<Scalar>,
    pub metascore: Option<Scalar>,
}

/// Form bodies carry every value as text; JSON bodies may send numbers.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    fn into_text(self) -> Option<String> {
        match self {
            Scalar::Int(n) => Some(n.to_string()),
            Scalar::Float(f) => Some(f.to_string()),
            Scalar::Text(s) => non_blank(Some(s)),
        }
    }
}

/// Why a submission could not be turned into movie fields.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("Title is required.")]
    MissingTitle,

    #[error("Metascore must be a number.")]
    Metascore,

    #[error("{0}")]
    Body(String),
}

impl MovieInput {
    pub fn into_fields(self) -> Result<MovieFields, InputError> {
        let title = non_blank(self.title).ok_or(InputError::MissingTitle)?;

        let metascore = match self.metascore {
            None => None,
            Some(Scalar::Int(n)) => Some(n as f64),
            Some(Scalar::Float(f)) if f.is_finite() => Some(f),
            Some(Scalar::Float(_)) => return Err(InputError::Metascore),
            Some(Scalar::Text(s)) => match s.trim() {
                "" => None,
                s => match s.parse::<f64>() {
                    Ok(f) if f.is_finite() => Some(f),
                    _ => return Err(InputError::Metascore),
                },
            },
        };

        Ok(MovieFields {
            title,
            poster: non_blank(self.poster),
            released: self.released.and_then(Scalar::into_text),
            metascore,
        })
    }
}

/// Blank text is stored as absent; anything else is kept as submitted.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
