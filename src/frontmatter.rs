//! Optional YAML metadata at the top of a document.
//!
//! ```text
//! ---
//! tags: [setup, intro]
//! owner: platform-team
//! ---
//! # Setup
//! ```
//!
//! The block is recognized only when the document, after leading whitespace,
//! starts with a line that is exactly `---`. It ends at the next line that is
//! exactly `---`. A block that never closes or doesn't parse as a mapping is
//! dropped with a [`FrontmatterError`]; splitting itself never fails, so one
//! sloppy header can't take down the rest of the corpus.
//!
//! Parsed values are held as [`FrontmatterValue`], a closed sum type, and read
//! through narrow accessors such as [`Frontmatter::tags`] rather than ad-hoc
//! dynamic lookups.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Why a frontmatter block was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontmatterError {
    #[error("unterminated frontmatter block: expected closing '---'")]
    Unterminated,
    #[error("invalid YAML: {0}")]
    Parse(String),
    #[error("frontmatter must be a mapping at the top level")]
    NotAMapping,
}

/// A single structured frontmatter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FrontmatterValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<FrontmatterValue>),
    Mapping(BTreeMap<String, FrontmatterValue>),
}

impl FrontmatterValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FrontmatterValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render a scalar as text. Sequences, mappings and null have no scalar form.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            FrontmatterValue::String(s) => Some(s.clone()),
            FrontmatterValue::Integer(n) => Some(n.to_string()),
            FrontmatterValue::Float(n) => Some(n.to_string()),
            FrontmatterValue::Bool(b) => Some(b.to_string()),
            FrontmatterValue::Null
            | FrontmatterValue::Sequence(_)
            | FrontmatterValue::Mapping(_) => None,
        }
    }
}

impl From<serde_yaml::Value> for FrontmatterValue {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => FrontmatterValue::Null,
            Value::Bool(b) => FrontmatterValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FrontmatterValue::Integer(i),
                None => FrontmatterValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => FrontmatterValue::String(s),
            Value::Sequence(items) => {
                FrontmatterValue::Sequence(items.into_iter().map(Self::from).collect())
            }
            Value::Mapping(map) => FrontmatterValue::Mapping(
                map.into_iter()
                    .map(|(k, v)| (key_text(k), Self::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

fn key_text(key: serde_yaml::Value) -> String {
    match FrontmatterValue::from(key) {
        FrontmatterValue::Null => "null".to_string(),
        other => other
            .scalar_text()
            .unwrap_or_else(|| format!("{other:?}")),
    }
}

/// Parsed frontmatter of one document. Empty when absent or ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Frontmatter {
    fields: BTreeMap<String, FrontmatterValue>,
}

impl Frontmatter {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FrontmatterValue> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FrontmatterValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrontmatterValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The `tags` key as a list of strings, in source order.
    ///
    /// - `tags: [a, b]` → `["a", "b"]`; numeric and boolean items are stringified
    /// - `tags: solo` → `["solo"]`
    /// - missing or any other shape → `[]`
    ///
    /// Duplicates are kept: `tags: [a, a]` yields two entries.
    pub fn tags(&self) -> Vec<String> {
        match self.get("tags") {
            Some(FrontmatterValue::Sequence(items)) => {
                items.iter().filter_map(FrontmatterValue::scalar_text).collect()
            }
            Some(FrontmatterValue::String(tag)) => vec![tag.clone()],
            _ => Vec::new(),
        }
    }
}

/// A document separated into its frontmatter and markdown body.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub frontmatter: Frontmatter,
    pub body: String,
    /// Set when a block was present but had to be ignored.
    pub problem: Option<FrontmatterError>,
}

/// Separate an optional leading `---` block from the markdown body.
///
/// When a closed block is found, the body is everything after the closing
/// delimiter with surrounding whitespace trimmed, whether or not the block
/// parsed. An unterminated block leaves the text untouched.
pub fn split(text: &str) -> Split {
    let trimmed = text.trim();
    let lines: Vec<&str> = trimmed.split('\n').collect();

    let opens = lines.len() > 1 && is_delimiter(lines[0]);
    if !opens {
        return Split {
            frontmatter: Frontmatter::default(),
            body: text.to_string(),
            problem: None,
        };
    }

    let Some(close) = lines.iter().skip(1).position(|l| is_delimiter(l)).map(|i| i + 1) else {
        return Split {
            frontmatter: Frontmatter::default(),
            body: text.to_string(),
            problem: Some(FrontmatterError::Unterminated),
        };
    };

    let block = lines[1..close].join("\n");
    let body = lines[close + 1..].join("\n").trim().to_string();

    match parse_block(&block) {
        Ok(frontmatter) => Split {
            frontmatter,
            body,
            problem: None,
        },
        Err(err) => Split {
            frontmatter: Frontmatter::default(),
            body,
            problem: Some(err),
        },
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim() == "---"
}

fn parse_block(block: &str) -> Result<Frontmatter, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(Frontmatter::default());
    }
    let value: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|err| FrontmatterError::Parse(err.to_string()))?;
    match FrontmatterValue::from(value) {
        FrontmatterValue::Null => Ok(Frontmatter::default()),
        FrontmatterValue::Mapping(fields) => Ok(Frontmatter { fields }),
        _ => Err(FrontmatterError::NotAMapping),
    }
}
