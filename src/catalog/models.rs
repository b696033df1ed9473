use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Reviews on a single book, keyed by username, in the order they were first written
pub type Reviews = IndexMap<String, String>;

/// A book in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier for the book
    pub isbn: String,
    /// Title of the book, as stored
    pub title: String,
    /// Author of the book, as stored
    pub author: String,
    /// At most one review per user
    #[serde(default)]
    pub reviews: Reviews,
}

impl Book {
    pub fn new(isbn: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            reviews: Reviews::new(),
        }
    }
}

/// A registered user. The password is kept as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
}

/// Username/password pair submitted to register or log in.
///
/// Both fields are optional so an incomplete body reaches validation
/// instead of failing deserialization. Each field is read on its own:
/// any JSON value is accepted and falsy ones count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default, deserialize_with = "truthy_text")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "truthy_text")]
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}

/// A review submitted for a book.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewDraft {
    #[serde(default, deserialize_with = "truthy_text")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "truthy_text")]
    pub review: Option<String>,
}

impl ReviewDraft {
    pub fn new(username: impl Into<String>, review: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            review: Some(review.into()),
        }
    }
}

/// Read a body field of any JSON type as text.
///
/// `null`, `false`, `0` and `""` are absent. Strings are kept as sent;
/// other values use their JSON rendering, so `12345` becomes `"12345"`.
fn truthy_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(text_if_truthy))
}

fn text_if_truthy(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) => (!text.is_empty()).then_some(text),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
