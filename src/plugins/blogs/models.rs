use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::plugins::authors::models::Author;

/// A blog document. `A` is the shape of the author reference: the bare id as
/// stored, or the full [`Author`] once it has been resolved.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Blog<A = Uuid> {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub author: Option<A>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub headline: Option<String>,
    pub picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type PopulatedBlog = Blog<Author>;

impl Blog {
    pub fn new(input: BlogCreate, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: input.author,
            title: input.title,
            content: input.content,
            headline: input.headline,
            picture: input.picture,
            created_at: now,
            updated_at: now,
        }
    }
}

impl<A> Blog<A> {
    /// Swaps the author reference, keeping every other field.
    pub fn with_author<B>(self, author: Option<B>) -> Blog<B> {
        Blog {
            id: self.id,
            author,
            title: self.title,
            content: self.content,
            headline: self.headline,
            picture: self.picture,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct BlogCreate {
    #[serde(default)]
    pub author: Option<Uuid>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Partial update. Absent keys leave the stored value untouched, an explicit
/// `null` clears it; unknown keys (including `_id`) are ignored.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct BlogUpdate {
    #[serde(default, deserialize_with = "present")]
    pub author: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub content: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub headline: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub picture: Option<Option<String>>,
}

/// Marks a key as present, keeping `null` distinct from a missing key.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl BlogUpdate {
    /// Reads the raw request body. An empty body is an empty update; anything
    /// other than an object is refused.
    pub fn from_body(body: Value) -> Result<Self, String> {
        match body {
            Value::Null => Ok(BlogUpdate::default()),
            Value::Object(_) => serde_json::from_value(body).map_err(|e| e.to_string()),
            other => Err(format!("update must be an object, got {}", json_kind(&other))),
        }
    }

    pub fn apply_to(self, blog: &mut Blog) {
        if let Some(author) = self.author {
            blog.author = author;
        }
        if let Some(title) = self.title {
            blog.title = title;
        }
        if let Some(content) = self.content {
            blog.content = content;
        }
        if let Some(headline) = self.headline {
            blog.headline = headline;
        }
        if let Some(picture) = self.picture {
            blog.picture = picture;
        }
    }
}

/// Partial-match filter over the stored document: every top-level key must be
/// equal to the document's value for that key. An empty filter matches all.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(transparent)]
pub struct BlogFilter(pub Map<String, Value>);

impl BlogFilter {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Rejects query operators (`$in`, `$where`, ..). Only literal equality is supported.
    pub fn operators(&self) -> Option<String> {
        fn find(map: &Map<String, Value>) -> Option<String> {
            for (key, value) in map {
                if key.starts_with('$') {
                    return Some(key.clone());
                }
                if let Value::Object(inner) = value {
                    if let Some(op) = find(inner) {
                        return Some(op);
                    }
                }
            }
            None
        }
        find(&self.0)
    }

    /// Equality check against a serialized document. A `null` in the filter
    /// also matches a missing key.
    pub fn matches(&self, doc: &Value) -> bool {
        self.0.iter().all(|(key, expected)| match doc.get(key) {
            Some(actual) => actual == expected,
            None => expected.is_null(),
        })
    }
}

impl TryFrom<Value> for BlogFilter {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(BlogFilter(map)),
            Value::Null => Ok(BlogFilter::default()),
            other => Err(format!("query filter must be an object, got {}", json_kind(&other))),
        }
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Serialize, Debug)]
pub struct BlogEnvelope<B> {
    pub blog: B,
}

#[derive(Serialize, Debug)]
pub struct BlogList {
    pub count: usize,
    pub blogs: Vec<PopulatedBlog>,
}

impl From<Vec<PopulatedBlog>> for BlogList {
    fn from(blogs: Vec<PopulatedBlog>) -> Self {
        Self { count: blogs.len(), blogs }
    }
}

#[derive(Serialize, Debug)]
pub struct MessageBody {
    pub message: &'static str,
}
