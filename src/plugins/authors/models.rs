use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// An author document. The author schema is owned by whoever writes authors,
/// so everything except the id is kept as an open JSON object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Author {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Author {
    /// Builds an author with a fresh id. A client-supplied `_id` is dropped.
    pub fn new(mut fields: Map<String, Value>) -> Self {
        fields.remove("_id");
        Self { id: Uuid::new_v4(), fields }
    }
}

#[derive(Serialize, Debug)]
pub struct AuthorEnvelope {
    pub author: Author,
}

#[derive(Serialize, Debug)]
pub struct AuthorList {
    pub count: usize,
    pub authors: Vec<Author>,
}
