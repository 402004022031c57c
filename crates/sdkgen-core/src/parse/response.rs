use indexmap::IndexMap;
use serde::Deserialize;

use super::media_type::{MediaType, find_media};
use super::reference::RefOr;

/// A response; only its content map matters to extraction.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

impl Response {
    pub fn media(&self, expected: &str) -> Option<&MediaType> {
        find_media(&self.content, expected)
    }
}

pub type ResponseOrRef = RefOr<Response>;
