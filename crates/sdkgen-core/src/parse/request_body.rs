use indexmap::IndexMap;
use serde::Deserialize;

use super::media_type::{MediaType, find_media};
use super::reference::RefOr;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
    #[serde(default)]
    pub required: bool,
}

impl RequestBody {
    pub fn media(&self, expected: &str) -> Option<&MediaType> {
        find_media(&self.content, expected)
    }
}

pub type RequestBodyOrRef = RefOr<RequestBody>;
