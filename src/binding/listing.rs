//! Collection responses as a tagged union
//!
//! List endpoints answer either a page wrapper (`{content: [...], totalPages}`)
//! or a bare array; anything else counts as no items. Items that do not
//! decode make the whole answer an error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{PesoError, Result};
use crate::util::DEFAULT_PAGE_SIZE;

/// Which slice of a collection to ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }
}

impl Default for PageRequest {
    /// First page, large enough to hold everything
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Page wrapper as produced by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_elements: Option<u64>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
}

/// A collection response, whatever shape it arrived in
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Page(Page<T>),
    Items(Vec<T>),
    Empty,
}

impl<T> Listing<T> {
    /// The items; `Empty` yields an empty list
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Page(page) => page.content,
            Listing::Items(items) => items,
            Listing::Empty => Vec::new(),
        }
    }

    /// Page metadata, when the response was a page wrapper
    pub fn page(&self) -> Option<&Page<T>> {
        match self {
            Listing::Page(page) => Some(page),
            _ => None,
        }
    }
}

impl<T> From<Vec<T>> for Listing<T> {
    fn from(items: Vec<T>) -> Self {
        Listing::Items(items)
    }
}

impl<T> From<Page<T>> for Listing<T> {
    fn from(page: Page<T>) -> Self {
        Listing::Page(page)
    }
}

impl<T> From<Option<Vec<T>>> for Listing<T> {
    fn from(items: Option<Vec<T>>) -> Self {
        items.map_or(Listing::Empty, Listing::Items)
    }
}

impl<T: DeserializeOwned> Listing<T> {
    /// Decode a raw collection answer.
    ///
    /// An array is a plain list; an object whose `content` is an array is a
    /// page wrapper. Any other shape (null, scalars, objects without list
    /// `content`) is `Empty`. A list whose items do not decode as `T` is an
    /// error, never an empty list.
    pub fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(Listing::Items(decode_items(items)?)),
            Value::Object(mut map) => match map.remove("content") {
                Some(Value::Array(items)) => Ok(Listing::Page(Page {
                    content: decode_items(items)?,
                    total_pages: page_field(&map, "totalPages"),
                    total_elements: page_field(&map, "totalElements"),
                    number: page_field(&map, "number"),
                    size: page_field(&map, "size"),
                })),
                Some(other) => {
                    debug!(content = %other, "Page wrapper without list content");
                    Ok(Listing::Empty)
                }
                None => Ok(Listing::Empty),
            },
            _ => Ok(Listing::Empty),
        }
    }
}

fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>> {
    serde_json::from_value(Value::Array(items)).map_err(PesoError::from)
}

/// Page metadata is informational; a malformed field is dropped
fn page_field<N: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<N> {
    map.get(key)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
}

/// Anything a collection call may answer
pub trait IntoListing<T> {
    fn into_listing(self) -> Result<Listing<T>>;
}

impl<T: DeserializeOwned> IntoListing<T> for Value {
    fn into_listing(self) -> Result<Listing<T>> {
        Listing::try_from_value(self)
    }
}

impl<T> IntoListing<T> for Listing<T> {
    fn into_listing(self) -> Result<Listing<T>> {
        Ok(self)
    }
}

impl<T> IntoListing<T> for Vec<T> {
    fn into_listing(self) -> Result<Listing<T>> {
        Ok(self.into())
    }
}

impl<T> IntoListing<T> for Page<T> {
    fn into_listing(self) -> Result<Listing<T>> {
        Ok(self.into())
    }
}

impl<T> IntoListing<T> for Option<Vec<T>> {
    fn into_listing(self) -> Result<Listing<T>> {
        Ok(self.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Job {
        id: i64,
        title: String,
    }

    fn decode(value: Value) -> Listing<Value> {
        Listing::try_from_value(value).unwrap()
    }

    #[test]
    fn page_wrapper_is_unwrapped() {
        let listing = decode(json!({"content": [{"id": 1}, {"id": 2}], "totalPages": 1}));

        assert_eq!(listing.page().and_then(|p| p.total_pages), Some(1));
        assert_eq!(listing.into_vec(), vec![json!({"id": 1}), json!({"id": 2})]);
    }

    #[test]
    fn malformed_page_metadata_keeps_content() {
        let listing = decode(json!({"content": [{"id": 1}], "totalPages": "many"}));

        assert_eq!(listing.page().and_then(|p| p.total_pages), None);
        assert_eq!(listing.into_vec(), vec![json!({"id": 1})]);
    }

    #[test]
    fn bare_array_is_used_directly() {
        let listing = decode(json!([{"id": 3}]));
        assert!(listing.page().is_none());
        assert_eq!(listing.into_vec(), vec![json!({"id": 3})]);
    }

    #[test]
    fn non_list_values_are_empty() {
        for value in [
            Value::Null,
            json!({"id": 1}),
            json!("text"),
            json!(42),
            json!({"content": null}),
            json!({"content": "nope"}),
        ] {
            assert_eq!(decode(value), Listing::Empty);
        }
    }

    #[test]
    fn typed_items_decode() {
        let listing: Listing<Job> =
            Listing::try_from_value(json!({"content": [{"id": 4, "title": "Cook"}]})).unwrap();
        assert_eq!(
            listing.into_vec(),
            vec![Job {
                id: 4,
                title: "Cook".to_string()
            }]
        );
    }

    #[test]
    fn undecodable_item_is_an_error_not_empty() {
        let page = json!({"content": [{"id": 1, "title": "Welder"}, {"id": 2}], "totalPages": 1});
        let err = Listing::<Job>::try_from_value(page).unwrap_err();
        assert!(matches!(err, PesoError::Json(_)));

        let bare = json!([{"id": "one", "title": "Welder"}]);
        assert!(Listing::<Job>::try_from_value(bare).is_err());
    }

    #[test]
    fn plain_vectors_convert_infallibly() {
        let listing = vec![1, 2].into_listing().unwrap();
        assert_eq!(listing, Listing::Items(vec![1, 2]));
        assert_eq!(None::<Vec<u8>>.into_listing().unwrap(), Listing::Empty);
    }

    #[test]
    fn default_page_request_fetches_everything() {
        assert_eq!(PageRequest::default(), PageRequest::new(0, 1000));
    }
}
