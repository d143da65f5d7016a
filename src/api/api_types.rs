//! Serde-deserializable types matching the jokes API responses.
//!
//! These types are separate from domain types so the wire schema (which
//! carries fields we never use, like icon urls) stays out of the rest of
//! the app.

use serde::Deserialize;

use super::types::Joke;

/// Response of `GET /jokes/random`.
///
/// Only `id`, `value` and `categories` are documented behavior; everything
/// else the API sends is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiJoke {
  pub id: String,
  pub value: String,
  #[serde(default)]
  pub categories: Vec<String>,
}

impl ApiJoke {
  pub fn into_joke(self) -> Joke {
    Joke {
      id: self.id,
      text: self.value,
      category: self.categories.into_iter().next(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_decode_ignores_extra_fields() {
    let json = r#"{
      "categories": ["animal"],
      "created_at": "2020-01-05 13:42:19.576875",
      "icon_url": "https://api.chucknorris.io/img/avatar/chuck-norris.png",
      "id": "xwjic1sws_yohsfefndaiw",
      "updated_at": "2020-01-05 13:42:19.576875",
      "url": "https://api.chucknorris.io/jokes/xwjic1sws_yohsfefndaiw",
      "value": "Chuck Norris once rode a nine foot grizzly bear through an automatic car wash."
    }"#;

    let api: ApiJoke = serde_json::from_str(json).unwrap();
    let joke = api.into_joke();
    assert_eq!(joke.id, "xwjic1sws_yohsfefndaiw");
    assert_eq!(joke.category.as_deref(), Some("animal"));
    assert!(joke.text.starts_with("Chuck Norris once rode"));
  }

  #[test]
  fn test_decode_missing_categories() {
    let json = r#"{"id": "abc", "value": "some joke"}"#;

    let api: ApiJoke = serde_json::from_str(json).unwrap();
    assert!(api.categories.is_empty());
    assert_eq!(api.into_joke().category, None);
  }

  #[test]
  fn test_first_category_wins() {
    let json = r#"{"id": "abc", "value": "some joke", "categories": ["dev", "science"]}"#;

    let joke: Joke = serde_json::from_str::<ApiJoke>(json).unwrap().into_joke();
    assert_eq!(joke.category.as_deref(), Some("dev"));
  }
}
