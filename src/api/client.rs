use crate::api::api_types::ApiJoke;
use crate::api::types::Joke;
use crate::config::Config;
use color_eyre::{eyre::eyre, Result};

static APP_USER_AGENT: &str = concat!("jokebox/", env!("CARGO_PKG_VERSION"));

/// Jokes API client wrapper
#[derive(Clone)]
pub struct JokeClient {
  http: reqwest::Client,
  base_url: String,
}

impl JokeClient {
  pub fn new(config: &Config) -> Result<Self> {
    let http = reqwest::Client::builder()
      .user_agent(APP_USER_AGENT)
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      base_url: config.api.base_url.trim_end_matches('/').to_string(),
    })
  }

  /// Fetch one random joke, optionally restricted to a category
  pub async fn random_joke(&self, category: Option<&str>) -> Result<Joke> {
    let url = format!("{}/jokes/random", self.base_url);

    let mut request = self.http.get(&url);
    if let Some(category) = category {
      request = request.query(&[("category", category)]);
    }

    let response = request
      .send()
      .await
      .map_err(|e| eyre!("Failed to fetch random joke: {}", e))?
      .error_for_status()
      .map_err(|e| eyre!("Joke request rejected: {}", e))?;

    let joke: ApiJoke = response
      .json()
      .await
      .map_err(|e| eyre!("Failed to decode joke response: {}", e))?;

    Ok(joke.into_joke())
  }

  /// Fetch the full category list
  pub async fn categories(&self) -> Result<Vec<String>> {
    let url = format!("{}/jokes/categories", self.base_url);

    let response = self
      .http
      .get(&url)
      .send()
      .await
      .map_err(|e| eyre!("Failed to fetch categories: {}", e))?
      .error_for_status()
      .map_err(|e| eyre!("Category request rejected: {}", e))?;

    let categories: Vec<String> = response
      .json()
      .await
      .map_err(|e| eyre!("Failed to decode category response: {}", e))?;

    Ok(categories)
  }

  /// The API host this client talks to (for the header)
  pub fn base_url(&self) -> &str {
    &self.base_url
  }
}
