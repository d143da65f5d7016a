/// A random joke as delivered by the remote API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joke {
  /// Remote identifier, unique per joke
  pub id: String,
  pub text: String,
  /// First category the API attached to the joke, if any.
  /// Uncategorized jokes are common when fetching without a filter.
  pub category: Option<String>,
}
