mod views;

use crate::app::{App, Mode, ViewState};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  draw_header(frame, chunks[0], app);

  // Draw current view
  if let Some(view) = app.current_view() {
    match view {
      ViewState::Joke => {
        views::joke::draw_joke_view(frame, chunks[1], app.current_card(), app.is_fetching());
      }
      ViewState::Archive {
        jokes,
        selected,
        category,
      } => {
        views::archive::draw_archive(
          frame,
          chunks[1],
          jokes,
          *selected,
          category.as_deref(),
          app.search_filter(),
        );
      }
      ViewState::Categories { rows, selected } => {
        views::categories::draw_category_list(frame, chunks[1], rows, *selected);
      }
    }
  }

  // Draw status bar
  draw_status_bar(frame, chunks[2], app);
}

/// Draw the header bar with logo, API host, fetch scope, and shortcuts
fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
  let domain = extract_domain(app.api_url());
  let name = app.title().unwrap_or("jokebox");

  let header = Line::from(vec![
    Span::styled(format!(" {} ", name), Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", domain), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", app.category_mode()),
      Style::default().fg(Color::Yellow).bold(),
    ),
    Span::raw("  "),
    // Shortcuts - keys and brackets highlighted, descriptions dimmed
    Span::styled("<f>", Style::default().fg(Color::Cyan)),
    Span::styled(" fetch", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<:>", Style::default().fg(Color::Cyan)),
    Span::styled(" command", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("</>", Style::default().fg(Color::Cyan)),
    Span::styled(" filter", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<q>", Style::default().fg(Color::Cyan)),
    Span::styled(" back", Style::default().fg(Color::DarkGray)),
  ]);

  let paragraph = Paragraph::new(header).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  match app.mode() {
    Mode::Normal => {
      let hint = " f:fetch  :command  /filter  j/k:nav  Enter:select  q:back  Ctrl-C:quit";
      let paragraph = Paragraph::new(hint).style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
    }
    Mode::Command => {
      let mut spans = vec![Span::styled(
        format!(":{}", app.command_input()),
        Style::default().fg(Color::Yellow),
      )];

      // Autocomplete suggestions, with the selected one highlighted
      let suggestions = app.autocomplete_suggestions();
      if !suggestions.is_empty() {
        spans.push(Span::raw("  "));
        for (i, cmd) in suggestions.iter().enumerate() {
          let style = if i == app.selected_suggestion() {
            Style::default().fg(Color::Black).bg(Color::Yellow)
          } else {
            Style::default().fg(Color::DarkGray)
          };
          spans.push(Span::styled(format!(" {} ", cmd.name), style));
          spans.push(Span::raw(" "));
        }
        if let Some(cmd) = suggestions.get(app.selected_suggestion()) {
          spans.push(Span::styled(
            format!(" {}", cmd.description),
            Style::default().fg(Color::DarkGray).italic(),
          ));
        }
      }

      let paragraph = Paragraph::new(Line::from(spans));
      frame.render_widget(paragraph, area);
    }
    Mode::Search => {
      let search = format!("/{}", app.search_filter());
      let paragraph = Paragraph::new(search).style(Style::default().fg(Color::Cyan));
      frame.render_widget(paragraph, area);
    }
  }
}

/// Extract host from the API base URL
fn extract_domain(url: &str) -> &str {
  url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url)
    .split('/')
    .next()
    .unwrap_or(url)
}

/// Truncate a string to a maximum number of characters, adding "..." if
/// truncated. Joke text is arbitrary UTF-8, so cut on char boundaries.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", cut)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extract_domain() {
    assert_eq!(
      extract_domain("https://api.chucknorris.io"),
      "api.chucknorris.io"
    );
    assert_eq!(
      extract_domain("https://api.chucknorris.io/jokes"),
      "api.chucknorris.io"
    );
    assert_eq!(extract_domain("http://localhost:8080"), "localhost:8080");
  }

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("Ärger über Ärger", 9), "Ärger ...");
  }
}
