use crate::app::filter_records;
use crate::store::JokeRecord;
use crate::ui::truncate;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

pub fn draw_archive(
  frame: &mut Frame,
  area: Rect,
  jokes: &[JokeRecord],
  selected: usize,
  category: Option<&str>,
  filter: &str,
) {
  let visible = filter_records(jokes, filter);

  let title = match category {
    Some(name) => format!(" Archive [{}] ({}) ", name, visible.len()),
    None => format!(" Archive ({}) ", visible.len()),
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if visible.is_empty() {
    let content = if jokes.is_empty() {
      "Archive is empty. Press f to fetch some jokes."
    } else {
      "No jokes match the filter."
    };
    let paragraph = Paragraph::new(content)
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = visible
    .iter()
    .map(|joke| {
      let line = Line::from(vec![
        Span::styled(
          format!("{:<10}", truncate(&joke.category, 10)),
          Style::default().fg(Color::Yellow),
        ),
        Span::raw(" "),
        Span::styled(
          format!("{:<16}", joke.created_at),
          Style::default().fg(Color::DarkGray),
        ),
        Span::raw(" "),
        Span::raw(truncate(&joke.text, 80)),
      ]);
      ListItem::new(line)
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = ListState::default();
  state.select(Some(selected));

  frame.render_stateful_widget(list, area, &mut state);
}
