use crate::app::JokeCard;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub fn draw_joke_view(frame: &mut Frame, area: Rect, card: Option<&JokeCard>, fetching: bool) {
  let title = if fetching {
    " Random Joke (fetching...) "
  } else {
    " Random Joke "
  };

  let block = Block::default()
    .title(title)
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let inner = block.inner(area);
  frame.render_widget(block, area);

  let card = match card {
    Some(card) => card,
    None => {
      let hint = if fetching {
        "Fetching a joke..."
      } else {
        "Press f to fetch a random joke."
      };
      let paragraph = Paragraph::new(hint).style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, inner);
      return;
    }
  };

  // Layout for the joke card
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(2), // Header (category, id)
      Constraint::Length(1), // Separator
      Constraint::Min(1),    // Joke text
      Constraint::Length(1), // Fetch time
    ])
    .split(inner);

  // Header
  let header = vec![
    Line::from(vec![
      Span::styled("Category: ", Style::default().fg(Color::DarkGray)),
      Span::styled(
        card.category.as_deref().unwrap_or("uncategorized"),
        Style::default().fg(Color::Yellow),
      ),
    ]),
    Line::from(vec![
      Span::styled("ID: ", Style::default().fg(Color::DarkGray)),
      Span::styled(card.id.as_str(), Style::default().fg(Color::Cyan)),
    ]),
  ];
  let header_para = Paragraph::new(header);
  frame.render_widget(header_para, chunks[0]);

  // Separator
  let sep =
    Paragraph::new("─".repeat(chunks[1].width as usize)).style(Style::default().fg(Color::DarkGray));
  frame.render_widget(sep, chunks[1]);

  // Joke text
  let text_para = Paragraph::new(card.text.as_str())
    .wrap(Wrap { trim: true })
    .style(Style::default());
  frame.render_widget(text_para, chunks[2]);

  // Fetch time
  let fetched = Line::from(vec![
    Span::styled("Fetched: ", Style::default().fg(Color::DarkGray)),
    Span::raw(card.fetched_at.as_str()),
  ]);
  frame.render_widget(Paragraph::new(fetched), chunks[3]);
}
