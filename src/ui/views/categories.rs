use crate::store::CategoryCount;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

pub fn draw_category_list(frame: &mut Frame, area: Rect, rows: &[CategoryCount], selected: usize) {
  let title = format!(" Categories ({}) ", rows.len());

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if rows.is_empty() {
    let paragraph = Paragraph::new("No categories stored yet.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = rows
    .iter()
    .map(|row| {
      let line = Line::from(vec![
        Span::styled(format!("{:<16}", row.name), Style::default().fg(Color::Cyan)),
        Span::raw(" "),
        Span::styled(
          format!("{} jokes", row.jokes),
          Style::default().fg(Color::DarkGray),
        ),
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
