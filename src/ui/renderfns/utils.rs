use ratatui::layout::Rect;
use ratatui::widgets::TableState;

/// Truncate to `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Keep the selection inside `len` rows; select the first row if none is
pub fn ensure_valid_selection(state: &mut TableState, len: usize) {
  if len == 0 {
    return;
  }
  match state.selected() {
    Some(i) if i >= len => state.select(Some(len - 1)),
    None => state.select(Some(0)),
    _ => {}
  }
}

/// Rect of `percent_x` of the width and `height` rows, centered in `area`
pub fn centered_rect(area: Rect, percent_x: u16, height: u16) -> Rect {
  let width = (area.width as u32 * percent_x.min(100) as u32 / 100) as u16;
  let height = height.min(area.height);
  Rect::new(
    area.x + (area.width - width) / 2,
    area.y + (area.height - height) / 2,
    width,
    height,
  )
}
