use crate::i18n::{Language, Texts};
use crate::ui::theme::Theme;
use crate::ui::view::{RenderCtx, ShortcutInfo};
use crate::ui::Tab;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

const LOGO: &str = " upcon ";
const SEPARATOR: &str = "│";

/// What the header shows besides the static logo
pub struct HeaderInfo<'a> {
  pub title: &'a str,
  pub active: Option<Tab>,
  pub theme: Theme,
  pub language: Language,
  pub shortcuts: Vec<ShortcutInfo>,
}

fn tab_label(t: &Texts, tab: Tab) -> &'static str {
  match tab {
    Tab::Users => t.users,
    Tab::Posts => t.posts,
  }
}

fn prefix_width(title: &str) -> u16 {
  let prefix = format!("{}{} {} {} ", LOGO, SEPARATOR, title, SEPARATOR);
  Span::raw(prefix).width() as u16
}

/// Screen cells of each tab on the first header line, for click handling.
pub fn tab_areas(area: Rect, title: &str, t: &Texts) -> Vec<(Tab, Rect)> {
  let mut x = area.x + prefix_width(title);
  Tab::ALL
    .iter()
    .map(|tab| {
      let width = Span::raw(format!(" {} ", tab_label(t, *tab))).width() as u16;
      let rect = Rect::new(x, area.y, width, 1).intersection(area);
      x += width + 1;
      (*tab, rect)
    })
    .collect()
}

/// Draw the two-line header: title, tabs and toggles, then shortcuts
pub fn draw_header(frame: &mut Frame, area: Rect, ctx: &RenderCtx, info: &HeaderInfo) {
  let p = ctx.palette;
  let t = ctx.texts;

  let mut top = vec![
    Span::styled(LOGO, p.heading()),
    Span::styled(SEPARATOR, p.muted()),
    Span::styled(format!(" {} ", info.title), Style::default().fg(p.fg).bold()),
    Span::styled(SEPARATOR, p.muted()),
    Span::raw(" "),
  ];
  for tab in Tab::ALL {
    let style = if info.active == Some(tab) {
      p.selected()
    } else {
      p.muted()
    };
    top.push(Span::styled(format!(" {} ", tab_label(t, tab)), style));
    top.push(Span::raw(" "));
  }
  top.push(Span::raw("  "));
  top.push(Span::styled(format!("[{}]", info.language), p.accent()));
  top.push(Span::raw(" "));
  top.push(Span::styled(format!("[{}]", info.theme), p.accent()));

  // Shortcuts - keys highlighted, descriptions dimmed
  let mut shortcuts = info.shortcuts.clone();
  shortcuts.sort_by_key(|s| s.priority);
  let mut bottom = vec![Span::raw(" ")];
  for shortcut in shortcuts {
    bottom.push(Span::styled(format!("<{}>", shortcut.key), p.accent()));
    bottom.push(Span::styled(format!(" {}   ", shortcut.label), p.muted()));
  }

  let paragraph = Paragraph::new(vec![Line::from(top), Line::from(bottom)]).style(p.base());
  frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::i18n::EN;

  #[test]
  fn test_tab_areas_follow_title() {
    let area = Rect::new(0, 0, 120, 2);
    let tabs = tab_areas(area, "Console", &EN);

    // " upcon │ Console │ " is 19 cells wide
    assert_eq!(tabs[0].0, Tab::Users);
    assert_eq!(tabs[0].1, Rect::new(19, 0, 7, 1));
    assert_eq!(tabs[1].0, Tab::Posts);
    assert_eq!(tabs[1].1.x, 27);
  }

  #[test]
  fn test_tab_areas_are_clipped_to_header() {
    let area = Rect::new(0, 0, 20, 2);
    let tabs = tab_areas(area, "Console", &EN);
    assert_eq!(tabs[0].1.width, 1);
    assert!(tabs[1].1.is_empty());
  }
}
