use crate::ui::view::RenderCtx;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the footer bar with the view breadcrumb
pub fn draw_footer(frame: &mut Frame, area: Rect, ctx: &RenderCtx, breadcrumb: &[String]) {
  let p = ctx.palette;
  let mut spans = vec![Span::raw(" ")];

  for (i, part) in breadcrumb.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" > ", p.muted()));
    }

    let style = if i == breadcrumb.len() - 1 {
      // Current view
      p.heading()
    } else {
      Style::default().fg(p.fg)
    };

    spans.push(Span::styled(part.clone(), style));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(p.base());
  frame.render_widget(paragraph, area);
}
