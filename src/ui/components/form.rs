use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::i18n::Texts;
use crate::ui::view::RenderCtx;
use crate::validation::{Field, Invalid};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use std::collections::HashMap;

const LABEL_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
  Submit,
  Cancel,
}

/// One labelled text field.
#[derive(Debug, Clone)]
pub struct FormField {
  label: fn(&Texts) -> &'static str,
  /// Set for fields that carry validation rules
  field: Option<Field>,
  required: bool,
  input: TextInput,
}

impl FormField {
  pub fn new(label: fn(&Texts) -> &'static str, value: impl Into<String>) -> Self {
    Self {
      label,
      field: None,
      required: false,
      input: TextInput::with_value(value),
    }
  }

  /// Mark as required and attach validation errors for `field`
  pub fn required(mut self, field: Field) -> Self {
    self.field = Some(field);
    self.required = true;
    self
  }
}

/// Vertical list of fields; Tab/arrows move focus, Enter on the last field
/// or Ctrl-S submits, Esc cancels.
#[derive(Debug, Clone)]
pub struct Form {
  fields: Vec<FormField>,
  focused: usize,
  errors: HashMap<Field, Invalid>,
}

impl Form {
  pub fn new(fields: Vec<FormField>) -> Self {
    Self {
      fields,
      focused: 0,
      errors: HashMap::new(),
    }
  }

  pub fn value(&self, index: usize) -> &str {
    self
      .fields
      .get(index)
      .map(|f| f.input.value())
      .unwrap_or_default()
  }

  /// Trimmed value of field `index`
  pub fn text(&self, index: usize) -> String {
    self.value(index).trim().to_string()
  }

  pub fn focused(&self) -> usize {
    self.focused
  }

  pub fn error(&self, field: Field) -> Option<Invalid> {
    self.errors.get(&field).copied()
  }

  /// Replace the validation errors and focus the first invalid field.
  pub fn set_errors(&mut self, errors: Vec<(Field, Invalid)>) {
    self.errors = errors.into_iter().collect();
    if let Some(index) = self
      .fields
      .iter()
      .position(|f| f.field.is_some_and(|field| self.errors.contains_key(&field)))
    {
      self.focused = index;
    }
  }

  fn focus_next(&mut self) {
    self.focused = (self.focused + 1) % self.fields.len().max(1);
  }

  fn focus_prev(&mut self) {
    let len = self.fields.len().max(1);
    self.focused = (self.focused + len - 1) % len;
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FormEvent> {
    match key.code {
      KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        return KeyResult::Event(FormEvent::Submit)
      }
      KeyCode::Tab | KeyCode::Down => {
        self.focus_next();
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.focus_prev();
        return KeyResult::Handled;
      }
      _ => {}
    }

    let last = self.fields.len().saturating_sub(1);
    let Some(field) = self.fields.get_mut(self.focused) else {
      return KeyResult::NotHandled;
    };
    match field.input.handle_key(key) {
      InputResult::Cancelled => KeyResult::Event(FormEvent::Cancel),
      InputResult::Submitted(_) if self.focused == last => KeyResult::Event(FormEvent::Submit),
      InputResult::Submitted(_) => {
        self.focus_next();
        KeyResult::Handled
      }
      InputResult::Consumed => {
        if let Some(f) = field.field {
          self.errors.remove(&f);
        }
        KeyResult::Handled
      }
      InputResult::NotHandled => KeyResult::NotHandled,
    }
  }

  pub fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderCtx, title: &str, status: Option<&str>) {
    let p = ctx.palette;
    let t = ctx.texts;

    let mut block = Block::default()
      .title(format!(" {} ", title))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(p.border());
    if let Some(status) = status {
      block = block.title_bottom(Line::styled(format!(" {} ", status), Style::default().fg(p.warning)));
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    let mut focus_line = 0;
    for (i, field) in self.fields.iter().enumerate() {
      let focused = i == self.focused;
      if focused {
        focus_line = lines.len();
      }
      let label = format!(
        "{}{}",
        (field.label)(t),
        if field.required { " *" } else { "" }
      );
      let label_style = if focused { p.heading() } else { p.muted() };

      let mut spans = vec![
        Span::styled(if focused { "> " } else { "  " }, p.accent()),
        Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH), label_style),
        Span::styled(field.input.value().to_string(), Style::default().fg(p.fg)),
      ];
      if focused {
        spans.push(Span::styled("_", p.accent()));
      } else if !field.required && field.input.is_empty() {
        spans.push(Span::styled(format!("({})", t.optional), p.muted()));
      }
      lines.push(Line::from(spans));

      if let Some(error) = field.field.and_then(|f| self.error(f)) {
        lines.push(Line::from(vec![
          Span::raw(" ".repeat(LABEL_WIDTH + 2)),
          Span::styled(error.message(t), p.error()),
        ]));
      }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
      Span::styled("<Tab>", p.accent()),
      Span::styled(" ↓  ", p.muted()),
      Span::styled("<Ctrl-S>", p.accent()),
      Span::styled(format!(" {}  ", t.save), p.muted()),
      Span::styled("<Esc>", p.accent()),
      Span::styled(format!(" {}", t.cancel), p.muted()),
    ]));

    let visible = inner.height as usize;
    let scroll = focus_line.saturating_sub(visible.saturating_sub(3));
    let paragraph = Paragraph::new(lines).scroll((scroll as u16, 0));
    frame.render_widget(paragraph, inner);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn form() -> Form {
    Form::new(vec![
      FormField::new(|t| t.name, "").required(Field::Name),
      FormField::new(|t| t.email, "a@b.co").required(Field::Email),
      FormField::new(|t| t.phone, ""),
    ])
  }

  #[test]
  fn test_tab_cycles_focus() {
    let mut form = form();
    form.handle_key(key(KeyCode::Tab));
    form.handle_key(key(KeyCode::Tab));
    assert_eq!(form.focused(), 2);
    form.handle_key(key(KeyCode::Tab));
    assert_eq!(form.focused(), 0);
    form.handle_key(key(KeyCode::BackTab));
    assert_eq!(form.focused(), 2);
  }

  #[test]
  fn test_typing_goes_to_focused_field() {
    let mut form = form();
    form.handle_key(key(KeyCode::Char('A')));
    form.handle_key(key(KeyCode::Tab));
    form.handle_key(key(KeyCode::Char('m')));
    assert_eq!(form.value(0), "A");
    assert_eq!(form.value(1), "a@b.com");
  }

  #[test]
  fn test_enter_advances_then_submits_on_last_field() {
    let mut form = form();
    assert_eq!(form.handle_key(key(KeyCode::Enter)), KeyResult::Handled);
    assert_eq!(form.handle_key(key(KeyCode::Enter)), KeyResult::Handled);
    assert_eq!(
      form.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(FormEvent::Submit)
    );
  }

  #[test]
  fn test_ctrl_s_submits_and_esc_cancels() {
    let mut form = form();
    assert_eq!(
      form.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)),
      KeyResult::Event(FormEvent::Submit)
    );
    assert_eq!(
      form.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(FormEvent::Cancel)
    );
  }

  #[test]
  fn test_errors_focus_first_invalid_field_and_clear_on_edit() {
    let mut form = form();
    form.handle_key(key(KeyCode::Tab));
    form.handle_key(key(KeyCode::Tab));

    form.set_errors(vec![(Field::Email, Invalid::InvalidEmail)]);
    assert_eq!(form.focused(), 1);
    assert_eq!(form.error(Field::Email), Some(Invalid::InvalidEmail));

    form.handle_key(key(KeyCode::Char('m')));
    assert!(form.errors.is_empty());
  }
}
