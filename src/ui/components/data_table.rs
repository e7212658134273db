use super::{ContextMenu, KeyResult, MenuEvent, SearchEvent, SearchInput};
use crate::i18n::Texts;
use crate::query::QueryState;
use crate::table::{Position, PressOutcome, PressTracker, RowAction, Searchable, SortOrder, TableState};
use crate::ui::renderfns::{ensure_valid_selection, truncate};
use crate::ui::view::RenderCtx;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::*;
use ratatui::widgets::{self, Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use std::time::Instant;

const ID_WIDTH: u16 = 6;

/// A column after the leading ID column.
#[derive(Debug, Clone, Copy)]
pub struct Column {
  pub title: fn(&Texts) -> &'static str,
  pub width: Constraint,
}

impl Column {
  pub const fn new(title: fn(&Texts) -> &'static str, width: Constraint) -> Self {
    Self { title, width }
  }
}

/// Per-table strings, resolved by the owning view for the active language.
#[derive(Debug, Clone, Copy)]
pub struct TableText {
  pub title: &'static str,
  pub placeholder: &'static str,
  pub loading: &'static str,
  pub error: &'static str,
  pub empty: &'static str,
  pub no_match: &'static str,
}

/// Geometry of the last frame, used for mouse hit-testing.
#[derive(Debug, Clone, Default)]
struct Rendered {
  bounds: Rect,
  header: Rect,
  first_row: u16,
  visible_rows: u16,
  /// Ids on the current page, in display order
  ids: Vec<u64>,
  matched: usize,
}

/// Filterable, sortable, paginated entity table with row actions.
///
/// Emits `(action, id)` for the owning view to dispatch. Keys: `j/k` move,
/// `n/p` page, `s` sort, `/` search, Enter or `v` view, `e` edit, `d`
/// delete, `m` menu. Mouse: click opens, right click or a long press opens
/// the context menu, a click on the ID header toggles the sort.
#[derive(Debug)]
pub struct DataTable {
  state: TableState,
  widget: widgets::TableState,
  search: SearchInput,
  menu: ContextMenu,
  press: PressTracker,
  rendered: Rendered,
}

impl DataTable {
  pub fn new(page_size: usize, sort: SortOrder) -> Self {
    Self {
      state: TableState::new(page_size, sort),
      widget: widgets::TableState::default().with_selected(Some(0)),
      search: SearchInput::new(),
      menu: ContextMenu::new(),
      press: PressTracker::default(),
      rendered: Rendered::default(),
    }
  }

  pub fn state(&self) -> &TableState {
    &self.state
  }

  /// Search box or context menu is taking keys
  pub fn captures_input(&self) -> bool {
    self.search.is_active() || self.menu.is_open()
  }

  pub fn selected_id(&self) -> Option<u64> {
    self
      .widget
      .selected()
      .and_then(|i| self.rendered.ids.get(i))
      .copied()
  }

  fn selected_action(&self, action: RowAction) -> KeyResult<(RowAction, u64)> {
    match self.selected_id() {
      Some(id) => KeyResult::Event((action, id)),
      None => KeyResult::Handled,
    }
  }

  fn select(&mut self, index: usize) {
    self.widget.select(Some(index));
  }

  fn move_selection(&mut self, down: bool) {
    let len = self.rendered.ids.len();
    if len == 0 {
      return;
    }
    let current = self.widget.selected().unwrap_or(0);
    let next = if down {
      (current + 1).min(len - 1)
    } else {
      current.saturating_sub(1)
    };
    self.select(next);
  }

  fn change_page(&mut self, forward: bool) {
    let before = self.state.page();
    if forward {
      self.state.next_page(self.rendered.matched);
    } else {
      self.state.prev_page(self.rendered.matched);
    }
    if self.state.page() != before {
      self.select(0);
    }
  }

  /// Menu anchored just below the selected row
  fn open_menu_at_selection(&mut self) {
    let Some(id) = self.selected_id() else {
      return;
    };
    let index = self.widget.selected().unwrap_or(0);
    let offset = self.widget.offset();
    let row = self.rendered.first_row + index.saturating_sub(offset) as u16 + 1;
    let at = Position::new(self.rendered.header.x + ID_WIDTH, row);
    self.menu.open(id, at, self.rendered.bounds);
  }

  /// Index into the current page of the data row under the pointer
  fn row_at(&self, column: u16, row: u16) -> Option<usize> {
    let r = &self.rendered;
    let inside_x = column >= r.header.x && column < r.header.right();
    if !inside_x || row < r.first_row || row >= r.first_row + r.visible_rows {
      return None;
    }
    let index = self.widget.offset() + (row - r.first_row) as usize;
    (index < r.ids.len()).then_some(index)
  }

  fn on_id_header(&self, column: u16, row: u16) -> bool {
    let header = self.rendered.header;
    row == header.y && column >= header.x && column < header.x + ID_WIDTH
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<(RowAction, u64)> {
    match self.menu.handle_key(key) {
      KeyResult::Event(MenuEvent::Chosen(action, id)) => return KeyResult::Event((action, id)),
      KeyResult::Event(MenuEvent::Dismissed) | KeyResult::Handled => return KeyResult::Handled,
      KeyResult::NotHandled => {}
    }

    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Changed(query)) => {
        self.state.set_filter(query);
        self.select(0);
        return KeyResult::Handled;
      }
      KeyResult::Event(SearchEvent::Submitted) | KeyResult::Handled => return KeyResult::Handled,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.move_selection(true),
      KeyCode::Char('k') | KeyCode::Up => self.move_selection(false),
      KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => self.change_page(true),
      KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => self.change_page(false),
      KeyCode::Char('s') => self.state.toggle_sort(),
      KeyCode::Char('m') => self.open_menu_at_selection(),
      KeyCode::Enter => return self.selected_action(RowAction::View),
      KeyCode::Char(c) => match RowAction::ALL.iter().find(|a| a.key() == c) {
        Some(action) => return self.selected_action(*action),
        None => return KeyResult::NotHandled,
      },
      _ => return KeyResult::NotHandled,
    }
    KeyResult::Handled
  }

  pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) -> KeyResult<(RowAction, u64)> {
    match self.menu.handle_mouse(mouse) {
      KeyResult::Event(MenuEvent::Chosen(action, id)) => return KeyResult::Event((action, id)),
      KeyResult::Event(MenuEvent::Dismissed) | KeyResult::Handled => {
        self.press.cancel();
        return KeyResult::Handled;
      }
      KeyResult::NotHandled => {}
    }

    let at = Position::new(mouse.column, mouse.row);
    match mouse.kind {
      MouseEventKind::Down(MouseButton::Left) => {
        if self.on_id_header(at.column, at.row) {
          self.state.toggle_sort();
          return KeyResult::Handled;
        }
        match self.row_at(at.column, at.row) {
          Some(index) => {
            self.select(index);
            self.press.press(at, now);
            KeyResult::Handled
          }
          None => KeyResult::NotHandled,
        }
      }
      MouseEventKind::Drag(MouseButton::Left) => {
        self.press.drag(at);
        KeyResult::Handled
      }
      MouseEventKind::Up(MouseButton::Left) => match self.press.release(now) {
        Some(PressOutcome::Click(p)) => match self.row_at(p.column, p.row) {
          Some(index) => {
            self.select(index);
            self.selected_action(RowAction::View)
          }
          None => KeyResult::Handled,
        },
        Some(PressOutcome::LongPress(p)) => {
          self.open_menu_at(p);
          KeyResult::Handled
        }
        None => KeyResult::NotHandled,
      },
      MouseEventKind::Down(MouseButton::Right) => match self.row_at(at.column, at.row) {
        Some(index) => {
          self.select(index);
          self.open_menu_at(at);
          KeyResult::Handled
        }
        None => KeyResult::NotHandled,
      },
      MouseEventKind::ScrollDown => {
        self.move_selection(true);
        KeyResult::Handled
      }
      MouseEventKind::ScrollUp => {
        self.move_selection(false);
        KeyResult::Handled
      }
      _ => KeyResult::NotHandled,
    }
  }

  fn open_menu_at(&mut self, at: Position) {
    if let Some(id) = self.row_at(at.column, at.row).and_then(|i| self.rendered.ids.get(i).copied()) {
      self.menu.open(id, at, self.rendered.bounds);
    }
  }

  /// Fire a held press. Returns true if the menu opened.
  pub fn tick(&mut self, now: Instant) -> bool {
    match self.press.tick(now) {
      Some(PressOutcome::LongPress(at)) => {
        self.open_menu_at(at);
        self.menu.is_open()
      }
      _ => false,
    }
  }

  /// Run the pipeline over `source` and draw it. `cells` yields the columns
  /// after ID for one row.
  #[allow(clippy::too_many_arguments)]
  pub fn render<T: Searchable>(
    &mut self,
    frame: &mut Frame,
    area: Rect,
    ctx: &RenderCtx,
    text: &TableText,
    source: &QueryState<Vec<T>>,
    columns: &[Column],
    cells: impl Fn(&T) -> Vec<String>,
  ) {
    let p = ctx.palette;
    let t = ctx.texts;

    let items: &[T] = source.data().map(|v| v.as_slice()).unwrap_or(&[]);
    let page = self.state.view(items);

    let title = match source {
      QueryState::Success(_) => format!(" {} ({}) ", text.title, page.matched),
      _ => format!(" {} ", text.title),
    };
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(p.border())
      .style(p.base());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Search
        Constraint::Min(1),    // Rows
        Constraint::Length(1), // Page footer
      ])
      .split(inner);

    self.search.render(frame, chunks[0], ctx, text.placeholder);

    self.rendered = Rendered {
      bounds: area,
      header: Rect::new(chunks[1].x, chunks[1].y, chunks[1].width, 1),
      first_row: chunks[1].y + 1,
      visible_rows: chunks[1].height.saturating_sub(1),
      ids: page.rows.iter().map(|r| r.sort_key()).collect(),
      matched: page.matched,
    };

    let message = match source {
      QueryState::Idle | QueryState::Loading => Some((text.loading.to_string(), p.muted())),
      QueryState::Error(e) => Some((format!("{}: {}\n{}", text.error, e, t.retry_hint), p.error())),
      QueryState::Success(_) if page.rows.is_empty() && self.state.filter().trim().is_empty() => {
        Some((text.empty.to_string(), p.muted()))
      }
      QueryState::Success(_) if page.rows.is_empty() => Some((
        format!("\"{}\" {}", self.state.filter().trim(), text.no_match),
        p.muted(),
      )),
      QueryState::Success(_) => None,
    };

    if let Some((message, style)) = message {
      self.rendered.ids.clear();
      let paragraph = Paragraph::new(message)
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
      frame.render_widget(paragraph, chunks[1]);
    } else {
      ensure_valid_selection(&mut self.widget, page.rows.len());

      let mut widths = vec![Constraint::Length(ID_WIDTH)];
      widths.extend(columns.iter().map(|c| c.width));

      let mut header = vec![Cell::from(format!("{} {}", t.id, self.state.sort().arrow()))];
      header.extend(columns.iter().map(|c| Cell::from((c.title)(t))));

      let rows: Vec<Row> = page
        .rows
        .iter()
        .map(|item| {
          let mut row = vec![Cell::from(item.sort_key().to_string()).style(p.accent())];
          row.extend(cells(item).into_iter().map(|c| Cell::from(truncate(&c, 60))));
          Row::new(row).style(Style::default().fg(p.fg))
        })
        .collect();

      let table = Table::new(rows, widths)
        .header(Row::new(header).style(p.heading()))
        .row_highlight_style(p.selected());

      frame.render_stateful_widget(table, chunks[1], &mut self.widget);
    }

    let footer = Line::from(vec![
      Span::styled(
        format!(" {} {}/{} ", t.page, page.page, page.total_pages),
        p.heading(),
      ),
      Span::styled("  <n/p>", p.accent()),
      Span::styled(" ←→  ", p.muted()),
      Span::styled("<s>", p.accent()),
      Span::styled(format!(" {}  ", t.sort), p.muted()),
      Span::styled("<m>", p.accent()),
      Span::styled(format!(" {}", t.menu), p.muted()),
    ]);
    frame.render_widget(Paragraph::new(footer), chunks[2]);

    self.menu.render_overlay(frame, ctx);
  }
}
