use crate::event::{Event, EventHandler};
use crate::i18n::{Language, Msg};
use crate::prefs::PreferenceStore;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult, Toasts};
use crate::ui::renderfns::{tab_areas, HeaderInfo};
use crate::ui::theme::Theme;
use crate::ui::view::{RenderCtx, View, ViewAction};
use crate::ui::views::{PostFormView, PostsView, Services, UserFormView, UsersView};
use crate::ui::{self, Tab};
use color_eyre::Result;
use crossterm::event::{
  DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent,
  MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::layout::Position;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Input poll interval; also the long-press resolution
pub const TICK_RATE: Duration = Duration::from_millis(50);

/// Main application state
pub struct App {
  /// Navigation stack - root is always the active tab's table
  view_stack: Vec<Box<dyn View>>,

  /// Closed views whose writes have not settled yet
  detached: Vec<Box<dyn View>>,

  tab: Tab,

  services: Services,

  /// `None` when the database could not be opened; preferences then live
  /// only for this run
  prefs: Option<PreferenceStore>,

  theme: Theme,
  language: Language,

  toasts: Toasts,

  /// `:` command palette
  command_input: CommandInput,

  /// Header title
  title: String,

  /// Frame area of the last draw, for mouse hit tests
  screen: Rect,

  /// Whether to quit
  should_quit: bool,
}

fn root_view(tab: Tab, services: &Services) -> Box<dyn View> {
  match tab {
    Tab::Users => Box::new(UsersView::new(services.clone())),
    Tab::Posts => Box::new(PostsView::new(services.clone())),
  }
}

impl App {
  pub fn new(
    title: String,
    services: Services,
    prefs: Option<PreferenceStore>,
    theme: Theme,
    language: Language,
  ) -> Self {
    Self {
      view_stack: vec![root_view(Tab::Users, &services)],
      detached: Vec::new(),
      tab: Tab::Users,
      services,
      prefs,
      theme,
      language,
      toasts: Toasts::new(),
      command_input: CommandInput::new(),
      title,
      screen: Rect::default(),
      should_quit: false,
    }
  }

  pub async fn run(&mut self, mut events: EventHandler) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    info!(theme = %self.theme, language = %self.language, "Started");
    let result = self.main_loop(&mut terminal, &mut events).await;

    // Cleanup terminal, also after an error
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn main_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>, events: &mut EventHandler) -> Result<()> {
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }
    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Mouse(mouse) => self.handle_mouse(mouse),
      Event::Tick => self.tick(Instant::now()),
      Event::Notice(msg) => {
        self.toasts.push(msg, Instant::now());
        debug!(visible = self.toasts.len(), "Toast shown");
      }
    }
  }

  fn tick(&mut self, now: Instant) {
    self.toasts.expire(now);
    for view in &mut self.detached {
      view.tick();
    }
    self.detached.retain(|v| v.is_busy());

    if let Some(view) = self.view_stack.last_mut() {
      let action = view.tick();
      self.apply(action);
    }
  }

  fn apply(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => self.view_stack.push(view),
      ViewAction::Pop => {
        // The root stays
        if self.view_stack.len() > 1 {
          if let Some(view) = self.view_stack.pop() {
            self.detach(view);
          }
        }
      }
    }
  }

  fn detach(&mut self, view: Box<dyn View>) {
    if view.is_busy() {
      debug!("Closed view still saving");
      self.detached.push(view);
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    if self.command_input.is_active() {
      if let KeyResult::Event(CommandEvent::Submitted(cmd)) = self.command_input.handle_key(key) {
        self.execute_command(&cmd);
      }
      return;
    }

    let captured = self.view_stack.last().is_some_and(|v| v.captures_input());
    if !captured {
      match key.code {
        KeyCode::Char(':') => {
          self.command_input.activate();
          return;
        }
        KeyCode::Char('q') if self.view_stack.len() == 1 => {
          self.should_quit = true;
          return;
        }
        KeyCode::Char('t') => return self.toggle_theme(),
        KeyCode::Char('L') => return self.toggle_language(),
        KeyCode::Char('1') => return self.switch_tab(Tab::Users),
        KeyCode::Char('2') => return self.switch_tab(Tab::Posts),
        _ => {}
      }
    }

    if let Some(view) = self.view_stack.last_mut() {
      let action = view.handle_key(key);
      self.apply(action);
    }
  }

  fn handle_mouse(&mut self, mouse: MouseEvent) {
    if self.command_input.is_active() {
      return;
    }

    let [header, _, _] = ui::layout(self.screen);
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
      let at = Position::new(mouse.column, mouse.row);
      let hit = tab_areas(header, &self.title, self.language.texts())
        .into_iter()
        .find(|(_, rect)| rect.contains(at));
      if let Some((tab, _)) = hit {
        return self.switch_tab(tab);
      }
    }

    if let Some(view) = self.view_stack.last_mut() {
      let action = view.handle_mouse(mouse);
      self.apply(action);
    }
  }

  fn execute_command(&mut self, cmd: &str) {
    debug!(cmd, "Command");
    match cmd {
      "users" => self.switch_tab(Tab::Users),
      "posts" => self.switch_tab(Tab::Posts),
      "add" => {
        let form: Box<dyn View> = match self.tab {
          Tab::Users => Box::new(UserFormView::create(self.services.clone())),
          Tab::Posts => Box::new(PostFormView::create(self.services.clone())),
        };
        self.view_stack.push(form);
      }
      "theme" => self.toggle_theme(),
      "lang" => self.toggle_language(),
      "refresh" => self.services.refresh(),
      "quit" => self.should_quit = true,
      "" => {}
      other => self.toasts.push(Msg::UnknownCommand(other.to_string()), Instant::now()),
    }
  }

  /// Show the tab's table. Re-selecting the active tab returns to its root.
  fn switch_tab(&mut self, tab: Tab) {
    let closed: Vec<_> = if tab == self.tab {
      self.view_stack.drain(1..).collect()
    } else {
      info!(?tab, "Switching tab");
      self.tab = tab;
      std::mem::replace(&mut self.view_stack, vec![root_view(tab, &self.services)])
    };
    for view in closed {
      self.detach(view);
    }
  }

  fn toggle_theme(&mut self) {
    self.theme = self.theme.toggled();
    let theme = self.theme;
    self.save_preference(|prefs| prefs.set_theme(theme));
  }

  fn toggle_language(&mut self) {
    self.language = self.language.toggled();
    let language = self.language;
    self.save_preference(|prefs| prefs.set_language(language));
  }

  fn save_preference(&mut self, save: impl FnOnce(&PreferenceStore) -> Result<()>) {
    let Some(prefs) = &self.prefs else {
      return;
    };
    if let Err(e) = save(prefs) {
      warn!(error = %e, "Failed to save preference");
      self
        .toasts
        .push(Msg::PreferencesFailed(e.to_string()), Instant::now());
    }
  }

  pub fn set_screen(&mut self, area: Rect) {
    self.screen = area;
  }

  // Accessors for UI rendering
  pub fn render_ctx(&self) -> RenderCtx {
    RenderCtx {
      texts: self.language.texts(),
      palette: self.theme.palette(),
    }
  }

  pub fn header_info(&self) -> HeaderInfo<'_> {
    HeaderInfo {
      title: &self.title,
      active: Some(self.tab),
      theme: self.theme,
      language: self.language,
      shortcuts: self
        .view_stack
        .last()
        .map(|v| v.shortcuts(self.language.texts()))
        .unwrap_or_default(),
    }
  }

  pub fn current_view_mut(&mut self) -> Option<&mut Box<dyn View>> {
    self.view_stack.last_mut()
  }

  pub fn breadcrumb(&self) -> Vec<String> {
    let t = self.language.texts();
    self.view_stack.iter().map(|v| v.breadcrumb_label(t)).collect()
  }

  pub fn toasts(&self) -> &Toasts {
    &self.toasts
  }

  pub fn command_input(&self) -> &CommandInput {
    &self.command_input
  }
}
