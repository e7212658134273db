use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
  #[default]
  Light,
  Dark,
}

impl Theme {
  pub fn as_str(self) -> &'static str {
    match self {
      Theme::Light => "light",
      Theme::Dark => "dark",
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      Theme::Light => Theme::Dark,
      Theme::Dark => Theme::Light,
    }
  }

  pub fn palette(self) -> &'static Palette {
    match self {
      Theme::Light => &LIGHT,
      Theme::Dark => &DARK,
    }
  }
}

impl fmt::Display for Theme {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Theme {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "light" => Ok(Theme::Light),
      "dark" => Ok(Theme::Dark),
      other => Err(format!("unknown theme: {}", other)),
    }
  }
}

/// Colors for one theme.
#[derive(Debug)]
pub struct Palette {
  pub bg: Color,
  pub fg: Color,
  pub muted: Color,
  pub accent: Color,
  pub border: Color,
  pub selection_bg: Color,
  pub success: Color,
  pub error: Color,
  pub warning: Color,
}

impl Palette {
  pub fn base(&self) -> Style {
    Style::default().fg(self.fg).bg(self.bg)
  }

  pub fn border(&self) -> Style {
    Style::default().fg(self.border)
  }

  pub fn muted(&self) -> Style {
    Style::default().fg(self.muted)
  }

  pub fn accent(&self) -> Style {
    Style::default().fg(self.accent)
  }

  pub fn heading(&self) -> Style {
    Style::default()
      .fg(self.accent)
      .add_modifier(Modifier::BOLD)
  }

  pub fn selected(&self) -> Style {
    Style::default()
      .bg(self.selection_bg)
      .add_modifier(Modifier::BOLD)
  }

  pub fn error(&self) -> Style {
    Style::default().fg(self.error)
  }
}

pub static LIGHT: Palette = Palette {
  bg: Color::Rgb(243, 244, 246),
  fg: Color::Rgb(17, 24, 39),
  muted: Color::Rgb(107, 114, 128),
  accent: Color::Rgb(37, 99, 235),
  border: Color::Rgb(156, 163, 175),
  selection_bg: Color::Rgb(219, 234, 254),
  success: Color::Rgb(22, 163, 74),
  error: Color::Rgb(220, 38, 38),
  warning: Color::Rgb(202, 138, 4),
};

pub static DARK: Palette = Palette {
  bg: Color::Rgb(17, 24, 39),
  fg: Color::Rgb(243, 244, 246),
  muted: Color::Rgb(156, 163, 175),
  accent: Color::Rgb(96, 165, 250),
  border: Color::Rgb(75, 85, 99),
  selection_bg: Color::Rgb(55, 65, 81),
  success: Color::Rgb(74, 222, 128),
  error: Color::Rgb(248, 113, 113),
  warning: Color::Rgb(250, 204, 21),
};
