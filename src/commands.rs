/// Available commands and autocomplete logic

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "users",
    aliases: &["u", "user"],
    description: "Users tab",
  },
  Command {
    name: "posts",
    aliases: &["p", "post"],
    description: "Posts tab",
  },
  Command {
    name: "add",
    aliases: &["a", "new", "create"],
    description: "Add a user or post to the current tab",
  },
  Command {
    name: "theme",
    aliases: &["t", "dark", "light"],
    description: "Toggle light/dark theme",
  },
  Command {
    name: "lang",
    aliases: &["l", "language", "tr", "en"],
    description: "Toggle Turkish/English",
  },
  Command {
    name: "refresh",
    aliases: &["r", "reload"],
    description: "Refetch users and posts",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit upcon",
  },
];

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.trim().to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    if cmd.name == input_lower {
      matches.push((cmd, 0));
    } else if cmd.aliases.contains(&input_lower.as_str()) {
      matches.push((cmd, 1));
    } else if cmd.name.starts_with(&input_lower) {
      matches.push((cmd, 2));
    } else if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      matches.push((cmd, 3));
    } else if cmd.name.contains(&input_lower) {
      matches.push((cmd, 4));
    } else if cmd.aliases.iter().any(|a| a.contains(&input_lower)) {
      matches.push((cmd, 5));
    }
  }

  // Stable, so ties keep declaration order
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}
