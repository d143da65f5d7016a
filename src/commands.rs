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
    name: "joke",
    aliases: &["j", "random"],
    description: "Show the current random joke",
  },
  Command {
    name: "archive",
    aliases: &["a", "jokes"],
    description: "Browse archived jokes",
  },
  Command {
    name: "categories",
    aliases: &["c", "cats"],
    description: "Browse joke categories",
  },
  Command {
    name: "clear",
    aliases: &["wipe"],
    description: "Delete all archived jokes and reseed categories",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit jokebox",
  },
];

/// How well a command matches the typed input; lower is better, None is no
/// match.
fn match_priority(cmd: &Command, input: &str) -> Option<u32> {
  if cmd.name == input {
    return Some(0);
  }
  if cmd.aliases.contains(&input) {
    return Some(1);
  }
  if cmd.name.starts_with(input) {
    return Some(2);
  }
  if cmd.aliases.iter().any(|a| a.starts_with(input)) {
    return Some(3);
  }
  if cmd.name.contains(input) {
    return Some(4);
  }
  if cmd.aliases.iter().any(|a| a.contains(input)) {
    return Some(5);
  }
  None
}

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = COMMANDS
    .iter()
    .filter_map(|cmd| match_priority(cmd, &input_lower).map(|p| (cmd, p)))
    .collect();

  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}
