use crate::adapters::export::GroupExporter;
use crate::adapters::ingest::{parse_csv, read_names_from_file};
use crate::adapters::storage::LocalStorage;
use crate::app::controller::Controller;
use crate::app::enrichment::MAX_TEAM_NAMES;
use crate::core::state::{Action, AppState, Effect};
use crate::domain::model::{CongratulationMode, EntryId, Group, View};
use crate::utils::error::{RaffleError, Result};

pub const HELP: &str = "\
commands:
  add <a, b, ...>      add names (comma separated)
  load <file>          add names from a .txt or .csv file
  sample               add the sample roster
  list                 show the roster, duplicates flagged
  remove <id>          remove one entry by id
  dedupe               keep only the first entry per name
  clear / confirm      clear the roster (two steps), cancel to abort
  view <input|raffle|grouping>
  repeat <on|off>      allow drawing the same entry again
  draw                 draw one winner
  reset                restore the pool and clear history
  history              show winners, newest first
  template <text>      congratulation template ({name}) or style hint
  mode <template|ai>   how the congratulation is produced
  size <n>             group size (2-20)
  theme <text>         group name theme
  group                shuffle the roster into groups
  export               write the groups to CSV
  teams <n> [theme]    suggest team names (1-100)
  help, quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Apply(Action),
    Load(String),
    List,
    History,
    Template(String),
    Mode(CongratulationMode),
    Export,
    Teams { count: usize, theme: Option<String> },
    Help,
    Quit,
}

fn invalid(input: &str) -> RaffleError {
    RaffleError::CommandError {
        input: input.to_string(),
    }
}

impl SessionCommand {
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "add" => SessionCommand::Apply(Action::AddNames(parse_csv(rest))),
            "load" if !rest.is_empty() => SessionCommand::Load(rest.to_string()),
            "sample" => SessionCommand::Apply(Action::LoadSample),
            "list" | "ls" => SessionCommand::List,
            "remove" | "rm" => {
                let id = rest.trim_start_matches('#').parse().map_err(|_| invalid(line))?;
                SessionCommand::Apply(Action::RemoveEntry(EntryId(id)))
            }
            "dedupe" => SessionCommand::Apply(Action::RemoveDuplicates),
            "clear" => SessionCommand::Apply(Action::RequestClear),
            "confirm" => SessionCommand::Apply(Action::ConfirmClear),
            "cancel" => SessionCommand::Apply(Action::CancelClear),
            "view" => SessionCommand::Apply(Action::SwitchView(
                rest.parse::<View>().map_err(|_| invalid(line))?,
            )),
            "repeat" => match rest.to_lowercase().as_str() {
                "on" | "yes" | "true" => SessionCommand::Apply(Action::SetAllowRepeat(true)),
                "off" | "no" | "false" => SessionCommand::Apply(Action::SetAllowRepeat(false)),
                _ => return Err(invalid(line)),
            },
            "draw" => SessionCommand::Apply(Action::Draw),
            "reset" => SessionCommand::Apply(Action::ResetRaffle),
            "history" => SessionCommand::History,
            "template" if !rest.is_empty() => SessionCommand::Template(rest.to_string()),
            "mode" => SessionCommand::Mode(rest.parse().map_err(|_| invalid(line))?),
            "size" => SessionCommand::Apply(Action::SetGroupSize(
                rest.parse().map_err(|_| invalid(line))?,
            )),
            "theme" if !rest.is_empty() => SessionCommand::Apply(Action::SetTheme(rest.to_string())),
            "group" => SessionCommand::Apply(Action::Partition),
            "export" => SessionCommand::Export,
            "teams" => {
                let (count, theme) = match rest.split_once(char::is_whitespace) {
                    Some((count, theme)) => (count, Some(theme.trim().to_string())),
                    None => (rest, None),
                };
                let count: usize = count.parse().map_err(|_| invalid(line))?;
                if count == 0 || count > MAX_TEAM_NAMES {
                    return Err(invalid(line));
                }
                SessionCommand::Teams { count, theme }
            }
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            _ => return Err(invalid(line)),
        };
        Ok(Some(command))
    }
}

/// What the front end should show for one command.
#[derive(Debug, Default)]
pub struct Reply {
    /// Names to flash before the result, oldest first.
    pub rolling: Vec<String>,
    pub lines: Vec<String>,
    /// A winner was drawn; its message arrives via [`Session::winner_message`].
    pub awaiting_message: bool,
    pub quit: bool,
}

impl Reply {
    fn text(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            ..Self::default()
        }
    }
}

pub struct Session {
    controller: Controller,
    exporter: GroupExporter<LocalStorage>,
    rolling_frames: usize,
}

impl Session {
    pub fn new(controller: Controller, exporter: GroupExporter<LocalStorage>, rolling_frames: usize) -> Self {
        Self {
            controller,
            exporter,
            rolling_frames,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn state(&self) -> &AppState {
        self.controller.state()
    }

    pub async fn winner_message(&mut self) -> Option<String> {
        self.controller.settle().await
    }

    /// Runs one input line. Errors are reported back, never fatal.
    pub async fn handle_line(&mut self, line: &str) -> Reply {
        match SessionCommand::parse(line) {
            Ok(Some(command)) => match self.execute(command).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::warn!("Command failed: {}", e);
                    Reply::text(format!("❌ {}", e.user_friendly_message()))
                }
            },
            Ok(None) => Reply::default(),
            Err(e) => Reply::text(format!("❌ {}, type 'help'", e.user_friendly_message())),
        }
    }

    pub async fn execute(&mut self, command: SessionCommand) -> Result<Reply> {
        let reply = match command {
            SessionCommand::Apply(Action::Draw) => {
                let rolling = self.controller.rolling_frames(self.rolling_frames);
                let effect = self.controller.dispatch(Action::Draw);
                let awaiting_message = matches!(effect, Effect::Winner(_));
                Reply {
                    rolling,
                    lines: vec![self.describe(&effect)],
                    awaiting_message,
                    quit: false,
                }
            }
            SessionCommand::Apply(action) => {
                let effect = self.controller.dispatch(action);
                Reply::text(self.describe(&effect))
            }
            SessionCommand::Load(path) => {
                let names = read_names_from_file(&path).await?;
                let effect = self.controller.dispatch(Action::AddNames(names));
                Reply::text(self.describe(&effect))
            }
            SessionCommand::List => Reply {
                lines: render_roster(self.state()),
                ..Reply::default()
            },
            SessionCommand::History => Reply {
                lines: render_history(self.state()),
                ..Reply::default()
            },
            SessionCommand::Template(text) => {
                let mode = self.state().congratulation.mode;
                self.controller.dispatch(Action::SetCongratulation { mode, text });
                Reply::text("✅ Template updated")
            }
            SessionCommand::Mode(mode) => {
                let text = self.state().congratulation.text.clone();
                self.controller.dispatch(Action::SetCongratulation { mode, text });
                Reply::text(format!("✅ Congratulation mode: {:?}", mode))
            }
            SessionCommand::Export => {
                if self.state().groups.is_empty() {
                    Reply::text("No groups yet, run 'group' first")
                } else {
                    let path = self.exporter.export(&self.state().groups).await?;
                    Reply::text(format!("📁 Exported to {}", path))
                }
            }
            SessionCommand::Teams { count, theme } => {
                let theme = theme.unwrap_or_else(|| self.state().theme.clone());
                let names = self
                    .controller
                    .congratulator()
                    .suggest_team_names(count, &theme)
                    .await;
                Reply {
                    lines: names,
                    ..Reply::default()
                }
            }
            SessionCommand::Help => Reply::text(HELP),
            SessionCommand::Quit => Reply {
                quit: true,
                ..Reply::default()
            },
        };
        Ok(reply)
    }

    fn describe(&self, effect: &Effect) -> String {
        let state = self.state();
        match effect {
            Effect::None => format!(
                "view: {:?}, roster: {}, pool: {}, repeat: {}",
                state.view,
                state.roster.len(),
                state.raffle.pool().len(),
                if state.raffle.allow_repeat() { "on" } else { "off" }
            ),
            Effect::Added(n) => format!("✅ Added {} names ({} total)", n, state.roster.len()),
            Effect::Removed(entry) => format!("Removed {} {}", entry.id, entry.name),
            Effect::NotFound(id) => format!("No entry {}", id),
            Effect::DuplicatesRemoved(n) => format!("Removed {} duplicates", n),
            Effect::ClearPending => "Type 'confirm' to clear the roster or 'cancel'".to_string(),
            Effect::Cleared(n) => format!("Cleared {} entries", n),
            Effect::Winner(entry) => format!(
                "🎉 {} ({} left in pool)",
                entry.name,
                state.raffle.pool().len()
            ),
            Effect::PoolExhausted => "Pool is empty, type 'reset' to start over".to_string(),
            Effect::Grouped(n) => {
                let mut out = format!("✅ {} groups", n);
                for line in render_groups(&state.groups) {
                    out.push('\n');
                    out.push_str(&line);
                }
                out
            }
            Effect::NothingToGroup => "Roster is empty, nothing to group".to_string(),
        }
    }
}

pub fn render_roster(state: &AppState) -> Vec<String> {
    let mut lines = vec![format!("当前名单 ({})", state.roster.len())];
    let duplicates = state.roster.find_duplicate_names();
    for entry in state.roster.entries() {
        if duplicates.contains(&entry.name) {
            lines.push(format!("  {:>5}  {}  (重复)", entry.id.to_string(), entry.name));
        } else {
            lines.push(format!("  {:>5}  {}", entry.id.to_string(), entry.name));
        }
    }
    lines
}

pub fn render_history(state: &AppState) -> Vec<String> {
    state
        .raffle
        .history()
        .iter()
        .enumerate()
        .map(|(i, e)| format!("  {}. {}", state.raffle.history().len() - i, e.name))
        .collect()
}

pub fn render_groups(groups: &[Group]) -> Vec<String> {
    groups
        .iter()
        .map(|g| {
            let members: Vec<&str> = g.members.iter().map(|m| m.name.as_str()).collect();
            format!("  {} ({}): {}", g.name, g.members.len(), members.join(", "))
        })
        .collect()
}
