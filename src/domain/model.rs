use serde::{Deserialize, Serialize};
use std::fmt;

/// Roster-scoped identity of an entry. Never reused within one roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One participant. Two entries may share a `name` and still be distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
}

impl Entry {
    pub fn new(id: EntryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub members: Vec<Entry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Input,
    Raffle,
    Grouping,
}

impl std::str::FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "input" | "roster" => Ok(View::Input),
            "raffle" | "draw" => Ok(View::Raffle),
            "grouping" | "group" => Ok(View::Grouping),
            other => Err(format!("unknown view: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CongratulationMode {
    /// Render the user template locally.
    #[default]
    Template,
    /// Ask the text generator, using the template text as a style hint.
    Generated,
}

impl std::str::FromStr for CongratulationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "template" | "fixed" => Ok(CongratulationMode::Template),
            "generated" | "ai" => Ok(CongratulationMode::Generated),
            other => Err(format!("unknown congratulation mode: {}", other)),
        }
    }
}

pub const DEFAULT_CONGRATULATION_TEMPLATE: &str = "恭喜 {name}！你是今天的幸运锦鲤！";
pub const NAME_PLACEHOLDER: &str = "{name}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CongratulationSettings {
    pub mode: CongratulationMode,
    /// Template text in `Template` mode, style hint in `Generated` mode.
    pub text: String,
}

impl Default for CongratulationSettings {
    fn default() -> Self {
        Self {
            mode: CongratulationMode::Template,
            text: DEFAULT_CONGRATULATION_TEMPLATE.to_string(),
        }
    }
}

/// Replaces every `{name}` in `template` with `name` in a single pass.
pub fn render_template(template: &str, name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, name)
}
