use crate::core::draw::{DrawOutcome, DrawSession};
use crate::core::partition::{self, DEFAULT_GROUP_SIZE, DEFAULT_THEME};
use crate::core::roster::{sample_names_with_duplicate, Roster};
use crate::domain::model::{
    CongratulationMode, CongratulationSettings, Entry, EntryId, Group, View,
};
use rand::Rng;

/// Everything one session knows. Owned by a single controller and only
/// changed through [`reduce`].
#[derive(Debug, Clone)]
pub struct AppState {
    pub roster: Roster,
    pub view: View,
    pub raffle: DrawSession,
    pub groups: Vec<Group>,
    pub group_size: usize,
    pub theme: String,
    pub congratulation: CongratulationSettings,
    pub confirming_clear: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            roster: Roster::new(),
            view: View::Input,
            raffle: DrawSession::default(),
            groups: Vec::new(),
            group_size: DEFAULT_GROUP_SIZE,
            theme: DEFAULT_THEME.to_string(),
            congratulation: CongratulationSettings::default(),
            confirming_clear: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddNames(Vec<String>),
    LoadSample,
    RemoveEntry(EntryId),
    RemoveDuplicates,
    RequestClear,
    ConfirmClear,
    CancelClear,
    SwitchView(View),
    SetAllowRepeat(bool),
    Draw,
    ResetRaffle,
    SetGroupSize(usize),
    SetTheme(String),
    Partition,
    SetCongratulation {
        mode: CongratulationMode,
        text: String,
    },
}

/// What the presentation side should do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Added(usize),
    Removed(Entry),
    NotFound(EntryId),
    DuplicatesRemoved(usize),
    ClearPending,
    Cleared(usize),
    /// A winner is final; enrichment may start now.
    Winner(Entry),
    PoolExhausted,
    Grouped(usize),
    NothingToGroup,
}

/// Applies `action` to `state`. The RNG is the only outside input.
pub fn reduce<R: Rng + ?Sized>(mut state: AppState, action: Action, rng: &mut R) -> (AppState, Effect) {
    let effect = match action {
        Action::AddNames(names) => {
            let added = state.roster.add_names(names).len();
            roster_changed(&mut state);
            Effect::Added(added)
        }
        Action::LoadSample => {
            let added = state.roster.add_names(sample_names_with_duplicate()).len();
            roster_changed(&mut state);
            Effect::Added(added)
        }
        Action::RemoveEntry(id) => match state.roster.remove(id) {
            Some(entry) => {
                roster_changed(&mut state);
                Effect::Removed(entry)
            }
            None => Effect::NotFound(id),
        },
        Action::RemoveDuplicates => {
            let dropped = state.roster.remove_duplicates();
            if dropped > 0 {
                roster_changed(&mut state);
            }
            Effect::DuplicatesRemoved(dropped)
        }
        Action::RequestClear => {
            if state.roster.is_empty() {
                Effect::None
            } else {
                state.confirming_clear = true;
                Effect::ClearPending
            }
        }
        Action::ConfirmClear => {
            if state.confirming_clear {
                let removed = state.roster.len();
                state.roster.clear();
                roster_changed(&mut state);
                Effect::Cleared(removed)
            } else {
                Effect::None
            }
        }
        Action::CancelClear => {
            state.confirming_clear = false;
            Effect::None
        }
        Action::SwitchView(view) => {
            state.view = view;
            Effect::None
        }
        Action::SetAllowRepeat(allow) => {
            state.raffle.set_allow_repeat(allow);
            Effect::None
        }
        Action::Draw => match state.raffle.draw(rng) {
            DrawOutcome::Winner(entry) => Effect::Winner(entry),
            DrawOutcome::PoolExhausted => Effect::PoolExhausted,
        },
        Action::ResetRaffle => {
            state.raffle.reset(state.roster.entries());
            Effect::None
        }
        Action::SetGroupSize(size) => {
            state.group_size = partition::clamp_group_size(size);
            Effect::None
        }
        Action::SetTheme(theme) => {
            state.theme = theme;
            Effect::None
        }
        Action::Partition => {
            if state.roster.is_empty() {
                state.groups.clear();
                Effect::NothingToGroup
            } else {
                state.groups =
                    partition::partition(state.roster.entries(), state.group_size, &state.theme, rng);
                Effect::Grouped(state.groups.len())
            }
        }
        Action::SetCongratulation { mode, text } => {
            state.congratulation = CongratulationSettings { mode, text };
            Effect::None
        }
    };
    (state, effect)
}

// 名單變動時同步抽獎池，歷史保留；舊分組作廢
fn roster_changed(state: &mut AppState) {
    state.confirming_clear = false;
    state.groups.clear();
    state.raffle.resync(state.roster.entries());
}
