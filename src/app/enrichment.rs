use crate::domain::model::{render_template, CongratulationMode, CongratulationSettings, Entry};
use crate::domain::ports::TextGenerator;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

pub const FALLBACK_CONGRATULATION: &str = "太棒了，{name}！你是今天的幸运儿！";
pub const EMPTY_REPLY_CONGRATULATION: &str = "恭喜你，{name}！";
pub const MAX_TEAM_NAMES: usize = 100;

fn fallback_team_name(n: usize) -> String {
    format!("Team {}", n)
}

pub fn fallback_team_names(count: usize) -> Vec<String> {
    (1..=count).map(fallback_team_name).collect()
}

/// Resolves display text through the generator, never failing: every
/// collaborator error turns into a local template.
pub struct Congratulator {
    generator: Arc<dyn TextGenerator>,
}

impl Congratulator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn congratulate(&self, name: &str, settings: &CongratulationSettings) -> String {
        match settings.mode {
            CongratulationMode::Template => render_template(&settings.text, name),
            CongratulationMode::Generated => {
                match self.generator.generate_congratulation(name, &settings.text).await {
                    Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
                    Ok(_) => render_template(EMPTY_REPLY_CONGRATULATION, name),
                    Err(e) => {
                        tracing::warn!("⚠️ Congratulation generation failed, using template: {}", e);
                        render_template(FALLBACK_CONGRATULATION, name)
                    }
                }
            }
        }
    }

    /// Always returns exactly `count` names, `count` capped at [`MAX_TEAM_NAMES`].
    pub async fn suggest_team_names(&self, count: usize, theme: &str) -> Vec<String> {
        let count = count.min(MAX_TEAM_NAMES);
        match self.generator.generate_team_names(count, theme).await {
            Ok(mut names) => {
                names.retain(|n| !n.trim().is_empty());
                if names.len() != count {
                    tracing::debug!("Got {} team names, expected {}", names.len(), count);
                }
                names.truncate(count);
                let have = names.len();
                names.extend((have + 1..=count).map(fallback_team_name));
                names
            }
            Err(e) => {
                tracing::warn!("⚠️ Team name generation failed, using defaults: {}", e);
                fallback_team_names(count)
            }
        }
    }
}

#[derive(Debug, Default)]
struct SlotState {
    generation: u64,
    message: Option<String>,
}

/// The one winner message on display. Each new winner starts a new
/// generation and results from older generations are dropped.
#[derive(Debug, Clone, Default)]
pub struct MessageSlot {
    inner: Arc<Mutex<SlotState>>,
}

impl MessageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SlotState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Clears the message and returns the new generation.
    pub fn begin(&self) -> u64 {
        let mut slot = self.lock();
        slot.generation += 1;
        slot.message = None;
        slot.generation
    }

    /// Stores `message` if `generation` is still current.
    pub fn publish(&self, generation: u64, message: String) -> bool {
        let mut slot = self.lock();
        if slot.generation != generation {
            tracing::debug!(
                "Discarding stale message for generation {} (current {})",
                generation,
                slot.generation
            );
            return false;
        }
        slot.message = Some(message);
        true
    }

    pub fn current(&self) -> Option<String> {
        self.lock().message.clone()
    }
}

/// Starts a one-shot enrichment task for an already final winner.
pub fn spawn_congratulation(
    congratulator: Arc<Congratulator>,
    slot: MessageSlot,
    winner: Entry,
    settings: CongratulationSettings,
) -> JoinHandle<bool> {
    let generation = slot.begin();
    tokio::spawn(async move {
        let message = congratulator.congratulate(&winner.name, &settings).await;
        slot.publish(generation, message)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::gemini::OfflineGenerator;
    use crate::domain::model::EntryId;
    use crate::utils::error::{RaffleError, Result};
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedGenerator {
        reply: String,
        teams: Vec<String>,
        delay: Duration,
    }

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate_congratulation(&self, name: &str, _style_hint: &str) -> Result<String> {
            tokio::time::sleep(self.delay).await;
            Ok(self.reply.replace("{who}", name))
        }

        async fn generate_team_names(&self, _count: usize, _theme: &str) -> Result<Vec<String>> {
            Ok(self.teams.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate_congratulation(&self, _name: &str, _style_hint: &str) -> Result<String> {
            Err(RaffleError::CollaboratorError {
                status: 500,
                message: "boom".to_string(),
            })
        }

        async fn generate_team_names(&self, _count: usize, _theme: &str) -> Result<Vec<String>> {
            Err(RaffleError::MalformedResponse {
                message: "bad".to_string(),
            })
        }
    }

    fn generated(text: &str) -> CongratulationSettings {
        CongratulationSettings {
            mode: CongratulationMode::Generated,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_template_mode_never_calls_generator() {
        let c = Congratulator::new(Arc::new(FailingGenerator));
        let settings = CongratulationSettings {
            mode: CongratulationMode::Template,
            text: "Hi {name}, {name}!".to_string(),
        };
        assert_eq!(c.congratulate("Li", &settings).await, "Hi Li, Li!");
    }

    #[tokio::test]
    async fn test_generated_mode_falls_back_when_offline() {
        let c = Congratulator::new(Arc::new(OfflineGenerator));
        let text = c.congratulate("王五", &generated("funny")).await;
        assert_eq!(text, "太棒了，王五！你是今天的幸运儿！");
    }

    #[tokio::test]
    async fn test_generated_mode_falls_back_on_error() {
        let c = Congratulator::new(Arc::new(FailingGenerator));
        let text = c.congratulate("Li", &generated("funny")).await;
        assert_eq!(text, "太棒了，Li！你是今天的幸运儿！");
    }

    #[tokio::test]
    async fn test_empty_reply_uses_short_template() {
        let c = Congratulator::new(Arc::new(FixedGenerator {
            reply: "   ".to_string(),
            teams: vec![],
            delay: Duration::ZERO,
        }));
        assert_eq!(c.congratulate("Li", &generated("x")).await, "恭喜你，Li！");
    }

    #[tokio::test]
    async fn test_team_names_padded_and_truncated() {
        let c = Congratulator::new(Arc::new(FixedGenerator {
            reply: String::new(),
            teams: vec!["Eagles".to_string(), "".to_string()],
            delay: Duration::ZERO,
        }));
        assert_eq!(c.suggest_team_names(3, "birds").await, vec!["Eagles", "Team 2", "Team 3"]);
        assert_eq!(c.suggest_team_names(1, "birds").await, vec!["Eagles"]);

        let failing = Congratulator::new(Arc::new(FailingGenerator));
        assert_eq!(failing.suggest_team_names(2, "x").await, vec!["Team 1", "Team 2"]);
    }

    #[tokio::test]
    async fn test_team_name_count_is_capped() {
        let failing = Congratulator::new(Arc::new(FailingGenerator));
        let names = failing.suggest_team_names(usize::MAX, "x").await;
        assert_eq!(names.len(), MAX_TEAM_NAMES);
        assert_eq!(names.last().map(String::as_str), Some("Team 100"));
    }

    #[test]
    fn test_slot_discards_stale_generation() {
        let slot = MessageSlot::new();
        let first = slot.begin();
        let second = slot.begin();
        assert!(!slot.publish(first, "old".to_string()));
        assert!(slot.current().is_none());
        assert!(slot.publish(second, "new".to_string()));
        assert_eq!(slot.current().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_last_winner_wins() {
        let slow = Arc::new(Congratulator::new(Arc::new(FixedGenerator {
            reply: "slow {who}".to_string(),
            teams: vec![],
            delay: Duration::from_millis(200),
        })));
        let fast = Arc::new(Congratulator::new(Arc::new(FixedGenerator {
            reply: "fast {who}".to_string(),
            teams: vec![],
            delay: Duration::ZERO,
        })));
        let slot = MessageSlot::new();

        let first = spawn_congratulation(slow, slot.clone(), Entry::new(EntryId(1), "A"), generated("x"));
        let second = spawn_congratulation(fast, slot.clone(), Entry::new(EntryId(2), "B"), generated("x"));

        assert!(second.await.unwrap());
        assert!(!first.await.unwrap());
        assert_eq!(slot.current().as_deref(), Some("fast B"));
    }
}
