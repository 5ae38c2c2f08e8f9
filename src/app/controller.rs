use crate::app::enrichment::{spawn_congratulation, Congratulator, MessageSlot};
use crate::core::draw::rolling_frames;
use crate::core::state::{reduce, Action, AppState, Effect};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Single owner of the session state.
///
/// Every change goes through [`reduce`]; winner enrichment runs as a
/// detached task that can only write the message slot.
pub struct Controller {
    state: AppState,
    rng: StdRng,
    preview_rng: StdRng,
    congratulator: Arc<Congratulator>,
    message: MessageSlot,
    pending: Option<JoinHandle<bool>>,
}

impl Controller {
    pub fn new(congratulator: Arc<Congratulator>, seed: Option<u64>) -> Self {
        Self::with_state(AppState::default(), congratulator, seed)
    }

    pub fn with_state(state: AppState, congratulator: Arc<Congratulator>, seed: Option<u64>) -> Self {
        let (rng, preview_rng) = match seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (StdRng::from_entropy(), StdRng::from_entropy()),
        };
        Self {
            state,
            rng,
            preview_rng,
            congratulator,
            message: MessageSlot::new(),
            pending: None,
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Effect {
        let state = std::mem::take(&mut self.state);
        let (state, effect) = reduce(state, action, &mut self.rng);
        self.state = state;

        if let Effect::Winner(winner) = &effect {
            tracing::info!("🎉 Winner: {} ({})", winner.name, winner.id);
            // 舊的請求不取消，結果由 MessageSlot 丟棄
            self.pending = Some(spawn_congratulation(
                Arc::clone(&self.congratulator),
                self.message.clone(),
                winner.clone(),
                self.state.congratulation.clone(),
            ));
        }
        effect
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn congratulator(&self) -> &Congratulator {
        &self.congratulator
    }

    /// Cosmetic rolling names for the current pool, from a separate RNG.
    pub fn rolling_frames(&mut self, count: usize) -> Vec<String> {
        rolling_frames(self.state.raffle.pool(), count, &mut self.preview_rng)
    }

    pub fn message(&self) -> Option<String> {
        self.message.current()
    }

    /// Waits for the latest enrichment task, then returns the message.
    pub async fn settle(&mut self) -> Option<String> {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Congratulation task ended abnormally: {}", e);
            }
        }
        self.message()
    }
}
