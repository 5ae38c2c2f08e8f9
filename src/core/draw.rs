use crate::core::shuffle::pick_index;
use crate::domain::model::Entry;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOutcome {
    Winner(Entry),
    PoolExhausted,
}

/// One raffle session: eligible pool, newest-first history, replacement policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawSession {
    pool: Vec<Entry>,
    history: Vec<Entry>,
    allow_repeat: bool,
    last_winner: Option<Entry>,
}

impl DrawSession {
    pub fn new(entries: &[Entry], allow_repeat: bool) -> Self {
        Self {
            pool: entries.to_vec(),
            history: Vec::new(),
            allow_repeat,
            last_winner: None,
        }
    }

    /// Selects one pool entry with probability `1 / pool.len()`.
    ///
    /// An empty pool leaves the session untouched.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> DrawOutcome {
        let Some(index) = pick_index(self.pool.len(), rng) else {
            tracing::debug!("Draw requested on an empty pool");
            return DrawOutcome::PoolExhausted;
        };

        let chosen = if self.allow_repeat {
            self.pool[index].clone()
        } else {
            // 以 id 移除，同名的其他項目保持可抽
            self.pool.remove(index)
        };

        self.history.insert(0, chosen.clone());
        self.last_winner = Some(chosen.clone());
        tracing::debug!(
            entry_id = chosen.id.0,
            pool_left = self.pool.len(),
            "Drew {} {}",
            chosen.id,
            chosen.name
        );
        DrawOutcome::Winner(chosen)
    }

    /// Restores the pool to `entries` and clears history.
    pub fn reset(&mut self, entries: &[Entry]) {
        self.pool = entries.to_vec();
        self.history.clear();
        self.last_winner = None;
    }

    /// Rebuilds the pool from `entries` but keeps history. Without
    /// replacement, entries already drawn stay out until [`Self::reset`].
    pub fn resync(&mut self, entries: &[Entry]) {
        self.pool = if self.allow_repeat {
            entries.to_vec()
        } else {
            entries
                .iter()
                .filter(|e| !self.history.iter().any(|h| h.id == e.id))
                .cloned()
                .collect()
        };
        if let Some(winner) = &self.last_winner {
            if !entries.iter().any(|e| e.id == winner.id) {
                self.last_winner = None;
            }
        }
    }

    pub fn set_allow_repeat(&mut self, allow_repeat: bool) {
        self.allow_repeat = allow_repeat;
    }

    pub fn allow_repeat(&self) -> bool {
        self.allow_repeat
    }

    pub fn pool(&self) -> &[Entry] {
        &self.pool
    }

    pub fn history(&self) -> &[Entry] {
        &self.history
    }

    pub fn last_winner(&self) -> Option<&Entry> {
        self.last_winner.as_ref()
    }

    pub fn is_exhausted(&self) -> bool {
        self.pool.is_empty()
    }
}

/// Candidate names shown while "rolling". Purely cosmetic: the caller must
/// pass an RNG that is not the one used for [`DrawSession::draw`].
pub fn rolling_frames<R: Rng + ?Sized>(pool: &[Entry], count: usize, rng: &mut R) -> Vec<String> {
    (0..count)
        .filter_map(|_| pick_index(pool.len(), rng).map(|i| pool[i].name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::roster::Roster;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn roster(n: usize) -> Roster {
        Roster::from_names((0..n).map(|i| format!("P{}", i)))
    }

    #[test]
    fn test_no_repeat_shrinks_pool_and_never_repeats() {
        let roster = roster(8);
        let mut session = DrawSession::new(roster.entries(), false);
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = HashSet::new();
        for k in 1..=5 {
            match session.draw(&mut rng) {
                DrawOutcome::Winner(e) => assert!(seen.insert(e.id)),
                DrawOutcome::PoolExhausted => panic!("pool exhausted early"),
            }
            assert_eq!(session.pool().len(), 8 - k);
        }
        assert!(session.pool().iter().all(|e| !seen.contains(&e.id)));
    }

    #[test]
    fn test_exhaustion_rejects_further_draws() {
        let roster = roster(5);
        let mut session = DrawSession::new(roster.entries(), false);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..5 {
            assert!(matches!(session.draw(&mut rng), DrawOutcome::Winner(_)));
        }
        assert!(session.is_exhausted());
        assert_eq!(session.draw(&mut rng), DrawOutcome::PoolExhausted);
        assert_eq!(session.history().len(), 5);
    }

    #[test]
    fn test_allow_repeat_keeps_pool_size() {
        let roster = roster(2);
        let mut session = DrawSession::new(roster.entries(), true);
        let mut rng = StdRng::seed_from_u64(9);
        let mut ids = Vec::new();
        for _ in 0..20 {
            if let DrawOutcome::Winner(e) = session.draw(&mut rng) {
                ids.push(e.id);
            }
            assert_eq!(session.pool().len(), 2);
        }
        let unique: HashSet<_> = ids.iter().collect();
        assert!(unique.len() < ids.len());
    }

    #[test]
    fn test_removal_is_by_id_not_name() {
        let roster = Roster::from_names(["x", "x"]);
        let mut session = DrawSession::new(roster.entries(), false);
        let mut rng = StdRng::seed_from_u64(1);
        let DrawOutcome::Winner(first) = session.draw(&mut rng) else {
            panic!("expected winner");
        };
        assert_eq!(session.pool().len(), 1);
        assert_eq!(session.pool()[0].name, "x");
        assert_ne!(session.pool()[0].id, first.id);
    }

    #[test]
    fn test_history_is_newest_first_and_reset_clears() {
        let roster = roster(3);
        let mut session = DrawSession::new(roster.entries(), false);
        let mut rng = StdRng::seed_from_u64(3);
        let DrawOutcome::Winner(a) = session.draw(&mut rng) else { panic!() };
        let DrawOutcome::Winner(b) = session.draw(&mut rng) else { panic!() };
        assert_eq!(session.history(), &[b.clone(), a]);
        assert_eq!(session.last_winner(), Some(&b));

        session.reset(roster.entries());
        assert!(session.history().is_empty());
        assert!(session.last_winner().is_none());
        assert_eq!(session.pool().len(), 3);
    }

    #[test]
    fn test_resync_keeps_drawn_entries_out() {
        let mut roster = roster(3);
        let mut session = DrawSession::new(roster.entries(), false);
        let mut rng = StdRng::seed_from_u64(4);
        let DrawOutcome::Winner(winner) = session.draw(&mut rng) else { panic!() };

        roster.add_names(["P3"]);
        session.resync(roster.entries());
        assert_eq!(session.pool().len(), 3);
        assert!(session.pool().iter().all(|e| e.id != winner.id));
        assert_eq!(session.history(), &[winner.clone()]);

        session.set_allow_repeat(true);
        session.resync(roster.entries());
        assert_eq!(session.pool().len(), 4);
    }

    #[test]
    fn test_single_draw_is_uniform() {
        let roster = roster(5);
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 50_000;
        let mut counts = [0usize; 5];
        for _ in 0..trials {
            let mut session = DrawSession::new(roster.entries(), false);
            if let DrawOutcome::Winner(e) = session.draw(&mut rng) {
                counts[e.id.0 as usize] += 1;
            }
        }
        let expected = trials as f64 / 5.0;
        let chi2: f64 = counts
            .iter()
            .map(|&c| (c as f64 - expected).powi(2) / expected)
            .sum();
        // df = 4, p = 0.001
        assert!(chi2 < 18.47, "chi-square too large: {} ({:?})", chi2, counts);
    }

    #[test]
    fn test_rolling_frames_come_from_pool() {
        let roster = roster(4);
        let mut rng = StdRng::seed_from_u64(8);
        let frames = rolling_frames(roster.entries(), 30, &mut rng);
        assert_eq!(frames.len(), 30);
        assert!(frames.iter().all(|n| n.starts_with('P')));
        assert!(rolling_frames(&[], 30, &mut rng).is_empty());
    }
}
