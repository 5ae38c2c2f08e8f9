use crate::core::shuffle::shuffled;
use crate::domain::model::{Entry, Group};
use rand::Rng;

pub const MIN_GROUP_SIZE: usize = 2;
pub const MAX_GROUP_SIZE: usize = 20;
pub const DEFAULT_GROUP_SIZE: usize = 4;
pub const DEFAULT_THEME: &str = "创意小组";

pub fn clamp_group_size(size: usize) -> usize {
    size.clamp(MIN_GROUP_SIZE, MAX_GROUP_SIZE)
}

/// `{theme} 第 {n} 组`, with `n` 1-based.
pub fn group_name(theme: &str, ordinal: usize) -> String {
    format!("{} 第 {} 组", theme, ordinal)
}

pub fn group_count(roster_len: usize, group_size: usize) -> usize {
    roster_len.div_ceil(clamp_group_size(group_size))
}

/// Shuffles `entries` and slices the permutation into groups of
/// `group_size` (clamped), the last group taking the remainder.
///
/// Every call is a fresh grouping; an empty roster yields no groups.
pub fn partition<R: Rng + ?Sized>(
    entries: &[Entry],
    group_size: usize,
    theme: &str,
    rng: &mut R,
) -> Vec<Group> {
    let size = clamp_group_size(group_size);
    if size != group_size {
        tracing::debug!("Group size {} clamped to {}", group_size, size);
    }

    let stamp = chrono::Utc::now().timestamp_millis();
    let groups: Vec<Group> = shuffled(entries, rng)
        .chunks(size)
        .enumerate()
        .map(|(i, members)| Group {
            id: format!("group-{}-{}", i, stamp),
            name: group_name(theme, i + 1),
            members: members.to_vec(),
        })
        .collect();

    tracing::debug!(
        "Partitioned {} entries into {} groups of up to {}",
        entries.len(),
        groups.len(),
        size
    );
    groups
}
