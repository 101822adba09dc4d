// SPDX-License-Identifier: Apache-2.0
//! Data model and ID allocator for the fizz emoji code book.
//!
//! The code book is an append-only mapping from human-readable emoji names to
//! compact 16-bit wire IDs, so messages can carry an ID instead of a name.
//! [`allocate`] is the only writer: given the previously published mapping and
//! a batch of candidate names, it assigns the lowest free ID to every unseen
//! name and leaves every published ID untouched.
//!
//! # Stability Invariant
//!
//! An ID, once assigned and published, refers to the same name forever.
//! Downstream wire consumers decode IDs against older copies of the code book,
//! so [`allocate`] never reassigns, renames, or reclaims. The mapping only
//! grows.
//!
//! # Determinism Invariant
//!
//! For a given previous mapping and candidate multiset, the output is
//! byte-identical across runs regardless of candidate order: new names are
//! sorted before assignment and the mapping is a [`BTreeMap`], so the JSON
//! encoder always walks it in the same order.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

/// A 16-bit emoji wire ID.
///
/// Thin newtype over `u16`. The inner value is public for zero-cost access;
/// `Display` renders the decimal value for logging and error messages. ID 0 is
/// the reserved sentinel meaning "no emoji" and is never assigned to a real
/// entry.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmojiId(pub u16);

impl EmojiId {
    /// The reserved sentinel meaning "absence of an emoji". Never assigned.
    pub const NONE: Self = Self(0);

    /// The highest assignable ID.
    pub const MAX: Self = Self(u16::MAX);

    /// The raw 16-bit value.
    pub fn get(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for EmojiId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The persisted name→ID mapping.
///
/// A `BTreeMap` so serialization order is a pure function of content.
pub type EmojiMap = BTreeMap<String, EmojiId>;

/// Errors that can occur during an allocation run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    /// No usable candidate names were supplied. A run that would write the
    /// file back unchanged is a correctness hazard for callers expecting
    /// confirmation of work done, so it is rejected outright.
    #[error("[EMOJI_NO_CANDIDATES] no emoji names provided")]
    NoCandidates,

    /// Every ID in [1, 65535] is already in use. All-or-nothing: no partial
    /// mapping is produced.
    #[error("[EMOJI_ID_EXHAUSTED] u16 ID space exhausted")]
    IdSpaceExhausted,
}

/// Result of a successful allocation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Union of the previous mapping and the newly assigned entries.
    pub map: EmojiMap,
    /// How many names received an ID in this run.
    pub added: usize,
}

/// Assign IDs to the candidate names not already present in `previous`.
///
/// Candidates are trimmed; blank entries are discarded. A name already in
/// `previous` (or repeated within `candidates`) is skipped without error —
/// reintroducing an existing name is normal. New names are assigned in
/// ascending lexicographic order, each receiving the lowest ID not used
/// anywhere in `previous`, starting from 1. Gaps in `previous` (e.g. from a
/// hand-edited file) are filled before the mapping is extended past its
/// current maximum. ID 0 is never issued; if `previous` somehow contains it,
/// it is treated as used.
///
/// # Errors
///
/// [`AllocError::NoCandidates`] if no non-blank candidate remains, and
/// [`AllocError::IdSpaceExhausted`] if a name cannot be placed within
/// [1, 65535].
pub fn allocate<I, S>(previous: EmojiMap, candidates: I) -> Result<Allocation, AllocError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    // Sorted set of genuinely new names; duplicates and known names collapse.
    let mut pending = BTreeSet::new();
    let mut usable = 0usize;
    for candidate in candidates {
        let name = candidate.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        usable += 1;
        if !previous.contains_key(name) {
            pending.insert(name.to_owned());
        }
    }
    if usable == 0 {
        return Err(AllocError::NoCandidates);
    }

    // Every ID in `previous` counts as used, including a defensively present
    // 0 and any duplicates a hand-edited file may carry.
    let used: HashSet<u16> = previous.values().map(|id| id.0).collect();

    let mut map = previous;
    let mut added = 0;
    // Monotonic cursor: IDs rejected once in this run are never re-scanned.
    // Newly assigned IDs sit behind the cursor, so `used` needs no updates.
    let mut cursor: u32 = 1;
    for name in pending {
        let id = loop {
            let Ok(candidate) = u16::try_from(cursor) else {
                return Err(AllocError::IdSpaceExhausted);
            };
            cursor += 1;
            if !used.contains(&candidate) {
                break candidate;
            }
        };
        map.insert(name, EmojiId(id));
        added += 1;
    }

    Ok(Allocation { map, added })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, u16)]) -> EmojiMap {
        entries
            .iter()
            .map(|&(name, id)| (name.to_owned(), EmojiId(id)))
            .collect()
    }

    // ── 1. first run assigns sequential IDs in name order ───────────────

    #[test]
    fn first_run_assigns_sorted_sequential_ids() {
        let out = allocate(EmojiMap::new(), ["wave", "fire", "heart"]).unwrap();
        assert_eq!(out.added, 3);
        assert_eq!(out.map, map(&[("fire", 1), ("heart", 2), ("wave", 3)]));
    }

    // ── 2. stability: existing IDs never change ─────────────────────────

    #[test]
    fn existing_ids_are_never_touched() {
        let previous = map(&[("fire", 1), ("wave", 2)]);
        let out = allocate(previous.clone(), ["wave", "party", "fire"]).unwrap();
        assert_eq!(out.added, 1);
        for (name, id) in &previous {
            assert_eq!(out.map.get(name), Some(id));
        }
        assert_eq!(out.map.get("party"), Some(&EmojiId(3)));
    }

    // ── 3. determinism: candidate order does not matter ─────────────────

    #[test]
    fn output_is_independent_of_candidate_order() {
        let previous = map(&[("clap", 4)]);
        let a = allocate(previous.clone(), ["sob", "grin", "joy"]).unwrap();
        let b = allocate(previous, ["joy", "sob", "grin"]).unwrap();
        assert_eq!(a, b);
        let ja = serde_json::to_string_pretty(&a.map).unwrap();
        let jb = serde_json::to_string_pretty(&b.map).unwrap();
        assert_eq!(ja, jb);
    }

    // ── 4. lowest-available policy ──────────────────────────────────────

    #[test]
    fn new_name_takes_lowest_free_id() {
        let previous = map(&[("a", 1), ("c", 3)]);
        let out = allocate(previous, ["b"]).unwrap();
        assert_eq!(out.map.get("b"), Some(&EmojiId(2)));
    }

    // ── 5. gaps below the maximum are respected ─────────────────────────

    #[test]
    fn gaps_are_filled_before_extending() {
        let previous = map(&[("x", 5)]);
        let out = allocate(previous, ["y"]).unwrap();
        assert_eq!(out.map.get("y"), Some(&EmojiId(1)));
    }

    // ── 6. duplicates collapse to a single assignment ───────────────────

    #[test]
    fn duplicate_candidates_get_one_id() {
        let out = allocate(EmojiMap::new(), ["ghost", "ghost", "ghost"]).unwrap();
        assert_eq!(out.added, 1);
        assert_eq!(out.map.get("ghost"), Some(&EmojiId(1)));
    }

    // ── 7. blank-only input is rejected ─────────────────────────────────

    #[test]
    fn blank_only_input_is_an_error() {
        let err = allocate(EmojiMap::new(), ["", "   ", "\t"]).unwrap_err();
        assert_eq!(err, AllocError::NoCandidates);
    }

    // ── 8. all-known input succeeds with zero additions ─────────────────

    #[test]
    fn reintroducing_known_names_is_not_an_error() {
        let previous = map(&[("fire", 1)]);
        let out = allocate(previous.clone(), ["fire"]).unwrap();
        assert_eq!(out.added, 0);
        assert_eq!(out.map, previous);
    }

    // ── 9. names are trimmed before use ─────────────────────────────────

    #[test]
    fn candidate_whitespace_is_trimmed() {
        let out = allocate(EmojiMap::new(), ["  fire  ", "fire"]).unwrap();
        assert_eq!(out.added, 1);
        assert_eq!(out.map.get("fire"), Some(&EmojiId(1)));
    }

    // ── 10. a previous ID 0 is treated as used, never re-issued ─────────

    #[test]
    fn sentinel_id_in_previous_is_never_reissued() {
        let previous = map(&[("broken", 0)]);
        let out = allocate(previous, ["fine"]).unwrap();
        assert_eq!(out.map.get("fine"), Some(&EmojiId(1)));
        assert_eq!(out.map.get("broken"), Some(&EmojiId(0)));
    }

    // ── 11. exhaustion: a full ID space fails all-or-nothing ────────────

    #[test]
    fn full_id_space_is_an_exhaustion_error() {
        let previous: EmojiMap = (1..=u16::MAX)
            .map(|id| (format!("e{id:05}"), EmojiId(id)))
            .collect();
        let err = allocate(previous, ["one_more"]).unwrap_err();
        assert_eq!(err, AllocError::IdSpaceExhausted);
    }

    // ── 12. last free slot is still assignable ──────────────────────────

    #[test]
    fn last_free_id_is_assigned() {
        let previous: EmojiMap = (1..u16::MAX)
            .map(|id| (format!("e{id:05}"), EmojiId(id)))
            .collect();
        let out = allocate(previous, ["final"]).unwrap();
        assert_eq!(out.map.get("final"), Some(&EmojiId(u16::MAX)));
    }

    // ── 13. sentinel and max consts ─────────────────────────────────────

    #[test]
    fn id_consts_and_display() {
        assert_eq!(EmojiId::NONE.get(), 0);
        assert_eq!(EmojiId::MAX.get(), 65535);
        assert_eq!(EmojiId(42).to_string(), "42");
    }
}
