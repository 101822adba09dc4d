// SPDX-License-Identifier: Apache-2.0
//! Read-only runtime registry over the fizz emoji code book.
//!
//! [`EmojiRegistry`] loads a published name→ID mapping once and answers
//! membership, forward, and reverse lookups for the rest of the process
//! lifetime. The shipped code book is embedded at build time
//! ([`EmojiRegistry::bundled`]) — there is no runtime file-path
//! configuration, a deployed artifact always carries its own copy.
//!
//! Construction is an explicit, fallible call rather than module-load magic:
//! the hosting process invokes [`EmojiRegistry::bundled`] exactly once at
//! startup and treats an `Err` as fatal. After construction the registry is
//! immutable; every field is owned, so a shared reference can be read from
//! any number of threads without locking.
//!
//! # Absence Semantics
//!
//! Queries are total functions. An unknown name or ID yields `None` — this
//! is **not** an error. Error variants are reserved for a code book that is
//! structurally broken (unparsable, duplicate IDs, the reserved sentinel 0).
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

use std::collections::{HashMap, HashSet};

use emoji_map::{EmojiId, EmojiMap};

/// The code book shipped with this build, produced by `emoji-idgen`.
const BUNDLED_JSON: &str = include_str!("../emojis.json");

/// Errors that can occur while loading a code book.
///
/// All of them are fatal for the host: the registry is foundational to any
/// consumer, so there is no degraded mode.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The code book is not a valid JSON object of name→u16.
    #[error("[EMOJI_BAD_CODEBOOK] invalid code book: {0}")]
    Parse(#[from] serde_json::Error),

    /// An entry carries the reserved sentinel ID 0 ("no emoji").
    #[error("[EMOJI_RESERVED_ID] entry {name:?} carries reserved id 0")]
    ReservedId {
        /// The offending entry's name.
        name: String,
    },

    /// Two names share an ID, so reverse lookup would be ill-defined.
    #[error("[EMOJI_DUPLICATE_ID] id {id} assigned to both {first:?} and {second:?}")]
    DuplicateId {
        /// The ID claimed twice.
        id: EmojiId,
        /// The name encountered first (iteration order, not file order).
        first: String,
        /// The name encountered second.
        second: String,
    },
}

/// Immutable name↔ID index over a loaded code book.
///
/// Three derived indexes are built once at construction: name→id, id→name,
/// and the id validity set. IDs are unique and non-zero (enforced at load),
/// so id→name is a well-defined inverse.
#[derive(Debug)]
pub struct EmojiRegistry {
    name_to_id: HashMap<String, EmojiId>,
    id_to_name: HashMap<EmojiId, String>,
    ids: HashSet<EmojiId>,
}

impl EmojiRegistry {
    /// Load the code book bundled into this artifact at build time.
    ///
    /// Call once at process startup; an `Err` means the build shipped a
    /// broken code book and the host cannot start.
    pub fn bundled() -> Result<Self, RegistryError> {
        Self::from_json(BUNDLED_JSON)
    }

    /// Parse and validate a code book from its JSON text.
    ///
    /// Rejects malformed JSON, values outside [1, 65535], the reserved
    /// sentinel ID 0, and duplicate IDs. Nothing is constructed on error.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let map: EmojiMap = serde_json::from_str(json)?;

        let mut id_to_name = HashMap::with_capacity(map.len());
        let mut ids = HashSet::with_capacity(map.len());
        for (name, &id) in &map {
            if id == EmojiId::NONE {
                return Err(RegistryError::ReservedId { name: name.clone() });
            }
            if let Some(first) = id_to_name.insert(id, name.clone()) {
                return Err(RegistryError::DuplicateId {
                    id,
                    first,
                    second: name.clone(),
                });
            }
            ids.insert(id);
        }

        Ok(Self {
            name_to_id: map.into_iter().collect(),
            id_to_name,
            ids,
        })
    }

    /// Total number of known emojis.
    pub fn count(&self) -> usize {
        self.name_to_id.len()
    }

    /// Whether `id` corresponds to a known emoji.
    pub fn is_valid(&self, id: EmojiId) -> bool {
        self.ids.contains(&id)
    }

    /// The name for `id`, or `None` if unknown.
    pub fn name_by_id(&self, id: EmojiId) -> Option<&str> {
        self.id_to_name.get(&id).map(String::as_str)
    }

    /// The ID for `name`, or `None` if unknown. Exact match only.
    pub fn id_by_name(&self, name: &str) -> Option<EmojiId> {
        self.name_to_id.get(name).copied()
    }

    /// A copy of the full name→ID mapping.
    ///
    /// The return value is independent of the registry; mutating it cannot
    /// reach the internal indexes.
    pub fn all(&self) -> EmojiMap {
        self.name_to_id
            .iter()
            .map(|(name, &id)| (name.clone(), id))
            .collect()
    }
}
