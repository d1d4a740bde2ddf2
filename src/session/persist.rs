//! Save and resume.
//!
//! The host owns the storage; the engine only reads and writes a handful of
//! string keys through `MetadataStore`. Every value is JSON text:
//!
//! | key        | value                                         |
//! |------------|-----------------------------------------------|
//! | `deck`     | deal order, `[12, 3, 40, ...]`                |
//! | `grid`     | per cell `[tileId, degrees]` or `[null, null]` |
//! | `hand-<i>` | seat `i`'s slots, `[12, null, 40, ...]`       |
//! | `score`    | the local player's score                      |
//! | `index`    | deal cursor                                   |
//! | `last`     | most recently moved tile, or `null`           |
//! | `robot`    | `"True"` in a robot game                      |
//!
//! A `Snapshot` holds the same fields typed, and can also travel as a single
//! bincode blob.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::error::RestoreError;
use crate::core::{GameState, PlayerId, TileId};
use crate::zones::CellRecord;

/// Key/value storage provided by the host.
pub trait MetadataStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

impl MetadataStore for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        BTreeMap::remove(self, key);
    }
}

impl<S: BuildHasher> MetadataStore for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        HashMap::remove(self, key);
    }
}

const ROBOT_FLAG: &str = "True";

fn hand_key(seat: usize) -> String {
    format!("hand-{seat}")
}

/// Everything a resumed game needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub deck: Vec<TileId>,
    pub grid: Vec<CellRecord>,
    pub hands: Vec<Vec<Option<TileId>>>,
    pub score: u32,
    pub index: usize,
    pub last: Option<TileId>,
    pub robot: bool,
}

impl Snapshot {
    /// Capture `state` as seen from `local`.
    #[must_use]
    pub fn capture(state: &GameState, local: PlayerId, robot: bool) -> Self {
        Self {
            deck: state.deck().serialize(),
            grid: state.grid().serialize(state.deck()),
            hands: state.hands().iter().map(|(_, h)| h.serialize()).collect(),
            score: state.score(local),
            index: state.deck().cursor(),
            last: state.last_moved(),
            robot,
        }
    }

    /// Write every field, removing stale `hand-<i>` keys from a larger game.
    pub fn save(&self, store: &mut impl MetadataStore) -> Result<(), RestoreError> {
        store.set("deck", encode("deck", &self.deck)?);
        store.set("grid", encode("grid", &self.grid)?);
        for (seat, hand) in self.hands.iter().enumerate() {
            let key = hand_key(seat);
            store.set(&key, encode(&key, hand)?);
        }
        let mut seat = self.hands.len();
        while store.get(&hand_key(seat)).is_some() {
            store.remove(&hand_key(seat));
            seat += 1;
        }
        store.set("score", encode("score", &self.score)?);
        store.set("index", encode("index", &self.index)?);
        store.set("last", encode("last", &self.last)?);
        if self.robot {
            store.set("robot", ROBOT_FLAG.to_string());
        } else {
            store.remove("robot");
        }
        Ok(())
    }

    /// Read the fields back. `Ok(None)` if no game was saved.
    pub fn load(store: &impl MetadataStore) -> Result<Option<Self>, RestoreError> {
        let Some(deck) = store.get("deck") else {
            return Ok(None);
        };

        let mut hands = Vec::new();
        while let Some(text) = store.get(&hand_key(hands.len())) {
            hands.push(decode(&hand_key(hands.len()), &text)?);
        }

        Ok(Some(Self {
            deck: decode("deck", &deck)?,
            grid: required(store, "grid")?,
            hands,
            score: optional(store, "score")?.unwrap_or(0),
            index: optional(store, "index")?.unwrap_or(0),
            last: optional(store, "last")?.flatten(),
            robot: store.get("robot").is_some_and(|v| v == ROBOT_FLAG),
        }))
    }

    /// Load the snapshot into `state`.
    ///
    /// Works on a copy and swaps it in only if every field fits, so a bad
    /// save leaves the current game as it was.
    pub fn apply(&self, state: &mut GameState, local: PlayerId) -> Result<(), RestoreError> {
        if self.hands.len() > state.player_count() {
            return Err(RestoreError::OutOfRange {
                field: "hands",
                value: self.hands.len(),
            });
        }

        let mut next = state.clone();
        next.reset();
        next.restore_deck(&self.deck)?;
        next.restore_grid(&self.grid)?;
        for (seat, slots) in self.hands.iter().enumerate() {
            next.restore_hand(PlayerId(seat as u8), slots)?;
        }
        next.set_deal_cursor(self.index)?;
        next.set_score(local, self.score);
        next.set_last_moved(self.last);

        *state = next;
        Ok(())
    }

    /// Encode as a single binary blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RestoreError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RestoreError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

fn encode<T: Serialize + ?Sized>(field: &str, value: &T) -> Result<String, RestoreError> {
    serde_json::to_string(value).map_err(|source| RestoreError::Malformed {
        field: field.to_string(),
        source,
    })
}

fn decode<T: DeserializeOwned>(field: &str, text: &str) -> Result<T, RestoreError> {
    serde_json::from_str(text).map_err(|source| RestoreError::Malformed {
        field: field.to_string(),
        source,
    })
}

fn optional<T: DeserializeOwned>(
    store: &impl MetadataStore,
    key: &str,
) -> Result<Option<T>, RestoreError> {
    store.get(key).map(|text| decode(key, &text)).transpose()
}

fn required<T: DeserializeOwned>(
    store: &impl MetadataStore,
    key: &'static str,
) -> Result<T, RestoreError> {
    optional(store, key)?.ok_or(RestoreError::Truncated {
        field: key,
        expected: 1,
        found: 0,
    })
}
