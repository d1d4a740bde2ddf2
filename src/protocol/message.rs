//! Peer messages and their wire form.
//!
//! On the wire a message is an `Envelope`: a single command letter plus a
//! JSON payload. Inside the crate it is a closed `Message` enum, so the
//! coordinator never matches on letters or parses text.
//!
//! | cmd | payload                                   |
//! |-----|-------------------------------------------|
//! | `n` | none                                      |
//! | `j` | `["nick", ["#stroke", "#fill"]]`          |
//! | `b` | `[["a", "b"], [["#s", "#f"], ["#s", "#f"]]]` |
//! | `d` | `[12, 3, 40, ...]`                        |
//! | `h` | `["nick", [12, null, 40, ...]]`           |
//! | `p` | `[tileId, degrees, cell]`                 |
//! | `t` | `"nick"`                                  |
//! | `g` | none                                      |

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::error::ProtocolError;
use crate::core::{Buddy, ColorPair, Placement, TileId};

/// Wire form of a message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub command: char,
    pub payload: String,
}

impl Envelope {
    #[must_use]
    pub fn new(command: char, payload: impl Into<String>) -> Self {
        Self {
            command,
            payload: payload.into(),
        }
    }
}

impl std::fmt::Display for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.command, self.payload)
    }
}

/// Every message peers exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    /// `n`: the initiator is starting a new game.
    NewGame,
    /// `j`: a peer joined and announces itself.
    Join { nick: String, colors: ColorPair },
    /// `b`: the initiator's authoritative buddy list.
    BuddyList { buddies: Vec<Buddy> },
    /// `d`: the shuffled deal order.
    Deck { order: Vec<TileId> },
    /// `h`: one seat's hand.
    Hand {
        nick: String,
        slots: Vec<Option<TileId>>,
    },
    /// `p`: an accepted placement.
    Place(Placement),
    /// `t`: whose turn it is now.
    Turn { nick: String },
    /// `g`: nobody can move.
    GameOver,
}

impl Message {
    /// The single-letter command.
    #[must_use]
    pub fn command(&self) -> char {
        match self {
            Message::NewGame => 'n',
            Message::Join { .. } => 'j',
            Message::BuddyList { .. } => 'b',
            Message::Deck { .. } => 'd',
            Message::Hand { .. } => 'h',
            Message::Place(_) => 'p',
            Message::Turn { .. } => 't',
            Message::GameOver => 'g',
        }
    }

    /// Short name for log lines.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Message::NewGame => "new game",
            Message::Join { .. } => "new joiner",
            Message::BuddyList { .. } => "buddy list",
            Message::Deck { .. } => "sending deck",
            Message::Hand { .. } => "sending hand",
            Message::Place(_) => "play a piece",
            Message::Turn { .. } => "take a turn",
            Message::GameOver => "game over",
        }
    }

    /// Convert to wire form.
    pub fn encode(&self) -> Result<Envelope, ProtocolError> {
        let command = self.command();
        let payload = match self {
            Message::NewGame | Message::GameOver => Ok(String::new()),
            Message::Join { nick, colors } => serde_json::to_string(&(nick, colors)),
            Message::BuddyList { buddies } => {
                let nicks: Vec<&str> = buddies.iter().map(|b| b.nick.as_str()).collect();
                let colors: Vec<&ColorPair> = buddies.iter().map(|b| &b.colors).collect();
                serde_json::to_string(&(nicks, colors))
            }
            Message::Deck { order } => serde_json::to_string(order),
            Message::Hand { nick, slots } => serde_json::to_string(&(nick, slots)),
            Message::Place(p) => serde_json::to_string(&(p.tile, p.orientation, p.cell)),
            Message::Turn { nick } => serde_json::to_string(nick),
        }
        .map_err(|source| ProtocolError::MalformedPayload { command, source })?;

        Ok(Envelope::new(command, payload))
    }

    /// Parse wire form.
    ///
    /// Unknown letters and payloads that do not fit the command are errors;
    /// the caller decides whether to log and drop them.
    pub fn decode(envelope: &Envelope) -> Result<Message, ProtocolError> {
        let command = envelope.command;
        let payload = envelope.payload.as_str();

        let message = match command {
            'n' => Message::NewGame,
            'g' => Message::GameOver,
            'j' => {
                let (nick, colors): (String, ColorPair) = parse(command, payload)?;
                Message::Join { nick, colors }
            }
            'b' => {
                let (nicks, colors): (Vec<String>, Vec<ColorPair>) = parse(command, payload)?;
                if nicks.len() != colors.len() {
                    return Err(malformed(command, "nick and color lists differ in length"));
                }
                let buddies = nicks
                    .into_iter()
                    .zip(colors)
                    .map(|(nick, colors)| Buddy::new(nick, colors))
                    .collect();
                Message::BuddyList { buddies }
            }
            'd' => Message::Deck {
                order: parse(command, payload)?,
            },
            'h' => {
                let (nick, slots): (String, Vec<Option<TileId>>) = parse(command, payload)?;
                Message::Hand { nick, slots }
            }
            'p' => {
                let (tile, orientation, cell): (TileId, u16, usize) = parse(command, payload)?;
                Message::Place(Placement::new(tile, orientation, cell))
            }
            't' => Message::Turn {
                nick: parse(command, payload)?,
            },
            other => return Err(ProtocolError::UnknownCommand(other)),
        };
        Ok(message)
    }
}

fn parse<T: DeserializeOwned>(command: char, payload: &str) -> Result<T, ProtocolError> {
    serde_json::from_str(payload).map_err(|source| ProtocolError::MalformedPayload { command, source })
}

fn malformed(command: char, reason: &str) -> ProtocolError {
    ProtocolError::MalformedPayload {
        command,
        source: <serde_json::Error as serde::de::Error>::custom(reason),
    }
}
