//! Line-oriented record format shared with the flat-file store.
//!
//! Fields are separated by `;`, id lists by `,` and pairs by `|`:
//!
//! ```text
//! player:  5;six;seven;out;4,5;0
//! round:   1;2,3,4,5;;4,3|2,5
//! byes:    6,7,10
//! ```

use crate::model::bye_queue::ByeQueue;
use crate::model::player::{Player, PlayerId, PlayerStatus};
use crate::model::round::{Pair, Round};
use thiserror::Error;

const FIELD_SEP: char = ';';
const ID_SEP: char = ',';
const PAIR_SEP: char = '|';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: &'static str,
        found: usize,
    },
    #[error("line {line}: invalid {field} '{value}'")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },
}

pub fn encode_player(player: &Player) -> String {
    format!(
        "{};{};{};{};{};{}",
        player.id(),
        player.first(),
        player.last(),
        player.status().as_str(),
        join_ids(player.opponents().iter().copied()),
        player.chips()
    )
}

pub fn decode_player(line: usize, text: &str) -> Result<Player, RecordError> {
    let fields: Vec<&str> = text.split(FIELD_SEP).collect();
    if fields.len() != 6 {
        return Err(RecordError::FieldCount {
            line,
            expected: "6",
            found: fields.len(),
        });
    }

    let id = parse_id(line, "player id", fields[0])?;
    let status = fields[3]
        .parse::<PlayerStatus>()
        .map_err(|_| invalid(line, "status", fields[3]))?;
    let opponents = split_ids(line, "opponent id", fields[4])?;
    let chips = fields[5]
        .trim()
        .parse::<u32>()
        .map_err(|_| invalid(line, "chip count", fields[5]))?;

    Ok(Player::new(id, fields[1], fields[2], chips)
        .with_status(status)
        .with_opponents(opponents))
}

pub fn encode_round(round: &Round) -> String {
    let bye = round.bye().map(|id| id.to_string()).unwrap_or_default();
    let pairs = round
        .pairs()
        .iter()
        .map(|pair| format!("{}{ID_SEP}{}", pair.first, pair.second))
        .collect::<Vec<_>>()
        .join(&PAIR_SEP.to_string());
    format!(
        "{};{};{};{}",
        round.id(),
        join_ids(round.active().iter().copied()),
        bye,
        pairs
    )
}

/// Accepts the current four-field form and the older three-field form that
/// predates stored pairs.
pub fn decode_round(line: usize, text: &str) -> Result<Round, RecordError> {
    let fields: Vec<&str> = text.split(FIELD_SEP).collect();
    if !(3..=4).contains(&fields.len()) {
        return Err(RecordError::FieldCount {
            line,
            expected: "3 or 4",
            found: fields.len(),
        });
    }

    let id = fields[0]
        .trim()
        .parse::<u32>()
        .map_err(|_| invalid(line, "round id", fields[0]))?;
    let active = split_ids(line, "active id", fields[1])?;
    let bye = if fields[2].trim().is_empty() {
        None
    } else {
        Some(parse_id(line, "bye id", fields[2])?)
    };
    let pairs = match fields.get(3) {
        Some(text) if !text.trim().is_empty() => text
            .split(PAIR_SEP)
            .map(|pair| decode_pair(line, pair))
            .collect::<Result<Vec<_>, _>>()?,
        _ => Vec::new(),
    };

    Ok(Round::new(id, active, bye, pairs))
}

fn decode_pair(line: usize, text: &str) -> Result<Pair, RecordError> {
    match split_ids(line, "pair", text)?.as_slice() {
        [first, second] => Ok(Pair::new(*first, *second)),
        _ => Err(invalid(line, "pair", text)),
    }
}

pub fn encode_byes(queue: &ByeQueue) -> String {
    join_ids(queue.iter())
}

/// Bye files hold a single line; further non-blank lines are appended in
/// order, which tolerates files built up by repeated appends.
pub fn decode_byes(text: &str) -> Result<ByeQueue, RecordError> {
    let mut ids = Vec::new();
    for (index, line) in text.lines().enumerate() {
        ids.extend(split_ids(index + 1, "bye id", line)?);
    }
    Ok(ids.into_iter().collect())
}

/// Decodes every non-blank line of `text` with `decode`.
pub fn decode_lines<T>(
    text: &str,
    decode: impl Fn(usize, &str) -> Result<T, RecordError>,
) -> Result<Vec<T>, RecordError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| decode(index + 1, line))
        .collect()
}

fn join_ids(ids: impl Iterator<Item = PlayerId>) -> String {
    ids.map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(&ID_SEP.to_string())
}

fn split_ids(line: usize, field: &'static str, text: &str) -> Result<Vec<PlayerId>, RecordError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(ID_SEP)
        .map(|part| parse_id(line, field, part))
        .collect()
}

fn parse_id(line: usize, field: &'static str, text: &str) -> Result<PlayerId, RecordError> {
    text.trim()
        .parse::<PlayerId>()
        .map_err(|_| invalid(line, field, text))
}

fn invalid(line: usize, field: &'static str, value: &str) -> RecordError {
    RecordError::InvalidField {
        line,
        field,
        value: value.to_string(),
    }
}
