use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use pairing_core::model::bye_queue::ByeQueue;
use pairing_core::model::player::Player;
use pairing_core::model::round::Round;
use pairing_core::records::{
    RecordError, decode_byes, decode_lines, decode_player, decode_round, encode_byes,
    encode_player, encode_round,
};
use serde::Serialize;
use thiserror::Error;

use crate::config::ResolvedPaths;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        #[source]
        source: io::Error,
        path: PathBuf,
    },
    #[error("bad record in {path:?}: {source}")]
    Record {
        #[source]
        source: RecordError,
        path: PathBuf,
    },
    #[error("failed to serialize round log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}

/// Persistence for the event's players, rounds and bye queue.
pub trait EventStore {
    fn load_players(&self) -> Result<Vec<Player>, StoreError>;
    fn load_rounds(&self) -> Result<Vec<Round>, StoreError>;
    fn load_byes(&self) -> Result<ByeQueue, StoreError>;

    fn append_player(&mut self, player: &Player) -> Result<(), StoreError>;
    fn save_players(&mut self, players: &[Player]) -> Result<(), StoreError>;
    fn append_round(&mut self, round: &Round) -> Result<(), StoreError>;
    fn save_byes(&mut self, byes: &ByeQueue) -> Result<(), StoreError>;
}

/// Plain-text files under one data directory. Missing files read as empty.
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    paths: ResolvedPaths,
}

impl FlatFileStore {
    pub fn new(paths: ResolvedPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ResolvedPaths {
        &self.paths
    }

    fn log_round(&self, round: &Round) -> Result<(), StoreError> {
        let Some(path) = self.paths.round_log.as_ref() else {
            return Ok(());
        };
        let row = RoundLogRow {
            round: round.id(),
            players: round.active().len(),
            bye: round.bye(),
            pairs: round.pairs().iter().map(|p| [p.first, p.second]).collect(),
        };
        let mut line = serde_json::to_string(&row)?;
        line.push('\n');
        append_text(path, &line)
    }
}

#[derive(Serialize)]
struct RoundLogRow {
    round: u32,
    players: usize,
    bye: Option<u32>,
    pairs: Vec<[u32; 2]>,
}

impl EventStore for FlatFileStore {
    fn load_players(&self) -> Result<Vec<Player>, StoreError> {
        let path = &self.paths.players;
        decode_lines(&read_text(path)?, decode_player).map_err(|source| record(path, source))
    }

    fn load_rounds(&self) -> Result<Vec<Round>, StoreError> {
        let path = &self.paths.rounds;
        decode_lines(&read_text(path)?, decode_round).map_err(|source| record(path, source))
    }

    fn load_byes(&self) -> Result<ByeQueue, StoreError> {
        let path = &self.paths.byes;
        decode_byes(&read_text(path)?).map_err(|source| record(path, source))
    }

    fn append_player(&mut self, player: &Player) -> Result<(), StoreError> {
        append_text(&self.paths.players, &format!("{}\n", encode_player(player)))
    }

    fn save_players(&mut self, players: &[Player]) -> Result<(), StoreError> {
        let text: String = players
            .iter()
            .map(|player| format!("{}\n", encode_player(player)))
            .collect();
        write_text(&self.paths.players, &text)
    }

    fn append_round(&mut self, round: &Round) -> Result<(), StoreError> {
        append_text(&self.paths.rounds, &format!("{}\n", encode_round(round)))?;
        self.log_round(round)
    }

    fn save_byes(&mut self, byes: &ByeQueue) -> Result<(), StoreError> {
        write_text(&self.paths.byes, &encode_byes(byes))
    }
}

fn record(path: &Path, source: RecordError) -> StoreError {
    StoreError::Record {
        source,
        path: path.to_path_buf(),
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        source,
        path: path.to_path_buf(),
    }
}

fn read_text(path: &Path) -> Result<String, StoreError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_error(path)(err)),
    }
}

fn ensure_parent(path: &Path) -> Result<(), StoreError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(io_error(dir))?;
    }
    Ok(())
}

fn write_text(path: &Path, text: &str) -> Result<(), StoreError> {
    ensure_parent(path)?;
    fs::write(path, text).map_err(io_error(path))
}

fn append_text(path: &Path, text: &str) -> Result<(), StoreError> {
    ensure_parent(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_error(path))?;
    file.write_all(text.as_bytes()).map_err(io_error(path))
}
