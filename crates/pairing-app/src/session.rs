use std::io::{self, BufRead, Write};

use pairing_core::economy::EconomyConfig;
use pairing_core::event::{EventError, EventState, RosterChange};
use pairing_core::model::player::PlayerId;
use pairing_core::model::roster::Roster;
use pairing_core::model::round::Round;
use pairing_core::pairing::Draw;
use thiserror::Error;
use tracing::{Level, event};

use crate::commands::Command;
use crate::store::{EventStore, StoreError};

const PROMPT: &str = "> ";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Store(#[from] StoreError),
}

/// Interactive loop over one event: reads commands, applies them to the
/// event state and persists every change through the store. A change whose
/// writes fail is dropped, so memory never runs ahead of disk.
pub struct Session<S, D> {
    state: EventState,
    store: S,
    draw: D,
}

impl<S: EventStore, D: Draw> Session<S, D> {
    /// Loads players, rounds and byes from `store`.
    pub fn open(store: S, economy: EconomyConfig, draw: D) -> Result<Self, SessionError> {
        let players = store.load_players()?;
        let rounds = store.load_rounds()?;
        let byes = store.load_byes()?;
        event!(
            target: "pairing_app::session",
            Level::INFO,
            players = players.len(),
            rounds = rounds.len(),
            byes = byes.len(),
            "event loaded"
        );
        let state = EventState::from_parts(Roster::from_players(players), rounds, byes, economy);
        Ok(Self { state, store, draw })
    }

    pub fn state(&self) -> &EventState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs until `q` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<(), SessionError> {
        let mut lines = input.lines();
        loop {
            output.write_all(PROMPT.as_bytes())?;
            output.flush()?;

            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    writeln!(output, "{err}")?;
                    continue;
                }
            };

            if command == Command::Quit {
                break;
            }
            self.execute(&command, &mut output)?;
        }
        Ok(())
    }

    /// Applies one command. Event errors are reported to `output`; store and
    /// terminal failures are returned.
    pub fn execute<W: Write>(&mut self, command: &Command, output: &mut W) -> Result<(), SessionError> {
        if command.is_mutating() {
            event!(
                target: "pairing_app::session",
                Level::DEBUG,
                command = ?command
            );
        }

        match self.apply(command, output) {
            Ok(()) => Ok(()),
            Err(ApplyError::Event(err)) => {
                writeln!(output, "{err}")?;
                Ok(())
            }
            Err(ApplyError::Session(err)) => Err(err),
        }
    }

    fn apply<W: Write>(&mut self, command: &Command, output: &mut W) -> Result<(), ApplyError> {
        // Mutations run on a staged copy that replaces the live state only once
        // the store accepted every write.
        match command {
            Command::List => self.write_listing(output)?,
            Command::Add { first, last } => {
                let mut next = self.state.clone();
                let player = next.register(first, last)?.clone();
                self.store.append_player(&player).map_err(SessionError::from)?;
                self.state = next;
                self.write_listing(output)?;
            }
            Command::Withdraw { id } => {
                let mut next = self.state.clone();
                let change = next.withdraw(*id)?;
                self.persist_roster(&next, change)?;
                self.state = next;
                self.write_listing(output)?;
            }
            Command::StartRound => {
                let mut next = self.state.clone();
                let round = next.start_round(&mut self.draw)?.clone();
                self.store.append_round(&round).map_err(SessionError::from)?;
                self.store
                    .save_players(next.roster().players())
                    .map_err(SessionError::from)?;
                if round.bye().is_some() {
                    self.store
                        .save_byes(next.byes())
                        .map_err(SessionError::from)?;
                }
                self.state = next;
                self.write_round(&round, output)?;
            }
            Command::ShowRound { id } => {
                let round = self.state.round(*id)?.clone();
                self.write_round(&round, output)?;
            }
            Command::BuyBack { id, chips } => {
                let mut next = self.state.clone();
                next.buy_back(*id, *chips)?;
                self.persist_roster(&next, RosterChange::default())?;
                self.state = next;
                self.write_listing(output)?;
            }
            Command::ReportChips { id, chips } => {
                let mut next = self.state.clone();
                let change = next.report_chips(*id, *chips)?;
                self.persist_roster(&next, change)?;
                self.state = next;
            }
            Command::Finish => self.write_final_totals(output)?,
            Command::Quit => {}
        }
        Ok(())
    }

    fn persist_roster(&mut self, staged: &EventState, change: RosterChange) -> Result<(), SessionError> {
        self.store.save_players(staged.roster().players())?;
        if change.byes_changed {
            self.store.save_byes(staged.byes())?;
        }
        Ok(())
    }

    fn player_line(&self, id: PlayerId) -> String {
        match self.state.roster().get(id) {
            Some(player) => player.to_string(),
            None => id.to_string(),
        }
    }

    fn write_listing<W: Write>(&self, output: &mut W) -> io::Result<()> {
        let roster = self.state.roster();
        writeln!(output, "STILL IN")?;
        for player in roster.active() {
            writeln!(output, "{player}")?;
        }
        writeln!(output, "OUT")?;
        for player in roster.withdrawn() {
            writeln!(output, "{player}")?;
        }
        writeln!(output, "TOTAL CHIPS: {}", self.state.total_chips())?;
        match self.state.current_round() {
            Some(round) => writeln!(output, "CURRENT ROUND: {}", round.id()),
            None => writeln!(output, "CURRENT ROUND: NO ROUND"),
        }
    }

    fn write_round<W: Write>(&self, round: &Round, output: &mut W) -> io::Result<()> {
        writeln!(output, "Round {}", round.id())?;
        match round.bye() {
            Some(id) => writeln!(output, "BYE: {}", self.player_line(id))?,
            None => writeln!(output, "NO BYE")?,
        }
        writeln!(output, "PAIRS:")?;
        for pair in round.pairs() {
            writeln!(
                output,
                "{} vs {}",
                self.player_line(pair.first),
                self.player_line(pair.second)
            )?;
        }
        Ok(())
    }

    fn write_final_totals<W: Write>(&self, output: &mut W) -> io::Result<()> {
        let payouts = self.state.payouts();
        writeln!(output, "FINAL TOTALS")?;
        for entry in &payouts.entries {
            writeln!(output, "{} ({}) = ${}", entry.name, entry.chips, entry.amount)?;
        }
        writeln!(output, "TOTAL CHIPS: {}", payouts.total_chips)?;
        writeln!(output, "TOTAL POT: ${}", payouts.total_pot)?;
        writeln!(output, "NET POT: ${}", payouts.net_pot)
    }
}

enum ApplyError {
    Event(EventError),
    Session(SessionError),
}

impl From<EventError> for ApplyError {
    fn from(value: EventError) -> Self {
        ApplyError::Event(value)
    }
}

impl From<SessionError> for ApplyError {
    fn from(value: SessionError) -> Self {
        ApplyError::Session(value)
    }
}

impl From<io::Error> for ApplyError {
    fn from(value: io::Error) -> Self {
        ApplyError::Session(SessionError::Io(value))
    }
}
