use std::fs;
use std::io;
use std::path::Path;

use pairing_app::config::EventConfig;
use pairing_app::commands::Command;
use pairing_app::session::{Session, SessionError};
use pairing_app::store::{EventStore, FlatFileStore, StoreError};
use pairing_core::economy::EconomyConfig;
use pairing_core::model::bye_queue::ByeQueue;
use pairing_core::model::player::{Player, PlayerStatus};
use pairing_core::model::round::{Pair, Round};
use pairing_core::pairing::ScriptedDraw;
use tempfile::tempdir;

const FOUR_PLAYERS: &str = "\
2;Bob;Robertson;in;;10
3;Bill;Carpenter;in;;10
4;Mary;Smith;in;;10
5;Betty;Smythe;in;;10
9;Amy;;out;;10
";

fn store_in(dir: &Path) -> FlatFileStore {
    let config = EventConfig {
        data_dir: dir.to_path_buf(),
        ..EventConfig::default()
    };
    FlatFileStore::new(config.resolved_paths())
}

fn run(
    dir: &Path,
    economy: EconomyConfig,
    draws: &[usize],
    input: &str,
) -> (String, Session<FlatFileStore, ScriptedDraw>) {
    let draw = ScriptedDraw::new(draws.iter().copied());
    let mut session = Session::open(store_in(dir), economy, draw).expect("session opens");
    let mut output = Vec::new();
    session
        .run(input.as_bytes(), &mut output)
        .expect("session runs");
    (String::from_utf8(output).expect("utf8 output"), session)
}

#[test]
fn listing_reports_both_groups_and_totals() {
    let dir = tempdir().expect("temp dir");
    fs::write(dir.path().join("players.txt"), FOUR_PLAYERS).unwrap();

    let (output, _) = run(dir.path(), EconomyConfig::default(), &[], "l\nq\n");
    assert_eq!(
        output,
        "> STILL IN\n\
         2 Bob Robertson (10)\n\
         3 Bill Carpenter (10)\n\
         4 Mary Smith (10)\n\
         5 Betty Smythe (10)\n\
         OUT\n\
         9 Amy  (10)\n\
         TOTAL CHIPS: 50\n\
         CURRENT ROUND: NO ROUND\n\
         > "
    );
}

#[test]
fn starting_a_round_pairs_and_persists() {
    let dir = tempdir().expect("temp dir");
    fs::write(dir.path().join("players.txt"), FOUR_PLAYERS).unwrap();

    let (output, session) = run(dir.path(), EconomyConfig::default(), &[2, 1, 0], "r\nq\n");
    assert_eq!(
        output,
        "> Round 1\n\
         NO BYE\n\
         PAIRS:\n\
         4 Mary Smith (10) vs 3 Bill Carpenter (10)\n\
         2 Bob Robertson (10) vs 5 Betty Smythe (10)\n\
         > "
    );

    let expected = Round::new(
        1,
        vec![2, 3, 4, 5],
        None,
        vec![Pair::new(4, 3), Pair::new(2, 5)],
    );
    assert_eq!(session.state().rounds(), std::slice::from_ref(&expected));
    assert_eq!(
        fs::read_to_string(dir.path().join("rounds.txt")).unwrap(),
        "1;2,3,4,5;;4,3|2,5\n"
    );
    assert!(
        !dir.path().join("byes.txt").exists(),
        "even rounds leave the bye file alone"
    );

    let players = store_in(dir.path()).load_players().unwrap();
    let mary = players.iter().find(|p| p.id() == 4).unwrap();
    assert!(mary.has_faced(3));
}

#[test]
fn odd_rounds_assign_and_rotate_byes() {
    let dir = tempdir().expect("temp dir");
    let mut players = FOUR_PLAYERS.to_string();
    players.push_str("6;first;last;in;;10\n");
    fs::write(dir.path().join("players.txt"), players).unwrap();

    let (_, session) = run(
        dir.path(),
        EconomyConfig::default(),
        &[3, 2, 1, 0, 3, 2, 1, 0],
        "r\nr\nq\n",
    );
    let rounds = session.state().rounds();
    assert_eq!(rounds[0].bye(), Some(5));
    assert_eq!(rounds[0].pairs(), &[Pair::new(4, 3), Pair::new(2, 6)]);
    assert_eq!(rounds[1].bye(), Some(6));
    assert_eq!(
        fs::read_to_string(dir.path().join("byes.txt")).unwrap(),
        "5,6"
    );
}

#[test]
fn exhausted_byes_fall_back_to_oldest() {
    let dir = tempdir().expect("temp dir");
    fs::write(
        dir.path().join("players.txt"),
        "2;Bob;Robertson;in;;10\n3;Bill;Carpenter;in;;10\n4;Mary;Smith;in;;10\n",
    )
    .unwrap();
    fs::write(dir.path().join("rounds.txt"), "1;2,3,4;3;2,4\n").unwrap();
    fs::write(dir.path().join("byes.txt"), "2,3,4").unwrap();

    let (_, session) = run(dir.path(), EconomyConfig::default(), &[], "r\nq\n");
    let round = session.state().current_round().unwrap();
    assert_eq!(round.id(), 2);
    assert_eq!(round.bye(), Some(2));
    assert_eq!(
        session.state().byes().iter().collect::<Vec<_>>(),
        vec![3, 4, 2]
    );
}

#[test]
fn withdrawing_updates_roster_and_byes() {
    let dir = tempdir().expect("temp dir");
    fs::write(dir.path().join("players.txt"), FOUR_PLAYERS).unwrap();
    fs::write(dir.path().join("byes.txt"), "2,3,4").unwrap();

    let (_, session) = run(dir.path(), EconomyConfig::default(), &[], "d 3\nq\n");
    assert_eq!(
        session.state().roster().get(3).unwrap().status(),
        PlayerStatus::Withdrawn
    );
    assert_eq!(fs::read_to_string(dir.path().join("byes.txt")).unwrap(), "2,4");
    assert!(
        fs::read_to_string(dir.path().join("players.txt"))
            .unwrap()
            .contains("3;Bill;Carpenter;out;;10\n")
    );
}

#[test]
fn adding_a_player_appends_to_file() {
    let dir = tempdir().expect("temp dir");
    fs::write(
        dir.path().join("players.txt"),
        "32;Bob;Robertson;in;;10\n9;Amy;;out;;0\n",
    )
    .unwrap();

    let (output, session) = run(dir.path(), EconomyConfig::default(), &[], "a Kent Beck\nq\n");
    assert!(output.contains("33 Kent Beck (10)\n"));
    assert_eq!(session.state().roster().len(), 3);
    assert_eq!(
        fs::read_to_string(dir.path().join("players.txt")).unwrap(),
        "32;Bob;Robertson;in;;10\n9;Amy;;out;;0\n33;Kent;Beck;in;;10\n"
    );
}

#[test]
fn chip_reports_and_buy_backs() {
    let dir = tempdir().expect("temp dir");
    fs::write(dir.path().join("players.txt"), FOUR_PLAYERS).unwrap();

    let (output, session) = run(
        dir.path(),
        EconomyConfig::default(),
        &[],
        "c 4 -2\nc 2 15\nc 5 0\nb 9 5\nq\n",
    );
    assert!(output.starts_with("> Chip count must be >= 0\n> > > "));

    let roster = session.state().roster();
    assert_eq!(roster.get(4).unwrap().chips(), 10);
    assert_eq!(roster.get(2).unwrap().chips(), 15);
    assert_eq!(roster.get(5).unwrap().status(), PlayerStatus::Withdrawn);
    let amy = roster.get(9).unwrap();
    assert!(amy.is_active());
    assert_eq!(amy.chips(), 5);
}

#[test]
fn final_totals_split_net_pot() {
    let dir = tempdir().expect("temp dir");
    fs::write(
        dir.path().join("players.txt"),
        "2;Bob;Robertson;in;;55\n3;Bill;Carpenter;in;;79\n4;Mary;Smith;in;;16\n\
         5;Betty;Smythe;out;;0\n9;Amy;;out;;0\n",
    )
    .unwrap();

    let economy = EconomyConfig {
        fees: 100,
        ..EconomyConfig::default()
    };
    let (output, _) = run(dir.path(), economy, &[], "f\nq\n");
    assert_eq!(
        output,
        "> FINAL TOTALS\n\
         Bob Robertson (55) = $513\n\
         Bill Carpenter (79) = $737\n\
         Mary Smith (16) = $149\n\
         TOTAL CHIPS: 150\n\
         TOTAL POT: $1500\n\
         NET POT: $1400\n\
         > "
    );
}

#[test]
fn showing_rounds_and_reporting_errors() {
    let dir = tempdir().expect("temp dir");
    fs::write(dir.path().join("players.txt"), FOUR_PLAYERS).unwrap();
    fs::write(
        dir.path().join("rounds.txt"),
        "1;2,3,4,5;;2,3|4,5\n2;2,3,4,5,9;9;4,5|2,3\n",
    )
    .unwrap();

    let (output, _) = run(dir.path(), EconomyConfig::default(), &[], "r 2\nr 7\nx\nd 77\nq\n");
    assert_eq!(
        output,
        "> Round 2\n\
         BYE: 9 Amy  (10)\n\
         PAIRS:\n\
         4 Mary Smith (10) vs 5 Betty Smythe (10)\n\
         2 Bob Robertson (10) vs 3 Bill Carpenter (10)\n\
         > no round with id 7\n\
         > Unknown command: x\n\
         > no player with id 77\n\
         > "
    );
}

#[test]
fn names_with_separators_are_refused_and_event_reloads() {
    let dir = tempdir().expect("temp dir");
    fs::write(dir.path().join("players.txt"), FOUR_PLAYERS).unwrap();

    let (output, session) = run(
        dir.path(),
        EconomyConfig::default(),
        &[],
        "a Jo;hn Doe\nq\n",
    );
    assert_eq!(
        output,
        "> Invalid name \"Jo;hn\": names cannot contain ';' or line breaks\n> "
    );
    assert_eq!(session.state().roster().len(), 5);
    assert_eq!(
        fs::read_to_string(dir.path().join("players.txt")).unwrap(),
        FOUR_PLAYERS
    );

    let reopened = Session::open(
        store_in(dir.path()),
        EconomyConfig::default(),
        ScriptedDraw::default(),
    )
    .expect("event still loads");
    assert_eq!(reopened.state().roster().len(), 5);
}

#[test]
fn oversized_chip_reports_leave_roster_alone() {
    let dir = tempdir().expect("temp dir");
    fs::write(dir.path().join("players.txt"), FOUR_PLAYERS).unwrap();

    let (output, session) = run(
        dir.path(),
        EconomyConfig::default(),
        &[],
        "c 2 5000000000\nq\n",
    );
    assert_eq!(output, "> Chip count must be <= 4294967295\n> ");
    assert_eq!(session.state().roster().get(2).unwrap().chips(), 10);
    assert_eq!(
        fs::read_to_string(dir.path().join("players.txt")).unwrap(),
        FOUR_PLAYERS
    );
}

/// Flat-file store whose round appends always fail.
struct RoundWriteFails(FlatFileStore);

impl EventStore for RoundWriteFails {
    fn load_players(&self) -> Result<Vec<Player>, StoreError> {
        self.0.load_players()
    }

    fn load_rounds(&self) -> Result<Vec<Round>, StoreError> {
        self.0.load_rounds()
    }

    fn load_byes(&self) -> Result<ByeQueue, StoreError> {
        self.0.load_byes()
    }

    fn append_player(&mut self, player: &Player) -> Result<(), StoreError> {
        self.0.append_player(player)
    }

    fn save_players(&mut self, players: &[Player]) -> Result<(), StoreError> {
        self.0.save_players(players)
    }

    fn append_round(&mut self, _round: &Round) -> Result<(), StoreError> {
        Err(StoreError::Io {
            source: io::Error::other("disk full"),
            path: self.0.paths().rounds.clone(),
        })
    }

    fn save_byes(&mut self, byes: &ByeQueue) -> Result<(), StoreError> {
        self.0.save_byes(byes)
    }
}

#[test]
fn failed_round_write_keeps_memory_in_step_with_disk() {
    let dir = tempdir().expect("temp dir");
    let mut players = FOUR_PLAYERS.to_string();
    players.push_str("6;first;last;in;;10\n");
    fs::write(dir.path().join("players.txt"), &players).unwrap();

    let store = RoundWriteFails(store_in(dir.path()));
    let draw = ScriptedDraw::new([3, 2, 1, 0]);
    let mut session = Session::open(store, EconomyConfig::default(), draw).expect("session opens");

    let mut output = Vec::new();
    let err = session
        .execute(&Command::StartRound, &mut output)
        .expect_err("round write fails");
    assert!(matches!(err, SessionError::Store(StoreError::Io { .. })));

    let state = session.state();
    assert!(state.rounds().is_empty());
    assert!(state.byes().is_empty());
    assert!(
        state
            .roster()
            .history()
            .iter()
            .all(|(_, opponents)| opponents.is_empty())
    );
    assert!(output.is_empty());
    assert_eq!(
        fs::read_to_string(dir.path().join("players.txt")).unwrap(),
        players
    );
}
