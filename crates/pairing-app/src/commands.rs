use pairing_core::model::player::{InvalidName, PlayerId, check_name};
use thiserror::Error;

/// One line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Add { first: String, last: String },
    Withdraw { id: PlayerId },
    StartRound,
    ShowRound { id: u32 },
    BuyBack { id: PlayerId, chips: Option<u32> },
    ReportChips { id: PlayerId, chips: i64 },
    Finish,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("{0}")]
    InvalidName(#[from] InvalidName),
}

impl Command {
    /// Parses a line; the first character selects the command and the rest is
    /// split on whitespace. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = parts.collect();

        let command = match head.chars().next() {
            Some('l') => Command::List,
            Some('a') => {
                let first = args.first().ok_or(CommandError::MissingArgument("first name"))?;
                let last = args.get(1).copied().unwrap_or_default();
                check_name(first)?;
                check_name(last)?;
                Command::Add {
                    first: (*first).to_string(),
                    last: last.to_string(),
                }
            }
            Some('d') => Command::Withdraw {
                id: required(&args, 0, "player id")?,
            },
            Some('r') => match args.first() {
                Some(text) => Command::ShowRound {
                    id: number(text)?,
                },
                None => Command::StartRound,
            },
            Some('b') => Command::BuyBack {
                id: required(&args, 0, "player id")?,
                chips: args.get(1).map(|text| number(text)).transpose()?,
            },
            Some('c') => Command::ReportChips {
                id: required(&args, 0, "player id")?,
                chips: required(&args, 1, "chip count")?,
            },
            Some('f') => Command::Finish,
            Some('q') => Command::Quit,
            _ => return Err(CommandError::Unknown(head.to_string())),
        };
        Ok(Some(command))
    }

    /// Whether the command changes state that must be saved.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Add { .. }
                | Command::Withdraw { .. }
                | Command::StartRound
                | Command::BuyBack { .. }
                | Command::ReportChips { .. }
        )
    }
}

fn required<T: std::str::FromStr>(
    args: &[&str],
    index: usize,
    name: &'static str,
) -> Result<T, CommandError> {
    let text = args.get(index).ok_or(CommandError::MissingArgument(name))?;
    number(text)
}

fn number<T: std::str::FromStr>(text: &str) -> Result<T, CommandError> {
    text.parse()
        .map_err(|_| CommandError::InvalidNumber(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{Command, CommandError};
    use pairing_core::model::player::InvalidName;

    #[test]
    fn parses_every_command() {
        let cases = [
            ("l", Command::List),
            (
                "a Kent Beck",
                Command::Add {
                    first: "Kent".into(),
                    last: "Beck".into(),
                },
            ),
            (
                "a   Cher",
                Command::Add {
                    first: "Cher".into(),
                    last: String::new(),
                },
            ),
            ("d 32", Command::Withdraw { id: 32 }),
            ("r", Command::StartRound),
            ("r 1", Command::ShowRound { id: 1 }),
            ("b 9", Command::BuyBack { id: 9, chips: None }),
            (
                "b 9 5",
                Command::BuyBack {
                    id: 9,
                    chips: Some(5),
                },
            ),
            ("c 4 -2", Command::ReportChips { id: 4, chips: -2 }),
            ("f", Command::Finish),
            ("q", Command::Quit),
        ];
        for (line, expected) in cases {
            assert_eq!(Command::parse(line), Ok(Some(expected)), "line {line:?}");
        }
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(Command::parse("   "), Ok(None));
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!(
            Command::parse("z"),
            Err(CommandError::Unknown("z".to_string()))
        );
        assert_eq!(
            Command::parse("d"),
            Err(CommandError::MissingArgument("player id"))
        );
        assert_eq!(
            Command::parse("d bob"),
            Err(CommandError::InvalidNumber("bob".to_string()))
        );
        assert_eq!(
            Command::parse("c 4"),
            Err(CommandError::MissingArgument("chip count"))
        );
    }

    #[test]
    fn names_with_field_separator_are_refused() {
        assert_eq!(
            Command::parse("a Jo;hn Doe"),
            Err(CommandError::InvalidName(InvalidName {
                name: "Jo;hn".to_string()
            }))
        );
        assert_eq!(
            Command::parse("a John D;oe"),
            Err(CommandError::InvalidName(InvalidName {
                name: "D;oe".to_string()
            }))
        );
        assert_eq!(
            Command::parse("a Smith, Jr"),
            Ok(Some(Command::Add {
                first: "Smith,".into(),
                last: "Jr".into(),
            }))
        );
    }

    #[test]
    fn only_state_changes_are_mutating() {
        assert!(Command::StartRound.is_mutating());
        assert!(!Command::ShowRound { id: 1 }.is_mutating());
        assert!(!Command::List.is_mutating());
    }
}
