//! Text command grammar for the messaging bot.
//!
//! ```text
//! help
//! create
//! add <name words> to <code>
//! run <code>
//! cancel <code>
//! ```
//!
//! Keywords are matched case-insensitively; participant names keep the case
//! the sender typed. Anything that does not start with a keyword is
//! [`BotCommand::Unknown`].

use std::fmt;

use thiserror::Error;

use crate::domain::{ExchangeCode, ParticipantName};

/// Keyword of a command that carries an exchange code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCommand {
    /// `add <name> to <code>`.
    Add,
    /// `run <code>`.
    Run,
    /// `cancel <code>`.
    Cancel,
}

impl fmt::Display for CodeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Run => "run",
            Self::Cancel => "cancel",
        })
    }
}

/// Parsed bot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// List the available commands.
    Help,
    /// Open a new exchange owned by the sender.
    Create,
    /// Join exchange `code` as `name`.
    Add {
        name: ParticipantName,
        code: ExchangeCode,
    },
    /// Draw and close exchange `code`.
    Run { code: ExchangeCode },
    /// Delete exchange `code`.
    Cancel { code: ExchangeCode },
    /// Text the bot does not understand.
    Unknown,
}

/// Failures for messages that start with a keyword but are malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    /// The code is missing, non-numeric, or not positive.
    #[error("`{command}` needs a valid exchange code, got {raw:?}")]
    InvalidCode { command: CodeCommand, raw: String },
    /// `add` without a name or without `to <code>`.
    #[error("expected `add <name> to <code>`")]
    MalformedAdd,
}

fn parse_code(command: CodeCommand, raw: Option<&str>) -> Result<ExchangeCode, CommandParseError> {
    let invalid = || CommandParseError::InvalidCode {
        command,
        raw: raw.unwrap_or_default().to_owned(),
    };
    let value = raw.ok_or_else(invalid)?.parse::<i64>().map_err(|_| invalid())?;
    ExchangeCode::new(value).map_err(|_| invalid())
}

fn parse_add(words: &[&str]) -> Result<BotCommand, CommandParseError> {
    // words[0] is the keyword; the tail must read `<name...> to <code>`.
    let [_, name_words @ .., to, code] = words else {
        return Err(CommandParseError::MalformedAdd);
    };
    if !to.eq_ignore_ascii_case("to") || name_words.is_empty() {
        return Err(CommandParseError::MalformedAdd);
    }
    let code = parse_code(CodeCommand::Add, Some(code))?;
    let name =
        ParticipantName::new(name_words.join(" ")).map_err(|_| CommandParseError::MalformedAdd)?;
    Ok(BotCommand::Add { name, code })
}

impl BotCommand {
    /// Parse a raw message body.
    ///
    /// # Examples
    /// ```
    /// use backend::inbound::bot::BotCommand;
    ///
    /// let command = BotCommand::parse("  ADD Mary Jane to 9 ").expect("valid add");
    /// match command {
    ///     BotCommand::Add { name, code } => {
    ///         assert_eq!(name.as_str(), "Mary Jane");
    ///         assert_eq!(code.get(), 9);
    ///     }
    ///     other => panic!("unexpected command: {other:?}"),
    /// }
    /// ```
    pub fn parse(message: &str) -> Result<Self, CommandParseError> {
        let words: Vec<&str> = message.split_whitespace().collect();
        let Some(keyword) = words.first().map(|word| word.to_lowercase()) else {
            return Ok(Self::Unknown);
        };

        match (keyword.as_str(), words.len()) {
            ("help", 1) => Ok(Self::Help),
            ("create", 1) => Ok(Self::Create),
            ("add", _) => parse_add(&words),
            ("run", _) => Ok(Self::Run {
                code: parse_code(CodeCommand::Run, words.last().filter(|_| words.len() > 1).copied())?,
            }),
            ("cancel", _) => Ok(Self::Cancel {
                code: parse_code(
                    CodeCommand::Cancel,
                    words.last().filter(|_| words.len() > 1).copied(),
                )?,
            }),
            _ => Ok(Self::Unknown),
        }
    }
}
