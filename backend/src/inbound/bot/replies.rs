//! Reply texts sent back to bot users.

use crate::domain::{ExchangeCode, Pairing};

use super::command::CodeCommand;

/// Command list sent for `help`.
pub fn help() -> Vec<String> {
    vec![
        "create: create a new secret santa".to_owned(),
        "run {code}: run the secret santa".to_owned(),
        "cancel {code}: cancel the secret santa".to_owned(),
        "add {name} to {code}: to join the secret santa".to_owned(),
    ]
}

/// Confirmation sent to the organiser of a new exchange.
pub fn created(code: ExchangeCode) -> Vec<String> {
    vec![
        "Hey! You created a new Secret Santa!".to_owned(),
        format!("*The Secret Santa code is {code}*"),
        "Give this code to your friends.".to_owned(),
        format!("When they have all joined, text 'run {code}'."),
    ]
}

/// Expected shape of an `add` message.
pub fn add_usage() -> Vec<String> {
    vec![
        "Please, send a message in the form 'add *NAME* to *CODE*'".to_owned(),
        "For example, 'add Bill to 9'".to_owned(),
    ]
}

/// Reply to `add` for a code with no exchange.
pub fn add_unknown_exchange(code: ExchangeCode) -> Vec<String> {
    let mut lines = vec![no_such_exchange(code)];
    lines.extend(add_usage());
    lines
}

/// Reply to `run` or `cancel` for a code with no exchange.
pub fn run_unknown_exchange(code: ExchangeCode) -> Vec<String> {
    vec![
        no_such_exchange(code),
        "Please, create a new Secret Santa or use a valid code.".to_owned(),
        "Send 'help' if you want to see the available commands.".to_owned(),
    ]
}

/// Line naming a code that matches no exchange.
pub fn no_such_exchange(code: ExchangeCode) -> String {
    format!("There is no Secret Santa with code {code}!")
}

/// Reply when the exchange has already been drawn.
pub fn not_open(code: ExchangeCode) -> Vec<String> {
    vec![format!("Secret Santa {code} is not open.")]
}

/// Reply when `run` finds fewer than two participants.
pub fn insufficient(code: ExchangeCode, count: usize) -> Vec<String> {
    vec![format!(
        "Secret Santa {code} has {count} participant(s); at least 2 are needed to run it."
    )]
}

/// Reply to the sender of a successful `run`.
pub fn done() -> Vec<String> {
    vec!["Secret Santa is done!".to_owned()]
}

/// Reply to a successful `cancel`.
pub fn deleted(code: ExchangeCode) -> Vec<String> {
    vec![format!("Secret Santa {code} was deleted!")]
}

/// Reply to a command whose code is missing or not a positive integer.
pub fn invalid_code(command: CodeCommand) -> Vec<String> {
    let example = match command {
        CodeCommand::Add => "add Bill to 9".to_owned(),
        CodeCommand::Run | CodeCommand::Cancel => format!("{command} 9"),
    };
    vec![
        "Please, send a valid code.".to_owned(),
        format!("For example, '{example}'"),
    ]
}

/// Fallback for text that is not a command.
pub fn unknown() -> Vec<String> {
    vec!["Sorry, I can't help you :(".to_owned()]
}

/// Apology for infrastructure failures.
pub fn unavailable() -> Vec<String> {
    vec!["Sorry, something went wrong. Please try again later.".to_owned()]
}

/// Private message telling a giver who they drew.
pub fn pairing(pairing: &Pairing) -> Vec<String> {
    vec![format!(
        "Hi {}, you got {} ({})!",
        pairing.giver.name(),
        pairing.receiver.name(),
        pairing.receiver.contact()
    )]
}
