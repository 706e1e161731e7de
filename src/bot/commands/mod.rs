pub mod event_management;
pub mod list;
pub mod party;
pub mod schedule;

use teloxide::utils::command::{BotCommands, ParseError};

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Event Scheduler Bot commands:")]
pub enum Command {
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Start the bot")]
    Start,
    #[command(
        description = "Schedule an event: /schedule <name> <time> <@participant>...",
        parse_with = parse_schedule
    )]
    Schedule {
        name: String,
        time: String,
        participants: String,
    },
    #[command(
        description = "Create a joinable event: /party <name> <time> <capacity>",
        parse_with = parse_party
    )]
    Party {
        name: String,
        time: String,
        capacity: u32,
    },
    #[command(description = "Join a party event")]
    Join { name: String },
    #[command(description = "Leave a party event")]
    Leave { name: String },
    #[command(
        description = "Move an event to a new time: /reschedule <name> <time>",
        parse_with = parse_reschedule
    )]
    Reschedule { name: String, time: String },
    #[command(description = "Cancel a scheduled event")]
    Cancel { name: String },
    #[command(description = "Show the time remaining until an event")]
    Remaining { name: String },
    #[command(description = "Show the time remaining for every event")]
    ListAll,
}

/// `<name> <time tokens...> <@participant>...` with the participant list
/// starting at the first @-token.
fn parse_schedule(input: String) -> Result<(String, String, String), ParseError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(ParseError::TooFewArguments {
            expected: 3,
            found: tokens.len(),
            message: "expected <name> <time> <@participant>...".to_string(),
        });
    }

    let first_mention = tokens
        .iter()
        .position(|t| t.starts_with('@'))
        .ok_or_else(|| ParseError::Custom("at least one @participant is required".into()))?;
    if first_mention < 2 {
        return Err(ParseError::Custom(
            "a start time must come before the participant list".into(),
        ));
    }

    let name = tokens[0].to_string();
    let time = tokens[1..first_mention].join(" ");
    let participants = tokens[first_mention..].join(" ");
    Ok((name, time, participants))
}

/// `<name> <time tokens...> <capacity>` with the capacity as the last token.
fn parse_party(input: String) -> Result<(String, String, u32), ParseError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(ParseError::TooFewArguments {
            expected: 3,
            found: tokens.len(),
            message: "expected <name> <time> <capacity>".to_string(),
        });
    }

    let name = tokens[0].to_string();
    let capacity: u32 = tokens[tokens.len() - 1]
        .parse()
        .map_err(|_| ParseError::Custom("the last argument must be a numeric capacity".into()))?;
    let time = tokens[1..tokens.len() - 1].join(" ");
    Ok((name, time, capacity))
}

/// `<name> <time tokens...>`
fn parse_reschedule(input: String) -> Result<(String, String), ParseError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(ParseError::TooFewArguments {
            expected: 2,
            found: tokens.len(),
            message: "expected <name> <time>".to_string(),
        });
    }

    let name = tokens[0].to_string();
    let time = tokens[1..].join(" ");
    Ok((name, time))
}
