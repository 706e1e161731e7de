use anyhow::{anyhow, Result};

pub fn validate_event_name(name: &str) -> Result<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(anyhow!("Event name cannot be empty"));
    }

    if name.len() > 64 {
        return Err(anyhow!("Event name cannot be longer than 64 characters"));
    }

    if name.starts_with('/') || name.starts_with('@') {
        return Err(anyhow!("Event name cannot start with '/' or '@'"));
    }

    if name.chars().any(char::is_control) {
        return Err(anyhow!("Event name cannot contain control characters"));
    }

    Ok(())
}

/// Capacity of zero means unlimited; anything else must stay in a sane range.
pub fn validate_capacity(capacity: u32) -> Result<()> {
    if capacity > 10_000 {
        return Err(anyhow!("Capacity cannot be larger than 10000"));
    }
    Ok(())
}

/// Splits the participant tail of a schedule command, requiring at least one
/// entry and that every entry is an @-mention.
pub fn validate_participants(participants: &str) -> Result<Vec<String>> {
    let mentions: Vec<String> = participants
        .split_whitespace()
        .map(str::to_string)
        .collect();

    if mentions.is_empty() {
        return Err(anyhow!("Please have at least one participant"));
    }

    for mention in &mentions {
        if !mention.starts_with('@') || mention.len() < 2 {
            return Err(anyhow!(
                "Participants must be @-mentions, '{}' is not one",
                mention
            ));
        }
    }

    Ok(mentions)
}
