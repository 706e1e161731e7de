use teloxide::types::User;

/// Mention text for a user: their @username when they have one, otherwise
/// their display name. Usernames notify on their own in plain-text messages,
/// so announcements need no parse mode.
pub fn user_mention(user: &User) -> String {
    match &user.username {
        Some(username) => format!("@{username}"),
        None => user.full_name(),
    }
}

/// Escapes the characters Telegram's MarkdownV2 mode treats specially, so
/// arbitrary event names and time strings survive formatted replies.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '=' | '|'
                | '{' | '}' | '.' | '!'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
