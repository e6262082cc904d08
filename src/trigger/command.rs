/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirhornCommand {
    pub sound: Option<String>,
}

/// Recognise `prefix` at the start of `content`, ignoring case.
///
/// A message with exactly one space names a sound with its second word, so
/// `!airhorn airhorn_truck` asks for that sound while `!airhorn` or any longer
/// message asks for a random one.
pub fn parse_command(content: &str, prefix: &str) -> Option<AirhornCommand> {
    let content = content.to_lowercase();
    if !content.starts_with(&prefix.to_lowercase()) {
        return None;
    }

    let sound = match content.split_once(' ') {
        Some((_, rest)) if !rest.contains(' ') && !rest.is_empty() => Some(rest.to_string()),
        _ => None,
    };
    Some(AirhornCommand { sound })
}
