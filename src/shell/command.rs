//! Command line parsing

/// Trim a protocol line, dropping `#` comments. Returns `None` for blank lines.
pub fn parse_command(input: &str) -> Option<String> {
    let input = match input.split_once('#') {
        Some((before, _)) => before,
        None => input,
    };

    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    Some(input.to_string())
}
