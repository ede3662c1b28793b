use thiserror::Error;
use tracker_lib::Message;

/// One line of a replay script.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Command {
    /// `add <id> <origin> [payload]`
    Add(Message),
    /// `del <id>`
    Delete(String),
    /// `get <id>`
    Get(String),
    List,
    Stats,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{command}` is missing argument <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("unexpected trailing input `{0}`")]
    TrailingInput(String),
}

fn next_token(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    Some(input.split_once(char::is_whitespace).unwrap_or((input, "")))
}

fn required<'a>(
    input: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<(&'a str, &'a str), ScriptError> {
    next_token(input).ok_or(ScriptError::MissingArgument { command, argument })
}

fn no_trailing(rest: &str) -> Result<(), ScriptError> {
    match rest.trim() {
        "" => Ok(()),
        trailing => Err(ScriptError::TrailingInput(trailing.to_string())),
    }
}

/// Parses a single script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, ScriptError> {
    let line = line.trim();
    if line.starts_with('#') {
        return Ok(None);
    }
    let Some((keyword, rest)) = next_token(line) else {
        return Ok(None);
    };

    let command = match keyword {
        "add" => {
            let (id, rest) = required(rest, "add", "id")?;
            let (origin, payload) = required(rest, "add", "origin")?;
            Command::Add(Message::new(id, origin, payload.trim().as_bytes()))
        }
        "del" | "delete" => {
            let (id, rest) = required(rest, "del", "id")?;
            no_trailing(rest)?;
            Command::Delete(id.to_string())
        }
        "get" => {
            let (id, rest) = required(rest, "get", "id")?;
            no_trailing(rest)?;
            Command::Get(id.to_string())
        }
        "list" => {
            no_trailing(rest)?;
            Command::List
        }
        "stats" => {
            no_trailing(rest)?;
            Command::Stats
        }
        other => return Err(ScriptError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_with_payload() {
        assert_eq!(
            parse_line("add m1 peerA hello world"),
            Ok(Some(Command::Add(Message::new("m1", "peerA", "hello world"))))
        );
    }

    #[test]
    fn test_parse_add_without_payload() {
        assert_eq!(
            parse_line("  add   m1\tpeerA  "),
            Ok(Some(Command::Add(Message::new("m1", "peerA", Vec::<u8>::new()))))
        );
    }

    #[test]
    fn test_parse_add_missing_origin() {
        assert_eq!(
            parse_line("add m1"),
            Err(ScriptError::MissingArgument {
                command: "add",
                argument: "origin",
            })
        );
    }

    #[test]
    fn test_parse_lookups() {
        assert_eq!(parse_line("del m1"), Ok(Some(Command::Delete("m1".to_string()))));
        assert_eq!(parse_line("delete m1"), Ok(Some(Command::Delete("m1".to_string()))));
        assert_eq!(parse_line("get m2"), Ok(Some(Command::Get("m2".to_string()))));
        assert_eq!(parse_line("list"), Ok(Some(Command::List)));
        assert_eq!(parse_line("stats"), Ok(Some(Command::Stats)));
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(parse_line("# add m1 peerA"), Ok(None));
    }

    #[test]
    fn test_parse_rejects_invalid_lines() {
        assert_eq!(
            parse_line("push m1"),
            Err(ScriptError::UnknownCommand("push".to_string()))
        );
        assert_eq!(
            parse_line("get m1 m2"),
            Err(ScriptError::TrailingInput("m2".to_string()))
        );
        assert_eq!(
            parse_line("del"),
            Err(ScriptError::MissingArgument {
                command: "del",
                argument: "id",
            })
        );
    }
}
