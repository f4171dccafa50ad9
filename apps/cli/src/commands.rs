//! Commands typed at the prompt.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Files,
    Upload { path: PathBuf },
    Delete { filename: String },
    Ask { question: String },
    /// Without an index, reopens the last source.
    Open { turn: Option<usize> },
    Close,
    NextPage,
    PrevPage,
    ZoomIn,
    ZoomOut,
    History,
    Viewer,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  files                 refresh and list indexed documents
  upload <path>         upload and index a document
  delete <name>         delete a document (asks for confirmation)
  ask <question>        ask a question (plain text works too)
  open [turn]           open the citation of an answer, or reopen the last source
  next | prev           page through the open document
  zoom+ | zoom-         zoom the open document
  close                 close the viewer
  history               print the transcript
  viewer                print the viewer state
  quit";

fn required<'a>(verb: &str, rest: &'a str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("usage: {verb} <argument>"))
    } else {
        Ok(rest)
    }
}

/// Parses one input line; `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "files" | "ls" => Command::Files,
        "upload" => Command::Upload {
            path: PathBuf::from(required(verb, rest)?),
        },
        "delete" | "rm" => Command::Delete {
            filename: required(verb, rest)?.to_string(),
        },
        "ask" => Command::Ask {
            question: required(verb, rest)?.to_string(),
        },
        "open" => {
            let turn = if rest.is_empty() {
                None
            } else {
                Some(
                    rest.parse()
                        .map_err(|_| format!("open expects a turn number, got '{rest}'"))?,
                )
            };
            Command::Open { turn }
        }
        "close" => Command::Close,
        "next" => Command::NextPage,
        "prev" => Command::PrevPage,
        "zoom+" | "zoom-in" => Command::ZoomIn,
        "zoom-" | "zoom-out" => Command::ZoomOut,
        "history" => Command::History,
        "viewer" => Command::Viewer,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Ask {
            question: line.to_string(),
        },
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn parses_arguments_after_the_verb() {
        assert_eq!(
            parse_command("upload  ./docs/my report.pdf "),
            Ok(Some(Command::Upload {
                path: PathBuf::from("./docs/my report.pdf")
            }))
        );
        assert_eq!(
            parse_command("delete a.pdf"),
            Ok(Some(Command::Delete {
                filename: "a.pdf".to_string()
            }))
        );
        assert_eq!(
            parse_command("open 3"),
            Ok(Some(Command::Open { turn: Some(3) }))
        );
        assert_eq!(parse_command("open"), Ok(Some(Command::Open { turn: None })));
    }

    #[test]
    fn free_text_is_a_question() {
        assert_eq!(
            parse_command("What is X?"),
            Ok(Some(Command::Ask {
                question: "What is X?".to_string()
            }))
        );
    }

    #[test]
    fn missing_arguments_are_reported() {
        assert!(parse_command("upload").is_err());
        assert!(parse_command("delete").is_err());
        assert!(parse_command("open two").is_err());
    }
}
