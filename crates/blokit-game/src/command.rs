//! Shell command parsing.

use std::path::PathBuf;

use blokit_core::{Color, Move, Variant};

use crate::annotation::Annotation;
use crate::error::ShellError;

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `new [variant]`: start a new game.
    New(Option<Variant>),
    /// `play <points>`: play a move for the color to move.
    Play(Move),
    /// `genmove`: let the computer move for the color to move.
    GenMove,
    /// `stop`: cancel the running search.
    Stop,
    /// `computer <color> on|off`: hand a color to the computer or back.
    Computer { color: Color, on: bool },
    /// `level <n>`: set the search level.
    Level(u8),
    /// `book on|off`: enable or disable the opening book.
    Book(bool),
    /// `back`: one move back.
    Back,
    /// `forward`: one move forward along the first child.
    Forward,
    /// `begin`: go to the root.
    Begin,
    /// `end`: go to the end of the current variation.
    End,
    /// `main`: go back to the main variation.
    Main,
    /// `next`: next variation.
    Next,
    /// `prev`: previous variation.
    Prev,
    /// `undo`: delete the current move and its subtree.
    Undo,
    /// `promote`: make the current move the first alternative.
    Promote,
    /// `mainline`: put the current move on the main variation.
    MainLine,
    /// `truncate`: delete all moves after the current one.
    Truncate,
    /// `keep`: delete everything outside the current subtree.
    Keep,
    /// `comment <text>`: replace the comment of the current move.
    Comment(String),
    /// `annotate <kind>`: set the annotation of the current move.
    Annotate(Annotation),
    /// `show`: print the board and game state.
    Show,
    /// `moves`: list the moves up to the current position.
    Moves,
    /// `save <path>`: write the record.
    Save(PathBuf),
    /// `load <path>`: read a record.
    Load(PathBuf),
    /// `help`: list the commands.
    Help,
    /// `quit`: leave the shell.
    Quit,
}

/// Parse one input line into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, ShellError> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim()))
        .unwrap_or((line, ""));

    match word {
        "new" => parse_new(rest),
        "play" => parse_play(rest),
        "genmove" => Ok(Command::GenMove),
        "stop" => Ok(Command::Stop),
        "computer" => parse_computer(rest),
        "level" => parse_level(rest),
        "book" => Ok(Command::Book(parse_switch("book", rest)?)),
        "back" => Ok(Command::Back),
        "forward" => Ok(Command::Forward),
        "begin" => Ok(Command::Begin),
        "end" => Ok(Command::End),
        "main" => Ok(Command::Main),
        "next" => Ok(Command::Next),
        "prev" => Ok(Command::Prev),
        "undo" => Ok(Command::Undo),
        "promote" => Ok(Command::Promote),
        "mainline" => Ok(Command::MainLine),
        "truncate" => Ok(Command::Truncate),
        "keep" => Ok(Command::Keep),
        "comment" => Ok(Command::Comment(rest.to_string())),
        "annotate" => Ok(Command::Annotate(required("annotate", rest)?.parse()?)),
        "show" => Ok(Command::Show),
        "moves" => Ok(Command::Moves),
        "save" => Ok(Command::Save(PathBuf::from(required("save", rest)?))),
        "load" => Ok(Command::Load(PathBuf::from(required("load", rest)?))),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(ShellError::UnknownCommand(word.to_string())),
    }
}

fn required<'a>(command: &'static str, rest: &'a str) -> Result<&'a str, ShellError> {
    if rest.is_empty() {
        Err(ShellError::MissingArgument { command })
    } else {
        Ok(rest)
    }
}

fn invalid(command: &'static str, value: &str) -> ShellError {
    ShellError::InvalidArgument {
        command,
        value: value.to_string(),
    }
}

fn parse_new(rest: &str) -> Result<Command, ShellError> {
    if rest.is_empty() {
        return Ok(Command::New(None));
    }
    let variant = rest.parse().map_err(|_| invalid("new", rest))?;
    Ok(Command::New(Some(variant)))
}

fn parse_play(rest: &str) -> Result<Command, ShellError> {
    let text = required("play", rest)?;
    // Points may be separated by commas, spaces, or both.
    let joined = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",");
    let mv = joined.parse().map_err(|_| invalid("play", text))?;
    Ok(Command::Play(mv))
}

fn parse_computer(rest: &str) -> Result<Command, ShellError> {
    let mut tokens = rest.split_whitespace();
    let color_text = tokens.next().ok_or(ShellError::MissingArgument {
        command: "computer",
    })?;
    let color = color_text
        .parse()
        .map_err(|_| invalid("computer", color_text))?;
    let on = match tokens.next() {
        Some(switch) => parse_switch("computer", switch)?,
        None => true,
    };
    Ok(Command::Computer { color, on })
}

fn parse_level(rest: &str) -> Result<Command, ShellError> {
    let text = required("level", rest)?;
    let level = text.parse().map_err(|_| invalid("level", text))?;
    Ok(Command::Level(level))
}

fn parse_switch(command: &'static str, text: &str) -> Result<bool, ShellError> {
    match text {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        "" => Err(ShellError::MissingArgument { command }),
        other => Err(invalid(command, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("genmove").unwrap(), Command::GenMove);
        assert_eq!(parse_command("  back  ").unwrap(), Command::Back);
        assert_eq!(parse_command("mainline").unwrap(), Command::MainLine);
        assert_eq!(parse_command("keep").unwrap(), Command::Keep);
        assert_eq!(parse_command("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn parse_new_with_variant() {
        assert_eq!(parse_command("new").unwrap(), Command::New(None));
        assert_eq!(
            parse_command("new classic_2").unwrap(),
            Command::New(Some(Variant::ClassicTwo))
        );
        assert_eq!(
            parse_command("new Blokus Duo").unwrap(),
            Command::New(Some(Variant::Duo))
        );
        assert!(parse_command("new trigon").is_err());
    }

    #[test]
    fn parse_play_accepts_spaces_and_commas() {
        let expected: Move = "e9,e10,e11".parse().unwrap();
        assert_eq!(parse_command("play e10,e11,e9").unwrap(), Command::Play(expected.clone()));
        assert_eq!(parse_command("play e10 e11 e9").unwrap(), Command::Play(expected));
        assert_eq!(
            parse_command("play"),
            Err(ShellError::MissingArgument { command: "play" })
        );
        assert!(matches!(
            parse_command("play e10,g10"),
            Err(ShellError::InvalidArgument { command: "play", .. })
        ));
    }

    #[test]
    fn parse_computer_and_switches() {
        assert_eq!(
            parse_command("computer 2 off").unwrap(),
            Command::Computer {
                color: Color::ALL[1],
                on: false
            }
        );
        assert_eq!(
            parse_command("computer b").unwrap(),
            Command::Computer {
                color: Color::ALL[0],
                on: true
            }
        );
        assert_eq!(parse_command("book off").unwrap(), Command::Book(false));
        assert!(parse_command("book maybe").is_err());
        assert!(parse_command("computer 7").is_err());
    }

    #[test]
    fn parse_level_and_annotation() {
        assert_eq!(parse_command("level 6").unwrap(), Command::Level(6));
        assert!(parse_command("level high").is_err());
        assert_eq!(
            parse_command("annotate !!").unwrap(),
            Command::Annotate(Annotation::VeryGood)
        );
        assert_eq!(
            parse_command("comment a fine move").unwrap(),
            Command::Comment("a fine move".to_string())
        );
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert_eq!(
            parse_command("resign"),
            Err(ShellError::UnknownCommand("resign".to_string()))
        );
    }
}
