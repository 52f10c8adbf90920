//! Interactive text shell around a [`GameSession`].
//!
//! A reader thread turns stdin lines into commands and feeds them to the
//! main loop over a channel. Between commands the loop polls the session so
//! computer moves are applied as soon as their search finishes.

use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::command::{Command, parse_command};
use crate::error::{SessionError, ShellError};
use crate::session::{GameSession, SessionEvent};

/// How often the loop checks for a finished search while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Events processed by the shell loop.
enum ShellEvent {
    Input(Result<Command, ShellError>),
    InputClosed,
}

/// Line-oriented front end. Replies go to `out`.
pub struct Shell<W: Write> {
    session: GameSession,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(session: GameSession, out: W) -> Self {
        Self { session, out }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Run until `quit` or end of input. Replies are flushed after every
    /// command.
    pub fn run(mut self) -> io::Result<()> {
        let (tx, rx) = mpsc::channel::<ShellEvent>();

        std::thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                debug!(cmd = %trimmed, "received command");
                if tx.send(ShellEvent::Input(parse_command(trimmed))).is_err() {
                    return;
                }
            }
            let _ = tx.send(ShellEvent::InputClosed);
        });

        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(ShellEvent::Input(Ok(command))) => {
                    if self.execute(command)?.is_break() {
                        break;
                    }
                }
                Ok(ShellEvent::Input(Err(e))) => {
                    warn!(error = %e, "command parse error");
                    writeln!(self.out, "? {e}")?;
                }
                Ok(ShellEvent::InputClosed) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
            let events = self.session.pump();
            self.report(&events)?;
            self.out.flush()?;
        }

        let events = self.session.stop();
        self.report(&events)?;
        info!("blokit shutting down");
        Ok(())
    }

    /// Parse and run one line. Parse errors are reported, never fatal.
    pub fn handle_line(&mut self, line: &str) -> io::Result<ControlFlow<()>> {
        match parse_command(line) {
            Ok(command) => self.execute(command),
            Err(e) => {
                warn!(error = %e, "command parse error");
                writeln!(self.out, "? {e}")?;
                Ok(ControlFlow::Continue(()))
            }
        }
    }

    /// Run one command and print its reply.
    pub fn execute(&mut self, command: Command) -> io::Result<ControlFlow<()>> {
        if command == Command::Quit {
            return Ok(ControlFlow::Break(()));
        }
        match self.dispatch(command) {
            Ok(events) => {
                self.report(&events)?;
                writeln!(self.out, "=")?;
            }
            Err(e) => {
                warn!(error = %e, "command failed");
                writeln!(self.out, "? {e}")?;
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn dispatch(&mut self, command: Command) -> Result<Vec<SessionEvent>, SessionError> {
        let session = &mut self.session;
        let mut events = Vec::new();
        match command {
            Command::New(variant) => events = session.new_game(variant),
            Command::Play(mv) => events = session.play_human(mv)?,
            Command::GenMove => events = session.generate_move()?,
            Command::Stop => events = session.stop(),
            Command::Computer { color, on } => session.set_computer(color, on),
            Command::Level(level) => session.set_level(level),
            Command::Book(on) => session.set_use_book(on),
            Command::Back => {
                session.back()?;
            }
            Command::Forward => {
                session.forward()?;
            }
            Command::Begin => {
                session.to_beginning()?;
            }
            Command::End => {
                session.to_end()?;
            }
            Command::Main => {
                session.to_main_variation()?;
            }
            Command::Next => {
                session.next_variation()?;
            }
            Command::Prev => {
                session.previous_variation()?;
            }
            Command::Undo => {
                session.undo()?;
            }
            Command::Promote => session.promote()?,
            Command::MainLine => session.make_main_variation()?,
            Command::Truncate => session.truncate_children()?,
            Command::Keep => session.keep_only_subtree()?,
            Command::Comment(text) => session.set_comment(&text)?,
            Command::Annotate(annotation) => session.set_annotation(annotation)?,
            Command::Show => self.show()?,
            Command::Moves => self.list_moves()?,
            Command::Save(path) => session.save_sgf(&path)?,
            Command::Load(path) => events = session.load_sgf(&path)?,
            Command::Help => self.help()?,
            Command::Quit => {}
        }
        Ok(events)
    }

    fn report(&mut self, events: &[SessionEvent]) -> io::Result<()> {
        for event in events {
            writeln!(self.out, "{event}")?;
        }
        Ok(())
    }

    fn show(&mut self) -> Result<(), SessionError> {
        let board = self.session.board()?;
        let status = self.session.status()?;
        let comment = self.session.tree().comment(self.session.current())?.to_string();
        self.write(format_args!("{board}{status}\n"))?;
        if !comment.is_empty() {
            self.write(format_args!("comment: {comment}\n"))?;
        }
        Ok(())
    }

    fn list_moves(&mut self) -> Result<(), SessionError> {
        let tree = self.session.tree();
        let mut lines = Vec::new();
        for id in tree.path_from_root(self.session.current())? {
            let node = tree.node(id)?;
            let Some(mv) = node.color_move() else { continue };
            let mut line = format!(
                "{}. {mv}{}",
                tree.move_number(id)?,
                node.annotation().symbol()
            );
            if !node.comment().is_empty() {
                line.push_str(&format!(" ({})", node.comment()));
            }
            if node.parent().is_some_and(|p| p.children().len() > 1) {
                line.push_str(" *");
            }
            lines.push(line);
        }
        for line in lines {
            self.write(format_args!("{line}\n"))?;
        }
        Ok(())
    }

    fn help(&mut self) -> Result<(), SessionError> {
        self.write(format_args!(
            "new [variant] | play <points> | genmove | stop | computer <color> [on|off]\n\
             level <1-9> | book on|off | back | forward | begin | end | main | next | prev\n\
             undo | promote | mainline | truncate | keep | comment <text> | annotate <kind>\n\
             show | moves | save <path> | load <path> | help | quit\n"
        ))
    }

    fn write(&mut self, args: std::fmt::Arguments<'_>) -> Result<(), SessionError> {
        self.out.write_fmt(args).map_err(|source| SessionError::Io {
            path: "<output>".into(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use blokit_core::Color;

    use crate::session::SessionConfig;

    fn shell() -> Shell<Vec<u8>> {
        let config = SessionConfig {
            computer: Vec::new(),
            ..SessionConfig::default()
        };
        Shell::new(GameSession::new(config), Vec::new())
    }

    fn output(shell: &Shell<Vec<u8>>) -> String {
        String::from_utf8_lossy(&shell.out).into_owned()
    }

    #[test]
    fn play_and_list_moves() {
        let mut shell = shell();
        shell.handle_line("play e10").unwrap();
        shell.handle_line("annotate good").unwrap();
        shell.handle_line("comment center").unwrap();
        shell.handle_line("play j5").unwrap();
        shell.out.clear();
        shell.handle_line("moves").unwrap();
        let out = output(&shell);
        assert!(out.contains("1. 1 e10! (center)"), "{out}");
        assert!(out.contains("2. 2 j5"), "{out}");
    }

    #[test]
    fn errors_are_reported_not_fatal() {
        let mut shell = shell();
        assert!(shell.handle_line("dance").unwrap().is_continue());
        assert!(shell.handle_line("play a1").unwrap().is_continue());
        assert!(shell.handle_line("undo").unwrap().is_continue());
        let out = output(&shell);
        assert_eq!(out.lines().filter(|l| l.starts_with("? ")).count(), 3, "{out}");
    }

    #[test]
    fn quit_breaks() {
        let mut shell = shell();
        assert!(shell.handle_line("quit").unwrap().is_break());
    }

    #[test]
    fn keep_turns_the_position_into_setup() {
        let mut shell = shell();
        shell.handle_line("play e10").unwrap();
        shell.handle_line("play j5").unwrap();
        shell.handle_line("keep").unwrap();
        let tree = shell.session().tree();
        assert_eq!(tree.len(), 1);
        assert_eq!(shell.session().current(), tree.root());
        assert!(tree.root_node().has_setup());
        assert_eq!(shell.session().board().unwrap().to_play(), Color::ALL[0]);
        assert!(!output(&shell).contains("? "), "{}", output(&shell));
    }

    #[test]
    fn show_prints_status() {
        let mut shell = shell();
        shell.handle_line("show").unwrap();
        let out = output(&shell);
        assert!(out.contains("duo move 0, 1 to play"), "{out}");
    }
}
