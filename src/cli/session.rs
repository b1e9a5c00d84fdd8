//! Interactive browse session.
//!
//! One event loop on the calling thread. The document load and stdin run on
//! helper threads and feed the same channel; everything that arrived since
//! the last frame is applied as one batch, then a new frame is drawn.

use std::io::{BufRead, Write};
use std::sync::mpsc;
use std::thread;

use tracing::{debug, info};

use crate::application::services::DocumentService;
use crate::application::{ApplicationError, ApplicationResult, RootComposer, UiEvent};
use crate::domain::{ContentKind, NodePath, ParsedDocument, Theme};
use crate::infrastructure::render::TerminalRenderer;
use crate::infrastructure::InfraError;

/// Something that happened outside the event loop.
#[derive(Debug)]
pub enum SessionMessage {
    Loaded(ApplicationResult<ParsedDocument>),
    Input(String),
    InputClosed,
}

/// A parsed line of user input.
#[derive(Debug, Clone)]
pub enum Command {
    Event(UiEvent),
    ExpandAll,
    /// Draw the current frame again
    Redraw,
    Help,
    Quit,
    Nothing,
}

/// Whether the loop keeps going after a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub const HELP: &str = "\
commands:
  /<text>                          filter roots by name or definition (/ alone clears)
  t <path>                         toggle a node, path like: src > main.js
  h <path> | endpoint|definition | <label>
                                   hover a row of a node
  l <path>                         leave the hovered row
  all                              expand every node
  theme                            switch light/dark
  r                                redraw the current tree
  ?                                this help
  q                                quit";

/// Parse one line of input.
pub fn parse_command(line: &str) -> ApplicationResult<Command> {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(query) = line.strip_prefix('/') {
        return Ok(Command::Event(UiEvent::SetQuery(query.to_string())));
    }

    let trimmed = line.trim();
    let (verb, rest) = trimmed
        .split_once(char::is_whitespace)
        .map(|(v, r)| (v, r.trim()))
        .unwrap_or((trimmed, ""));

    let command = match verb {
        "" => Command::Nothing,
        "q" | "quit" | "exit" => Command::Quit,
        "?" | "help" => Command::Help,
        "theme" => Command::Event(UiEvent::ToggleTheme),
        "all" => Command::ExpandAll,
        "r" | "reload" => Command::Redraw,
        "t" | "toggle" => Command::Event(UiEvent::Toggle(node_path(rest)?)),
        "l" | "leave" => Command::Event(UiEvent::HoverLeave(node_path(rest)?)),
        "h" | "hover" => {
            let mut parts = rest.splitn(3, '|').map(str::trim);
            let (Some(path), Some(kind), Some(label)) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(ApplicationError::InvalidCommand(
                    "usage: h <path> | endpoint|definition | <label>".into(),
                ));
            };
            let kind: ContentKind = kind.parse().map_err(ApplicationError::InvalidCommand)?;
            Command::Event(UiEvent::HoverEnter {
                path: node_path(path)?,
                kind,
                label: label.to_string(),
            })
        }
        other => {
            return Err(ApplicationError::InvalidCommand(format!(
                "unknown command: {other} (? for help)"
            )))
        }
    };
    Ok(command)
}

fn node_path(text: &str) -> ApplicationResult<NodePath> {
    let path: NodePath = text.parse().unwrap_or_default();
    if path.is_empty() {
        return Err(ApplicationError::InvalidCommand("missing node path".into()));
    }
    Ok(path)
}

/// Event loop state: the composer plus where frames go.
pub struct Session<W: Write> {
    composer: RootComposer,
    renderer: TerminalRenderer,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(theme: Theme, renderer: TerminalRenderer, out: W) -> Self {
        Self {
            composer: RootComposer::new(theme),
            renderer,
            out,
        }
    }

    pub fn composer(&self) -> &RootComposer {
        &self.composer
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run until `q` or end of input.
    pub fn run<R>(&mut self, service: DocumentService, input: R) -> Result<(), InfraError>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();

        if self.composer.begin_fetch() {
            let loader_tx = tx.clone();
            thread::spawn(move || {
                let _ = loader_tx.send(SessionMessage::Loaded(service.load()));
            });
        }

        thread::spawn(move || {
            for line in input.lines() {
                match line {
                    Ok(line) => {
                        if tx.send(SessionMessage::Input(line)).is_err() {
                            return;
                        }
                    }
                    Err(_) => break,
                }
            }
            let _ = tx.send(SessionMessage::InputClosed);
        });

        // First frame shows the empty forest while the document loads.
        self.draw()?;
        while let Ok(first) = rx.recv() {
            let batch: Vec<_> = std::iter::once(first).chain(rx.try_iter()).collect();
            if self.handle(batch)? == Flow::Stop {
                break;
            }
        }
        info!("session finished");
        Ok(())
    }

    /// Apply one batch of messages and draw a frame.
    pub fn handle(&mut self, batch: Vec<SessionMessage>) -> Result<Flow, InfraError> {
        let mut events = Vec::new();
        let mut flow = Flow::Continue;
        let mut expand_all = false;
        let mut show_help = false;

        for message in batch {
            match message {
                SessionMessage::Loaded(result) => {
                    events.extend(self.composer.complete_fetch(result));
                }
                SessionMessage::InputClosed => flow = Flow::Stop,
                SessionMessage::Input(line) => match parse_command(&line) {
                    Ok(Command::Event(event)) => events.push(event),
                    Ok(Command::ExpandAll) => expand_all = true,
                    // Every batch that continues ends with a frame
                    Ok(Command::Redraw) => {}
                    Ok(Command::Help) => show_help = true,
                    Ok(Command::Quit) => flow = Flow::Stop,
                    Ok(Command::Nothing) => {}
                    Err(e) => self.report(&e)?,
                },
            }
        }

        debug!("handle: {} events", events.len());
        for e in self.composer.apply(events) {
            self.report(&e)?;
        }
        if expand_all {
            self.composer.expand_all();
        }
        if show_help {
            writeln!(self.out, "{HELP}").map_err(|e| InfraError::io("write help", e))?;
        }
        if flow == Flow::Continue {
            self.draw()?;
        }
        Ok(flow)
    }

    fn draw(&mut self) -> Result<(), InfraError> {
        let frame = self.renderer.render(&self.composer.render());
        writeln!(self.out, "{frame}").map_err(|e| InfraError::io("write frame", e))?;
        self.out
            .flush()
            .map_err(|e| InfraError::io("flush frame", e))
    }

    fn report(&mut self, e: &ApplicationError) -> Result<(), InfraError> {
        writeln!(self.out, "error: {e}").map_err(|err| InfraError::io("write error", err))
    }
}
