//! Line-oriented terminal front-end.
//!
//! Each input line is either a slash command or part of the draft. A line
//! ending in `\` continues the draft on the next line; any other line
//! submits it. A leading `//` stands for a literal `/`.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::session::{ChatSession, SelectionKind};
use crate::view::{ChatView, Frame};

const HELP: &str = "\
Commands:
  /assistants        list assistants
  /stores            list vector stores
  /assistant [id]    choose an assistant (no id clears it)
  /store [id]        choose a vector store (no id clears it)
  /attach <path>     attach a file to the next message
  /detach            drop the attachment
  /back              start a new thread
  /help              show this help
  /quit              exit
End a line with \\ to keep typing on the next line.
Start a line with // to send text that begins with /.";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Final line of the draft; submits.
    Submit(String),
    /// Draft line followed by more input.
    Continue(String),
    List(SelectionKind),
    Choose(SelectionKind, String),
    Clear(SelectionKind),
    Attach(String),
    Detach,
    Back,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        match line.strip_prefix('/') {
            Some(rest) if rest.starts_with('/') => Self::draft(rest),
            Some(rest) => Self::command(line, rest),
            None => Self::draft(line),
        }
    }

    fn draft(text: &str) -> Self {
        match text.strip_suffix('\\') {
            Some(partial) => Self::Continue(partial.to_string()),
            None => Self::Submit(text.to_string()),
        }
    }

    fn command(line: &str, rest: &str) -> Self {
        let (name, arg) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(name, arg)| (name, arg.trim()));

        match (name, arg) {
            ("assistants", _) => Self::List(SelectionKind::Assistant),
            ("stores", _) => Self::List(SelectionKind::VectorStore),
            ("assistant", "") => Self::Clear(SelectionKind::Assistant),
            ("assistant", id) => Self::Choose(SelectionKind::Assistant, id.to_string()),
            ("store", "") => Self::Clear(SelectionKind::VectorStore),
            ("store", id) => Self::Choose(SelectionKind::VectorStore, id.to_string()),
            ("attach", path) if !path.is_empty() => Self::Attach(path.to_string()),
            ("detach", _) => Self::Detach,
            ("back", _) => Self::Back,
            ("help", _) => Self::Help,
            ("quit" | "exit", _) => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// Drives a [`ChatSession`] from a line reader and prints frames to a writer.
#[derive(Debug)]
pub struct Repl<R, W> {
    session: ChatSession,
    view: ChatView,
    input: R,
    output: W,
}

impl<R, W> Repl<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(session: ChatSession, view: ChatView, input: R, output: W) -> Self {
        Self {
            session,
            view,
            input,
            output,
        }
    }

    #[must_use]
    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Consume the front-end, returning the session and the writer.
    pub fn into_parts(self) -> (ChatSession, W) {
        (self.session, self.output)
    }

    /// Load the catalog while a thread is requested in the background, then
    /// process lines until EOF or `/quit`.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        self.write_line("Loading...").await?;
        self.session.start_thread();
        if let Err(err) = self.session.load_catalog().await {
            self.write_line(&format!("! could not load assistants/vector stores: {err}"))
                .await?;
        }
        self.draw().await?;

        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line).await? == 0 {
                break;
            }

            self.report_thread().await?;
            let command = Command::parse(&line);
            debug!(command = ?command, "Input parsed");
            if !self.handle(command).await? {
                break;
            }
        }

        self.output.flush().await?;
        Ok(())
    }

    /// Apply one command. Returns `false` when the loop should stop.
    pub async fn handle(&mut self, command: Command) -> anyhow::Result<bool> {
        match command {
            Command::Continue(text) => {
                let draft = format!("{}{text}\n", self.session.composer().draft());
                self.session.set_draft(draft);
                self.draw_input().await?;
            }
            Command::Submit(text) => {
                let draft = format!("{}{text}", self.session.composer().draft());
                self.session.set_draft(draft);
                self.submit().await?;
            }
            Command::List(kind) => self.list(kind).await?,
            Command::Choose(kind, id) => {
                self.session.choose(kind, id);
                self.draw().await?;
            }
            Command::Clear(kind) => {
                self.session.clear_selection(kind);
                self.draw().await?;
            }
            Command::Attach(path) => match self.session.attach_path(&path).await {
                Ok(attachment) => {
                    self.write_line(&format!(
                        "attached {} ({}, {} bytes)",
                        attachment.file_name, attachment.mime_type, attachment.size_bytes
                    ))
                    .await?;
                }
                Err(err) => self.write_line(&format!("! {err}")).await?,
            },
            Command::Detach => {
                if let Some(attachment) = self.session.detach() {
                    self.write_line(&format!("detached {}", attachment.file_name))
                        .await?;
                }
            }
            Command::Back => {
                self.session.back();
                if let Err(err) = self.session.ensure_thread().await {
                    self.write_line(&format!("! could not create a thread: {err}"))
                        .await?;
                }
                self.draw().await?;
            }
            Command::Help => self.write_line(HELP).await?,
            Command::Quit => return Ok(false),
            Command::Unknown(raw) => {
                self.write_line(&format!("unknown command: {raw} (try /help)"))
                    .await?;
            }
        }
        Ok(true)
    }

    /// Print a notice if the start-up thread request failed meanwhile.
    async fn report_thread(&mut self) -> anyhow::Result<()> {
        if let Some(Err(err)) = self.session.poll_thread().await {
            self.write_line(&format!("! could not create a thread: {err}"))
                .await?;
        }
        Ok(())
    }

    async fn submit(&mut self) -> anyhow::Result<()> {
        let pending = match self.session.begin_send() {
            Ok(Some(pending)) => pending,
            Ok(None) => return Ok(()),
            Err(err) => return self.write_line(&format!("! {err}")).await,
        };
        self.draw().await?;

        if let Err(err) = self.session.resolve(pending).await {
            self.write_line(&format!("! no response: {err}")).await?;
        }
        self.draw().await
    }

    async fn list(&mut self, kind: SelectionKind) -> anyhow::Result<()> {
        let selection = self.session.selection();
        let text = match selection.candidates(kind) {
            None => "(not loaded)".to_string(),
            Some([]) => kind.empty_notice().to_string(),
            Some(options) => options
                .iter()
                .map(|o| {
                    let mark = if selection.is_selected(kind, &o.value) { '*' } else { ' ' };
                    format!("{mark} {}  {}", o.value, o.label)
                })
                .collect::<Vec<_>>()
                .join("\n"),
        };
        self.write_line(&text).await
    }

    async fn draw(&mut self) -> anyhow::Result<()> {
        let frame = self.view.frame(&self.session);
        let text = render_frame(&frame, self.session.composer().draft());
        self.write_line(&text).await
    }

    async fn draw_input(&mut self) -> anyhow::Result<()> {
        let frame = self.view.frame(&self.session);
        let text = input_box(self.session.composer().draft(), frame.input_rows);
        self.write_line(&text).await
    }

    async fn write_line(&mut self, text: &str) -> anyhow::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        Ok(())
    }
}

fn render_frame(frame: &Frame, draft: &str) -> String {
    let rule = "─".repeat(frame.header.chars().count().max(20));
    let mut out = vec![frame.header.clone(), rule.clone()];
    out.extend(frame.rows.iter().cloned());
    out.push(rule);
    if !draft.is_empty() {
        out.push(input_box(draft, frame.input_rows));
    }
    out.join("\n")
}

/// Last `rows` lines of the draft, each prefixed with `> `.
fn input_box(draft: &str, rows: usize) -> String {
    let lines: Vec<&str> = draft.split('\n').collect();
    let start = lines.len().saturating_sub(rows);
    lines[start..]
        .iter()
        .map(|l| format!("> {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}
