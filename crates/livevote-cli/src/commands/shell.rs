//! Interactive shell: one terminal acting as the admin, vote and results screens.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use livevote_application::VotingUseCase;
use livevote_core::session::ResetConfirmation;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use crate::commands::{admin, vote};
use crate::{qr, render};

const COMMANDS: [&str; 16] = [
    "#vote", "#results", "#", "back", "forward", "add", "ingest", "delete", "title", "vote",
    "reset", "url", "qr", "reload", "help", "quit",
];

/// One line typed into the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Open(String),
    Back,
    Forward,
    Add { name: String, photo: String },
    Ingest(Vec<PathBuf>),
    Delete(String),
    Title(String),
    Vote(String),
    Reset,
    Url(Option<String>),
    SaveQr(PathBuf),
    Reload,
    Help,
    Quit,
}

impl ShellCommand {
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if let Some(fragment) = line.strip_prefix('#') {
            return Ok(Self::Open(fragment.to_string()));
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head {
            "" | "reload" => Ok(Self::Reload),
            "back" => Ok(Self::Back),
            "forward" => Ok(Self::Forward),
            "add" if !rest.is_empty() => {
                // A trailing token that looks like a URL is the photo
                match rest.rsplit_once(char::is_whitespace) {
                    Some((name, photo)) if looks_like_photo(photo) => Ok(Self::Add {
                        name: name.trim().to_string(),
                        photo: photo.to_string(),
                    }),
                    _ => Ok(Self::Add {
                        name: rest.to_string(),
                        photo: String::new(),
                    }),
                }
            }
            "ingest" if !rest.is_empty() => Ok(Self::Ingest(
                rest.split_whitespace().map(PathBuf::from).collect(),
            )),
            "delete" if !rest.is_empty() => Ok(Self::Delete(rest.to_string())),
            "title" if !rest.is_empty() => Ok(Self::Title(rest.to_string())),
            "vote" if !rest.is_empty() => Ok(Self::Vote(rest.to_string())),
            "reset" => Ok(Self::Reset),
            "url" => Ok(Self::Url((!rest.is_empty()).then(|| rest.to_string()))),
            "qr" if rest.is_empty() => Ok(Self::SaveQr(PathBuf::from(qr::DEFAULT_QR_FILE))),
            "qr" => Ok(Self::SaveQr(PathBuf::from(rest))),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            "add" | "ingest" | "delete" | "title" | "vote" => {
                Err(format!("'{}' needs an argument", head))
            }
            other => Err(format!("Unknown command: {}", other)),
        }
    }
}

fn looks_like_photo(token: &str) -> bool {
    token.starts_with("http://") || token.starts_with("https://") || token.starts_with("data:")
}

/// Completion, highlighting and hints for shell commands.
#[derive(Clone)]
struct ShellHelper;

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if line.contains(' ') {
            return Ok((0, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ShellHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('#') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for ShellHelper {}

pub fn run(app: &mut VotingUseCase) -> Result<()> {
    let mut rl: Editor<ShellHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ShellHelper));

    println!("{}", "=== LiveVote ===".bright_magenta().bold());
    println!(
        "{}",
        "#vote, #results or # to switch views; 'help' for commands; 'quit' to exit."
            .bright_black()
    );
    println!();
    print!("{}", render::current_view(app));

    loop {
        let prompt = format!("{}> ", app.current_view().fragment());
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = rl.add_history_entry(trimmed);
                }

                let command = match ShellCommand::parse(trimmed) {
                    Ok(command) => command,
                    Err(message) => {
                        println!("{}", message.red());
                        continue;
                    }
                };

                match command {
                    ShellCommand::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    ShellCommand::Help => {
                        print_help();
                        continue;
                    }
                    ShellCommand::Reset => {
                        let confirmation = rl
                            .readline(admin::RESET_PROMPT)
                            .ok()
                            .and_then(|answer| ResetConfirmation::from_answer(&answer));
                        admin::apply_reset(app, confirmation);
                    }
                    command => {
                        if let Err(e) = execute(app, command) {
                            println!("{}", format!("Error: {}", e).red());
                            continue;
                        }
                    }
                }

                println!();
                print!("{}", render::current_view(app));
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

fn execute(app: &mut VotingUseCase, command: ShellCommand) -> Result<()> {
    match command {
        ShellCommand::Open(fragment) => {
            app.open_fragment(&fragment);
        }
        ShellCommand::Back => {
            app.back();
        }
        ShellCommand::Forward => {
            app.forward();
        }
        ShellCommand::Add { name, photo } => admin::add(app, &name, &photo),
        ShellCommand::Ingest(files) => admin::ingest(app, &files)?,
        ShellCommand::Delete(id) => admin::delete(app, &id),
        ShellCommand::Title(text) => admin::title(app, &text),
        ShellCommand::Vote(target) => {
            vote::vote(app, &target)?;
        }
        ShellCommand::Url(base) => admin::url(app, base, None)?,
        ShellCommand::SaveQr(path) => {
            qr::save_png(&app.public_vote_url(), &path)?;
            println!("{} {}", "QR code saved to".green(), path.display());
        }
        ShellCommand::Reload => app.reload(),
        ShellCommand::Reset | ShellCommand::Help | ShellCommand::Quit => {}
    }
    Ok(())
}

fn print_help() {
    let lines = [
        ("#vote / #results / #", "switch to the vote, results or admin view"),
        ("back / forward", "move through view history"),
        ("add <name> [photo-url]", "add a participant"),
        ("ingest <files...>", "add one participant per photo"),
        ("delete <id>", "remove a participant"),
        ("title <text>", "rename the session"),
        ("vote <number|id>", "vote from this device"),
        ("reset", "clear the roster and this device's vote"),
        ("url [base]", "print the public voting link and its QR code"),
        ("qr [file]", "save the QR code as a PNG (livevote-qr.png)"),
        ("reload", "pick up changes from other windows"),
    ];
    for (usage, description) in lines {
        println!("  {:<24} {}", usage.cyan(), description.bright_black());
    }
}
