use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;
use livevote_application::VotingUseCase;
use livevote_core::session::ResetConfirmation;

use crate::qr;

pub const RESET_PROMPT: &str = "Удалить всех участников и сбросить голоса? (y/N) ";

pub fn add(app: &mut VotingUseCase, name: &str, photo: &str) {
    let participant = app.add_participant(name, photo);
    println!(
        "{} #{} {} ({})",
        "Added".green(),
        app.participants().len(),
        participant.name,
        participant.id.bright_black()
    );
}

pub fn ingest(app: &mut VotingUseCase, files: &[PathBuf]) -> Result<()> {
    let report = app.ingest_photos(files);

    for participant in &report.added {
        println!("{} {}", "Added".green(), participant.name);
    }
    for (path, error) in &report.skipped {
        println!("{} {}: {}", "Skipped".yellow(), path.display(), error);
    }

    if report.added.is_empty() && !report.skipped.is_empty() {
        anyhow::bail!("None of the {} files could be added", report.skipped.len());
    }
    Ok(())
}

pub fn delete(app: &mut VotingUseCase, id: &str) {
    if app.delete_participant(id) {
        println!("{} {}", "Deleted".green(), id);
    } else {
        println!("{}", format!("No participant with id {}", id).bright_black());
    }
}

pub fn title(app: &mut VotingUseCase, text: &str) {
    app.set_session_title(text);
    println!("{} {}", "Title set:".green(), app.session_title());
}

/// Resets after asking on the terminal, unless `yes` is given.
pub fn reset(app: &mut VotingUseCase, yes: bool) -> Result<()> {
    let confirmation = if yes {
        Some(ResetConfirmation::confirmed_by_user())
    } else {
        let mut rl = rustyline::DefaultEditor::new()?;
        ResetConfirmation::from_answer(&rl.readline(RESET_PROMPT)?)
    };
    apply_reset(app, confirmation);
    Ok(())
}

pub fn apply_reset(app: &mut VotingUseCase, confirmation: Option<ResetConfirmation>) {
    match confirmation {
        Some(confirmation) => {
            app.reset(confirmation);
            println!("{}", "Session reset".green());
        }
        None => println!("{}", "Reset cancelled".bright_black()),
    }
}

pub fn url(app: &mut VotingUseCase, base: Option<String>, qr_file: Option<&Path>) -> Result<()> {
    if let Some(base) = base {
        app.set_public_base_url(base);
    }
    let url = app.public_vote_url();
    println!("{}", url);
    println!("{}", qr::terminal(&url)?);

    if let Some(path) = qr_file {
        qr::save_png(&url, path)?;
        println!("{} {}", "QR code saved to".green(), path.display());
    }
    Ok(())
}
