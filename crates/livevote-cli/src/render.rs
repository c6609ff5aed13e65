//! Text renderings of the three views.

use std::fmt::Write as _;

use colored::{ColoredString, Colorize};
use livevote_application::VotingUseCase;
use livevote_core::leaderboard::{ChartBar, Standings};
use livevote_core::view::View;

use crate::qr;

const BAR_WIDTH: usize = 30;
const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

/// Renders whichever view the router currently selects.
pub fn current_view(app: &VotingUseCase) -> String {
    let body = match app.current_view() {
        View::Admin => admin(app),
        View::Vote => vote(app),
        View::Leaderboard => leaderboard(app),
    };
    format!("{}\n{}", nav_bar(app.current_view()), body)
}

fn nav_bar(active: View) -> String {
    View::ALL
        .iter()
        .map(|view| {
            let label = format!("[{}]", view.label());
            if *view == active {
                label.bright_magenta().bold().to_string()
            } else {
                label.bright_black().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn admin(app: &VotingUseCase) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", app.session_title().bold());
    let url = app.public_vote_url();
    let _ = writeln!(out, "{} {}", "Ссылка для голосования:".bright_black(), url.cyan());
    match qr::terminal(&url) {
        Ok(art) => {
            let _ = writeln!(out, "{}", art);
        }
        Err(e) => tracing::warn!("Cannot render QR code: {}", e),
    }

    if app.participants().is_empty() {
        let _ = writeln!(out, "{}", "Участников пока нет. Добавьте: add <имя> [фото]".bright_black());
        return out;
    }

    for (idx, p) in app.participants().iter().enumerate() {
        let photo = if p.photo_url.is_empty() { "" } else { " 📷" };
        let _ = writeln!(
            out,
            "  #{:<3} {}{}  {}  {}",
            idx + 1,
            p.name,
            photo,
            format!("{} гол.", p.votes).yellow(),
            p.id.bright_black()
        );
    }
    out
}

pub fn vote(app: &VotingUseCase) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", app.session_title().bold());

    if let Some(voted_for) = app.voted_for() {
        let name = app
            .store()
            .participant(voted_for)
            .map(|p| p.name.as_str())
            .unwrap_or("участник удалён");
        let _ = writeln!(out, "{} {}", "✓ Ваш голос учтён:".green(), name);
        let _ = writeln!(out, "{}", "Смотрите результаты: #results".bright_black());
        return out;
    }

    if app.participants().is_empty() {
        let _ = writeln!(out, "{}", "Голосование ещё не началось".bright_black());
        return out;
    }

    let _ = writeln!(out, "{}", "Выберите участника: vote <номер>".bright_black());
    for (idx, p) in app.participants().iter().enumerate() {
        let _ = writeln!(out, "  {} {}", format!("#{}", idx + 1).cyan(), p.name);
    }
    out
}

pub fn leaderboard(app: &VotingUseCase) -> String {
    let standings = app.standings();
    let mut out = String::new();
    let _ = writeln!(out, "{}", app.session_title().bold());
    let _ = writeln!(
        out,
        "{}",
        format!(
            "Голосов: {}  Участников: {}",
            standings.total_votes,
            standings.participant_count()
        )
        .bright_black()
    );

    if standings.is_empty() {
        let _ = writeln!(out, "{}", "Нет участников".bright_black());
        return out;
    }

    if let Some(line) = app.commentary() {
        let _ = writeln!(out, "🎙  {}", line.italic().bright_yellow());
    }

    render_podium(&mut out, &standings);
    render_chart(&mut out, &standings);
    render_spotlight(&mut out, &standings);
    out
}

fn render_podium(out: &mut String, standings: &Standings) {
    let _ = writeln!(out);
    for (standing, medal) in standings.podium().iter().zip(MEDALS) {
        let _ = writeln!(
            out,
            "{} #{} {}  {} ({}%)",
            medal,
            standing.number,
            standing.participant.name.bold(),
            standing.participant.votes,
            standing.percent
        );
    }
}

fn render_chart(out: &mut String, standings: &Standings) {
    let series = standings.chart_series();
    let max_votes = series.iter().map(|bar| bar.votes).max().unwrap_or(0);
    let _ = writeln!(out);
    for bar in &series {
        let _ = writeln!(out, "{:>11} {} {}", bar.label, paint(bar, max_votes), bar.votes);
    }
}

fn render_spotlight(out: &mut String, standings: &Standings) {
    let labels: Vec<String> = standings
        .spotlight()
        .into_iter()
        .map(|(standing, label)| format!("{} {}%", label, standing.percent))
        .collect();
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", labels.join("  ·  ").bright_black());
}

fn paint(bar: &ChartBar, max_votes: u32) -> ColoredString {
    let width = if max_votes == 0 {
        0
    } else {
        (bar.votes as usize * BAR_WIDTH).div_ceil(max_votes as usize)
    };
    let blocks = "█".repeat(width);
    match hex_rgb(bar.color) {
        Some((r, g, b)) => blocks.truecolor(r, g, b),
        None => blocks.normal(),
    }
}

fn hex_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
