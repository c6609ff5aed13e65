use anyhow::Result;
use colored::Colorize;
use livevote_application::VotingUseCase;
use livevote_core::session::VoteOutcome;
use livevote_core::view::View;

use crate::render;

/// One-shot vote: prints the results when the vote counted.
pub fn vote_once(app: &mut VotingUseCase, target: &str) -> Result<()> {
    if vote(app, target)?.is_counted() {
        print!("{}", render::leaderboard(app));
    }
    Ok(())
}

/// Votes for `target`, read as a roster number first and an id otherwise.
pub fn vote(app: &mut VotingUseCase, target: &str) -> Result<VoteOutcome> {
    let outcome = match target.trim_start_matches('#').parse::<usize>() {
        Ok(number) => app.vote_by_number(number)?,
        Err(_) => app.vote(target)?,
    };

    match &outcome {
        VoteOutcome::Counted { .. } => {
            println!("{}", "Голос учтён!".green().bold());
        }
        VoteOutcome::AlreadyVoted { voted_for } => {
            let name = app
                .store()
                .participant(voted_for)
                .map_or(voted_for.as_str(), |p| p.name.as_str());
            println!("{} {}", "С этого устройства уже проголосовали за".yellow(), name);
        }
    }
    Ok(outcome)
}

pub fn results(app: &mut VotingUseCase) {
    app.navigate(View::Leaderboard);
    print!("{}", render::leaderboard(app));
}
