use std::sync::Arc;

use livevote_application::{AppBootstrap, BootstrapOptions, VotingUseCase};
use livevote_core::session::{ResetConfirmation, SessionStore, VoteOutcome};
use livevote_core::storage::{KeyValueStore, SESSION_DOCUMENT_KEY, VOTE_RECORD_KEY};
use livevote_core::view::{Location, View};
use livevote_infrastructure::FileKeyValueStore;
use tempfile::TempDir;

fn open(dir: &TempDir, href: &str) -> VotingUseCase {
    let storage = Arc::new(FileKeyValueStore::new(dir.path()));
    VotingUseCase::new(SessionStore::load(storage), Location::new(href))
}

#[test]
fn test_vote_persists_across_restart() {
    let temp_dir = TempDir::new().unwrap();

    let b_id = {
        let mut app = open(&temp_dir, "http://localhost/#vote");
        app.add_participant("A", "");
        let b = app.add_participant("B", "");
        assert!(app.vote(&b.id).unwrap().is_counted());
        b.id
    };

    let mut app = open(&temp_dir, "http://localhost/#vote");
    let votes: Vec<_> = app.participants().iter().map(|p| p.votes).collect();
    assert_eq!(votes, vec![0, 1]);
    assert_eq!(app.voted_for(), Some(b_id.as_str()));

    // The device already voted, so the vote view stays put
    let a_id = app.participants()[0].id.clone();
    let outcome = app.vote(&a_id).unwrap();
    assert!(matches!(outcome, VoteOutcome::AlreadyVoted { .. }));
    assert_eq!(app.current_view(), View::Vote);
}

#[test]
fn test_records_use_well_known_keys() {
    let temp_dir = TempDir::new().unwrap();
    let mut app = open(&temp_dir, "http://localhost/");
    app.set_session_title("Мисс Весна");
    let a = app.add_participant("Анна", "data:image/png;base64,AAAA");
    app.vote(&a.id).unwrap();

    let storage = FileKeyValueStore::new(temp_dir.path());
    let raw = storage.get(SESSION_DOCUMENT_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["sessionTitle"], "Мисс Весна");
    assert_eq!(json["participants"][0]["name"], "Анна");
    assert_eq!(json["participants"][0]["photoUrl"], "data:image/png;base64,AAAA");
    assert_eq!(json["participants"][0]["votes"], 1);

    assert_eq!(storage.get(VOTE_RECORD_KEY).unwrap(), Some(a.id));
}

#[test]
fn test_admin_and_voter_share_the_store() {
    let temp_dir = TempDir::new().unwrap();
    let mut admin = open(&temp_dir, "http://localhost/");
    let mut voter = open(&temp_dir, "http://localhost/#vote");
    assert!(voter.participants().is_empty());

    let a = admin.add_participant("A", "");
    voter.reload();
    assert_eq!(voter.participants().len(), 1);

    voter.vote(&a.id).unwrap();
    admin.reload();
    assert_eq!(admin.participants()[0].votes, 1);
}

#[test]
fn test_reset_clears_roster_and_vote_record() {
    let temp_dir = TempDir::new().unwrap();
    let mut app = open(&temp_dir, "http://localhost/");
    app.set_session_title("Финал");
    let a = app.add_participant("A", "");
    app.vote(&a.id).unwrap();

    let answer = ResetConfirmation::from_answer("нет");
    assert!(answer.is_none());

    app.reset(ResetConfirmation::from_answer("да").unwrap());

    let app = open(&temp_dir, "http://localhost/");
    assert!(app.participants().is_empty());
    assert!(!app.has_voted());
    assert_eq!(app.session_title(), "Финал");
}

#[test]
fn test_deleting_voted_participant_keeps_vote_record() {
    let temp_dir = TempDir::new().unwrap();
    let mut app = open(&temp_dir, "http://localhost/");
    let a = app.add_participant("A", "");
    app.add_participant("B", "");
    app.vote(&a.id).unwrap();

    assert!(app.delete_participant(&a.id));
    assert!(!app.delete_participant(&a.id));

    let standings = app.standings();
    assert_eq!(standings.total_votes, 0);
    assert!(standings.leader().is_none());
    assert!(app.has_voted());
}

#[test]
fn test_corrupt_document_starts_empty() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(SESSION_DOCUMENT_KEY), "{not json").unwrap();

    let mut app = open(&temp_dir, "http://localhost/");
    assert!(app.participants().is_empty());
    assert_eq!(app.session_title(), "Голосование 2024");

    // First write replaces the corrupt record
    app.add_participant("A", "");
    let app = open(&temp_dir, "http://localhost/");
    assert_eq!(app.participants().len(), 1);
}

#[test]
fn test_ingest_photos_numbers_after_roster() {
    let temp_dir = TempDir::new().unwrap();
    let photos = TempDir::new().unwrap();
    let png = photos.path().join("one.png");
    let jpg = photos.path().join("two.jpg");
    let txt = photos.path().join("notes.txt");
    let photo = image::RgbImage::from_pixel(1024, 768, image::Rgb([10, 120, 200]));
    photo.save_with_format(&png, image::ImageFormat::Png).unwrap();
    photo.save_with_format(&jpg, image::ImageFormat::Jpeg).unwrap();
    std::fs::write(&txt, "hello").unwrap();

    let mut app = open(&temp_dir, "http://localhost/");
    app.add_participant("Анна", "");

    let report = app.ingest_photos(&[png, txt.clone(), jpg]);
    assert_eq!(report.added.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].0, txt);

    let names: Vec<_> = app.participants().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Анна", "Участник #2", "Участник #3"]);
    assert!(app.participants()[1].photo_url.starts_with("data:image/jpeg;base64,"));
    assert!(app.participants()[2].photo_url.starts_with("data:image/jpeg;base64,"));
}

#[test]
fn test_bootstrap_reopens_session() {
    let temp_dir = TempDir::new().unwrap();
    // No runtime here, so keep commentary off even if a key is in the environment
    std::fs::write(temp_dir.path().join("config.toml"), "[commentary]\nenabled = false\n").unwrap();
    let options = BootstrapOptions {
        data_dir: Some(temp_dir.path().to_path_buf()),
        href: Some("http://localhost/#vote".to_string()),
        ..Default::default()
    };

    {
        let mut boot = AppBootstrap::initialize(options.clone()).unwrap();
        boot.usecase.set_session_title("Финал");
        boot.usecase.add_participant("A", "");
        boot.usecase.vote_by_number(1).unwrap();
        assert_eq!(boot.usecase.current_view(), View::Leaderboard);
    }

    let boot = AppBootstrap::initialize(options).unwrap();
    assert_eq!(boot.usecase.session_title(), "Финал");
    assert_eq!(boot.usecase.participants()[0].votes, 1);
    assert!(boot.usecase.has_voted());
}
