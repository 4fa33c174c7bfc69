//! Session tests.
//!
//! Drives a challenge session through its events the way an editor and a
//! preview would, including renders that finish out of order.

use csskata::challenge::Catalog;
use csskata::preview::{PreviewRenderer, RenderedDocument};
use csskata::session::{
    ChallengeSession, DirStore, MemoryStore, SessionEvent, SessionState, StyleStore,
};

const SNOWMAN_DONE: &str = "
#snowman { display: flex; flex-direction: column; align-items: center; }
.ball { --base-size: 100px; width: var(--base-size); aspect-ratio: 1; border-radius: 50%; }
#ball-2 { width: calc(var(--base-size) * 1.3); }
#ball-3 { width: calc(var(--base-size) * 1.7); }
";

fn snowman_session<S: StyleStore>(store: S) -> (ChallengeSession<S>, PreviewRenderer) {
    let catalog = Catalog::builtin().unwrap();
    let challenge = catalog.get("snowman").unwrap().clone();
    let renderer = PreviewRenderer::default();
    let mut session = ChallengeSession::new(store);
    let request = session
        .handle(SessionEvent::PreviewFrameReady(challenge))
        .unwrap();
    assert!(session.render_completed(request.ticket, request.render(&renderer)));
    (session, renderer)
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_no_verification_before_first_render() {
    let catalog = Catalog::builtin().unwrap();
    let challenge = catalog.get("snowman").unwrap().clone();
    let mut session = ChallengeSession::new(MemoryStore::default());

    session.handle(SessionEvent::PreviewFrameReady(challenge));
    assert_eq!(session.state(), SessionState::Active);
    assert!(!session.frame().is_ready());
    assert_eq!(session.verified_tasks().len(), 6);
    assert!(session.verified_tasks().iter().all(|t| !t.completed));
}

#[test]
fn test_edit_render_verify() {
    let (mut session, renderer) = snowman_session(MemoryStore::default());
    assert_eq!(session.percent_completed(), 0);

    let request = session
        .handle(SessionEvent::StylesChanged(SNOWMAN_DONE.to_string()))
        .unwrap();
    // Results describe the last completed render until the new one lands.
    assert_eq!(session.percent_completed(), 0);

    assert!(session.render_completed(request.ticket, request.render(&renderer)));
    assert_eq!(session.percent_completed(), 100);
}

#[test]
fn test_newer_edit_supersedes_pending_render() {
    let (mut session, renderer) = snowman_session(MemoryStore::default());

    let solved = session
        .handle(SessionEvent::StylesChanged(SNOWMAN_DONE.to_string()))
        .unwrap();
    let partial = session
        .handle(SessionEvent::StylesChanged(".ball { width: 100px; }".to_string()))
        .unwrap();

    // The solved render finishes late, after it was superseded.
    assert!(!session.render_completed(solved.ticket, solved.render(&renderer)));
    assert_eq!(session.percent_completed(), 0);

    assert!(session.render_completed(partial.ticket, partial.render(&renderer)));
    let completed: Vec<bool> = session.verified_tasks().iter().map(|t| t.completed).collect();
    assert_eq!(completed, [true, false, false, false, false, false]);
    assert_eq!(session.percent_completed(), 17);
}

#[test]
fn test_reset_restores_starting_styles() {
    let (mut session, renderer) = snowman_session(MemoryStore::default());
    let request = session
        .handle(SessionEvent::StylesChanged(SNOWMAN_DONE.to_string()))
        .unwrap();
    session.render_completed(request.ticket, request.render(&renderer));
    assert_eq!(session.percent_completed(), 100);

    let request = session.handle(SessionEvent::ResetStyles).unwrap();
    let starting = session.challenge().unwrap().starting_styles.clone();
    assert_eq!(request.styles, starting);
    assert_eq!(session.styles(), starting);

    session.render_completed(request.ticket, request.render(&renderer));
    assert_eq!(session.percent_completed(), 0);
}

#[test]
fn test_each_render_is_a_new_document() {
    let (mut session, renderer) = snowman_session(MemoryStore::default());
    let before = session.frame().document().unwrap().revision();

    let request = session
        .handle(SessionEvent::StylesChanged(".ball { width: 1px; }".to_string()))
        .unwrap();
    session.render_completed(request.ticket, request.render(&renderer));

    let after = session.frame().document().unwrap().revision();
    assert_ne!(before, after);
    assert_eq!(session.frame().replacements(), 2);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_styles_survive_a_new_session() {
    let dir = tempfile::tempdir().unwrap();

    {
        let (mut session, _) = snowman_session(DirStore::new(dir.path()));
        session.handle(SessionEvent::StylesChanged(SNOWMAN_DONE.to_string()));
    }

    let (session, _) = snowman_session(DirStore::new(dir.path()));
    assert_eq!(session.styles(), SNOWMAN_DONE);
    assert_eq!(session.percent_completed(), 100);
}

#[test]
fn test_reset_clears_saved_styles() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _) = snowman_session(DirStore::new(dir.path()));
    session.handle(SessionEvent::StylesChanged(SNOWMAN_DONE.to_string()));
    assert!(dir.path().join("snowman.css").exists());

    session.handle(SessionEvent::ResetStyles);
    assert!(!dir.path().join("snowman.css").exists());
    assert_eq!(DirStore::new(dir.path()).load("snowman").unwrap(), None);
}
