//! The edit, render and verify cycle of one challenge.
//!
//! A [`ChallengeSession`] turns editor events into [`RenderRequest`]s and
//! only verifies once the newest request's rendering comes back. Renderings
//! that complete after a newer edit was issued are dropped unseen.
//!
//! ```
//! use csskata::challenge::Catalog;
//! use csskata::preview::PreviewRenderer;
//! use csskata::session::{ChallengeSession, MemoryStore, SessionEvent};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let renderer = PreviewRenderer::default();
//! let mut session = ChallengeSession::new(MemoryStore::default());
//!
//! let challenge = catalog.get("snowman").unwrap().clone();
//! let request = session.handle(SessionEvent::PreviewFrameReady(challenge)).unwrap();
//! session.render_completed(request.ticket, request.render(&renderer));
//! assert_eq!(session.percent_completed(), 0);
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::challenge::Challenge;
use crate::error::Result;
use crate::preview::{PreviewDocument, PreviewFrame, PreviewRenderer};
use crate::verify::{Verifier, VerifiedTask, percent_completed};

/// Where a learner's styles are kept between sessions.
pub trait StyleStore {
    fn load(&self, slug: &str) -> Result<Option<String>>;
    fn save(&mut self, slug: &str, styles: &str) -> Result<()>;
    fn clear(&mut self, slug: &str) -> Result<()>;
}

/// Styles kept in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    styles: HashMap<String, String>,
}

impl StyleStore for MemoryStore {
    fn load(&self, slug: &str) -> Result<Option<String>> {
        Ok(self.styles.get(slug).cloned())
    }

    fn save(&mut self, slug: &str, styles: &str) -> Result<()> {
        self.styles.insert(slug.to_string(), styles.to_string());
        Ok(())
    }

    fn clear(&mut self, slug: &str) -> Result<()> {
        self.styles.remove(slug);
        Ok(())
    }
}

/// Styles kept as `<slug>.css` files in a directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{slug}.css"))
    }
}

impl StyleStore for DirStore {
    fn load(&self, slug: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(slug)) {
            Ok(styles) => Ok(Some(styles)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, slug: &str, styles: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(slug), styles)?;
        Ok(())
    }

    fn clear(&mut self, slug: &str) -> Result<()> {
        match fs::remove_file(self.path(slug)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No preview frame yet.
    WaitingForInit,
    Active,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The preview can accept content; starts the session for a challenge.
    PreviewFrameReady(Challenge),
    StylesChanged(String),
    /// Go back to the challenge's starting styles.
    ResetStyles,
}

/// Content the preview should render next.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Increases with every request a session issues.
    pub ticket: u64,
    pub markup: String,
    pub styles: String,
}

impl RenderRequest {
    pub fn render(&self, renderer: &PreviewRenderer) -> PreviewDocument {
        renderer.render(&self.markup, &self.styles)
    }
}

pub struct ChallengeSession<S> {
    state: SessionState,
    store: S,
    challenge: Option<Challenge>,
    styles: String,
    frame: PreviewFrame,
    verifier: Verifier,
    verified_tasks: Vec<VerifiedTask>,
    last_ticket: u64,
}

impl<S: StyleStore> ChallengeSession<S> {
    pub fn new(store: S) -> Self {
        Self {
            state: SessionState::WaitingForInit,
            store,
            challenge: None,
            styles: String::new(),
            frame: PreviewFrame::new(),
            verifier: Verifier::new(),
            verified_tasks: Vec::new(),
            last_ticket: 0,
        }
    }

    /// Apply an event. Returns the rendering the preview should perform,
    /// superseding any earlier request.
    pub fn handle(&mut self, event: SessionEvent) -> Option<RenderRequest> {
        match (self.state, event) {
            (SessionState::WaitingForInit, SessionEvent::PreviewFrameReady(challenge)) => {
                self.verified_tasks = challenge
                    .tasks
                    .iter()
                    .cloned()
                    .map(VerifiedTask::pending)
                    .collect();
                self.styles = match self.store.load(&challenge.slug) {
                    Ok(Some(saved)) => saved,
                    Ok(None) => challenge.starting_styles.clone(),
                    Err(e) => {
                        log::warn!("could not load saved styles for `{}`: {e}", challenge.slug);
                        challenge.starting_styles.clone()
                    }
                };
                self.challenge = Some(challenge);
                self.state = SessionState::Active;
                Some(self.next_request())
            }
            (SessionState::Active, SessionEvent::StylesChanged(styles)) => {
                let slug = self.slug();
                if let Err(e) = self.store.save(&slug, &styles) {
                    log::warn!("could not save styles for `{slug}`: {e}");
                }
                self.styles = styles;
                Some(self.next_request())
            }
            (SessionState::Active, SessionEvent::ResetStyles) => {
                let slug = self.slug();
                if let Err(e) = self.store.clear(&slug) {
                    log::warn!("could not clear saved styles for `{slug}`: {e}");
                }
                self.styles = self
                    .challenge
                    .as_ref()
                    .map(|c| c.starting_styles.clone())
                    .unwrap_or_default();
                Some(self.next_request())
            }
            (state, event) => {
                log::debug!("ignoring {event:?} in state {state:?}");
                None
            }
        }
    }

    fn slug(&self) -> String {
        self.challenge
            .as_ref()
            .map(|c| c.slug.clone())
            .unwrap_or_default()
    }

    fn next_request(&mut self) -> RenderRequest {
        self.last_ticket += 1;
        RenderRequest {
            ticket: self.last_ticket,
            markup: self
                .challenge
                .as_ref()
                .map(|c| c.markup.clone())
                .unwrap_or_default(),
            styles: self.styles.clone(),
        }
    }

    /// Accept a finished rendering. Only the newest request's rendering is
    /// installed; it replaces the preview document and re-verifies every
    /// task. Returns whether the rendering was accepted.
    pub fn render_completed(&mut self, ticket: u64, document: PreviewDocument) -> bool {
        if ticket != self.last_ticket {
            log::debug!(
                "discarding render {ticket}; newest request is {}",
                self.last_ticket
            );
            return false;
        }
        self.frame.replace(document);
        self.verify_all();
        true
    }

    fn verify_all(&mut self) {
        let Some(challenge) = &self.challenge else {
            return;
        };
        self.verified_tasks = self
            .verifier
            .verify_tasks(self.frame.document(), &challenge.tasks);
        log::debug!(
            "verified {} tasks: {}% complete",
            self.verified_tasks.len(),
            percent_completed(&self.verified_tasks)
        );
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    /// The styles currently in the editor.
    pub fn styles(&self) -> &str {
        &self.styles
    }

    pub fn verified_tasks(&self) -> &[VerifiedTask] {
        &self.verified_tasks
    }

    pub fn percent_completed(&self) -> u32 {
        percent_completed(&self.verified_tasks)
    }

    pub fn frame(&self) -> &PreviewFrame {
        &self.frame
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
