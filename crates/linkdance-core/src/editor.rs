//! Editing session
//!
//! An `EditorSession` owns the in-memory copy of one profile while it is being
//! edited. Every mutation goes through the session, which reschedules the
//! debounced auto-save; the owner drives the timer by calling
//! [`EditorSession::tick`]. Notifications for the UI (auto-saved, published,
//! ...) are delivered on an event channel.
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = EditorSession::open(store, "profile-1");
//! let mut events = session.take_events().unwrap();
//!
//! session.set_name("Jane");
//! session.add_link();
//! // ... later, from the event loop
//! session.tick();
//!
//! session.save_and_exit()?;
//! ```

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::autosave::{AutoSaveState, AutoSaver};
use crate::config::DEFAULT_ORIGIN;
use crate::models::{LinkItem, Platform, Profile};
use crate::ordering::{LinkMove, OrderingError};
use crate::publish::{PublishError, Publisher};
use crate::storage::{StorageBackend, StorageError};
use crate::store::ProfileStore;

/// Notifications for the editing surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The debounced save committed
    AutoSaved,
    /// A save could not be written
    SaveFailed(String),
    /// The sample profile replaced the current content
    DemoLoaded,
    /// The profile was published under this URL
    Published(String),
}

/// An edit was refused
#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("Unsupported social platform: {0}")]
    UnsupportedPlatform(Platform),

    #[error("A {0} link already exists")]
    DuplicatePlatform(Platform),

    #[error("No {0} link to update")]
    MissingPlatform(Platform),

    #[error("Social link URL cannot be empty")]
    EmptyUrl,

    #[error("No link with ID {0}")]
    UnknownLink(String),

    #[error(transparent)]
    Ordering(#[from] OrderingError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl EditorError {
    /// Recovery hint for storage failures
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            EditorError::Storage(e) => e.recovery_suggestion(),
            _ => None,
        }
    }
}

/// Partial update of a link; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkUpdate {
    pub label: Option<String>,
    pub url: Option<String>,
    /// An empty string clears the icon
    pub icon: Option<String>,
}

/// Editing session for a single profile
pub struct EditorSession<B: StorageBackend> {
    store: ProfileStore<B>,
    profile: Profile,
    autosave: AutoSaver,
    publisher: Publisher,
    event_tx: mpsc::UnboundedSender<EditorEvent>,
    event_rx: Option<mpsc::UnboundedReceiver<EditorEvent>>,
}

impl<B: StorageBackend> EditorSession<B> {
    /// Open a session on the stored profile with this ID, or on a blank one
    ///
    /// Opening does not schedule a save.
    pub fn open(store: ProfileStore<B>, id: &str) -> Self {
        let profile = store.get_profile(id).unwrap_or_else(|| {
            debug!("Starting new profile {}", id);
            Profile::new(id)
        });
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            store,
            profile,
            autosave: AutoSaver::default(),
            publisher: Publisher::new(DEFAULT_ORIGIN),
            event_tx,
            event_rx: Some(event_rx),
        }
    }

    /// Replace the auto-save controller
    pub fn with_autosave(mut self, autosave: AutoSaver) -> Self {
        self.autosave = autosave;
        self
    }

    /// Replace the publisher
    pub fn with_publisher(mut self, publisher: Publisher) -> Self {
        self.publisher = publisher;
        self
    }

    /// Take the event receiver (can only be called once)
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<EditorEvent>> {
        self.event_rx.take()
    }

    /// The in-memory profile
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn store(&self) -> &ProfileStore<B> {
        &self.store
    }

    pub fn autosave_state(&self) -> AutoSaveState {
        self.autosave.state()
    }

    /// Time until the pending auto-save is due, for event loops
    pub fn next_autosave_in(&self) -> Option<std::time::Duration> {
        self.autosave.time_until_due()
    }

    // ==================== Profile fields ====================

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.profile.name = name.into();
        self.touched();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.profile.description = description.into();
        self.touched();
    }

    pub fn set_photo_url(&mut self, photo_url: impl Into<String>) {
        self.profile.photo_url = photo_url.into();
        self.touched();
    }

    // ==================== Links ====================

    /// Append a blank link and return its ID
    pub fn add_link(&mut self) -> String {
        let link = LinkItem::blank();
        let id = link.id.clone();
        self.profile.links.push(link);
        self.touched();
        id
    }

    /// Append a filled-in link and return its ID
    pub fn push_link(&mut self, link: LinkItem) -> String {
        let id = link.id.clone();
        self.profile.links.push(link);
        self.touched();
        id
    }

    pub fn update_link(&mut self, id: &str, update: LinkUpdate) -> Result<(), EditorError> {
        let link = self
            .profile
            .links
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| EditorError::UnknownLink(id.to_string()))?;

        if let Some(label) = update.label {
            link.label = label;
        }
        if let Some(url) = update.url {
            link.url = url;
        }
        if let Some(icon) = update.icon {
            link.icon = if icon.is_empty() { None } else { Some(icon) };
        }

        self.touched();
        Ok(())
    }

    /// Remove a link; returns whether it existed
    pub fn delete_link(&mut self, id: &str) -> bool {
        let before = self.profile.links.len();
        self.profile.links.retain(|l| l.id != id);
        let removed = self.profile.links.len() != before;
        if removed {
            self.touched();
        }
        removed
    }

    /// Apply a drag gesture to the link order
    ///
    /// Returns `Ok(false)` for a cancelled drag, which changes nothing and
    /// schedules no save.
    pub fn move_link(&mut self, gesture: LinkMove) -> Result<bool, EditorError> {
        match gesture.apply(&self.profile.links)? {
            Some(links) => {
                self.profile.links = links;
                self.touched();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ==================== Social links ====================

    /// Platforms that can still be added, in display order
    pub fn available_platforms(&self) -> Vec<Platform> {
        Platform::KNOWN
            .iter()
            .filter(|p| self.profile.social_link(p).is_none())
            .cloned()
            .collect()
    }

    /// Add a link for a platform not yet on the profile
    ///
    /// Only the editor-offered platforms are accepted.
    pub fn add_social_link(
        &mut self,
        platform: Platform,
        url: impl Into<String>,
    ) -> Result<(), EditorError> {
        let url = url.into();
        if !platform.is_known() {
            return Err(EditorError::UnsupportedPlatform(platform));
        }
        if self.profile.social_link(&platform).is_some() {
            return Err(EditorError::DuplicatePlatform(platform));
        }
        if url.trim().is_empty() {
            return Err(EditorError::EmptyUrl);
        }

        self.profile.upsert_social_link(platform, url);
        self.touched();
        Ok(())
    }

    pub fn update_social_link_url(
        &mut self,
        platform: &Platform,
        url: impl Into<String>,
    ) -> Result<(), EditorError> {
        if self.profile.social_link(platform).is_none() {
            return Err(EditorError::MissingPlatform(platform.clone()));
        }
        self.profile.upsert_social_link(platform.clone(), url);
        self.touched();
        Ok(())
    }

    /// Remove a platform's link; returns whether it existed
    pub fn remove_social_link(&mut self, platform: &Platform) -> bool {
        let removed = self.profile.remove_social_link(platform);
        if removed {
            self.touched();
        }
        removed
    }

    // ==================== Whole-profile actions ====================

    /// Replace the content with the sample profile, keeping this session's ID
    pub fn load_demo(&mut self) {
        let mut demo = Profile::demo();
        demo.id = self.profile.id.clone();
        self.profile = demo;
        self.emit(EditorEvent::DemoLoaded);
        self.touched();
    }

    /// Commit the auto-save if its window has elapsed
    ///
    /// Returns whether a save was attempted.
    pub fn tick(&mut self) -> bool {
        let Some(snapshot) = self.autosave.take_due() else {
            return false;
        };

        match self.store.try_save_profile(&snapshot) {
            Ok(stored) => {
                self.adopt_timestamps(&stored);
                info!("Auto-saved profile {}", stored.id);
                self.emit(EditorEvent::AutoSaved);
            }
            Err(e) => {
                error!("Error auto-saving profile {}: {}", snapshot.id, e);
                self.emit(EditorEvent::SaveFailed(e.to_string()));
            }
        }
        true
    }

    /// Publish the current state and record the URL on the profile
    ///
    /// Fails only when the profile has no name. The profile is saved with its
    /// new `publishedUrl`; a storage fault there is reported as an event but
    /// does not fail the publish.
    pub async fn publish(&mut self) -> Result<String, EditorError> {
        let url = self.publisher.publish(&self.profile).await?;

        self.profile.published_url = Some(url.clone());
        self.autosave.cancel_pending();
        match self.store.try_save_profile(&self.profile) {
            Ok(stored) => self.adopt_timestamps(&stored),
            Err(e) => {
                error!("Error saving published profile {}: {}", self.profile.id, e);
                self.emit(EditorEvent::SaveFailed(e.to_string()));
            }
        }

        self.emit(EditorEvent::Published(url.clone()));
        Ok(url)
    }

    /// Save immediately and end the session
    pub fn save_and_exit(mut self) -> Result<Profile, EditorError> {
        self.autosave.cancel_pending();
        Ok(self.store.try_save_profile(&self.profile)?)
    }

    /// End the session without saving; a pending auto-save is dropped
    pub fn close(mut self) {
        self.cancel_on_exit();
    }

    // ==================== Internal ====================

    fn touched(&mut self) {
        self.autosave.schedule(&self.profile);
    }

    fn adopt_timestamps(&mut self, stored: &Profile) {
        self.profile.created_at = stored.created_at;
        self.profile.updated_at = stored.updated_at;
    }

    fn emit(&self, event: EditorEvent) {
        // Receiver may have been dropped; nobody is listening then
        let _ = self.event_tx.send(event);
    }

    fn cancel_on_exit(&mut self) {
        if self.autosave.cancel_pending() {
            debug!(
                "Discarded pending auto-save for profile {}",
                self.profile.id
            );
        }
    }
}

impl<B: StorageBackend> Drop for EditorSession<B> {
    fn drop(&mut self) {
        self.cancel_on_exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autosave::ManualClock;
    use crate::publish::{encode, ShortenError, Shortener};
    use crate::storage::MemoryBackend;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    const WINDOW: Duration = Duration::from_millis(800);
    const ORIGIN: &str = "https://bio.example";

    struct DownShortener;

    #[async_trait]
    impl Shortener for DownShortener {
        async fn shorten(&self, _long_url: &str) -> Result<String, ShortenError> {
            Err(ShortenError::Network("service unreachable".to_string()))
        }
    }

    fn session(
        id: &str,
    ) -> (
        EditorSession<MemoryBackend>,
        ProfileStore<MemoryBackend>,
        ManualClock,
    ) {
        session_on(MemoryBackend::new(), id)
    }

    fn session_on(
        backend: MemoryBackend,
        id: &str,
    ) -> (
        EditorSession<MemoryBackend>,
        ProfileStore<MemoryBackend>,
        ManualClock,
    ) {
        let clock = ManualClock::new();
        let session = EditorSession::open(ProfileStore::new(backend.clone()), id)
            .with_autosave(AutoSaver::with_clock(WINDOW, Arc::new(clock.clone())))
            .with_publisher(
                Publisher::new(ORIGIN).with_shortener(Arc::new(DownShortener)),
            );
        (session, ProfileStore::new(backend), clock)
    }

    #[test]
    fn test_open_new_profile() {
        let (session, store, _) = session("profile-new");
        assert_eq!(session.profile().id, "profile-new");
        assert!(!session.profile().has_content());
        assert_eq!(session.autosave_state(), AutoSaveState::Idle);
        assert!(store.list_profiles().is_empty());
    }

    #[test]
    fn test_open_existing_profile() {
        let backend = MemoryBackend::new();
        let mut demo = Profile::demo();
        demo.id = "p1".to_string();
        ProfileStore::new(backend.clone()).save_profile(&demo);

        let (session, _, _) = session_on(backend, "p1");
        assert_eq!(session.profile().name, "Jane Doe");
        // Opening is not an edit
        assert_eq!(session.autosave_state(), AutoSaveState::Idle);
    }

    #[test]
    fn test_blank_profile_is_never_autosaved() {
        let (mut session, store, clock) = session("p1");
        session.set_description("just a bio");
        session.set_photo_url("https://img.example/me.png");

        clock.advance(WINDOW * 2);
        assert!(!session.tick());
        assert!(store.get_profile("p1").is_none());
    }

    #[test]
    fn test_autosave_after_quiet_period() {
        let (mut session, store, clock) = session("p1");
        let mut events = session.take_events().unwrap();

        session.set_name("J");
        clock.advance(Duration::from_millis(600));
        session.set_name("Jane");
        clock.advance(Duration::from_millis(600));

        assert!(!session.tick());
        assert!(store.get_profile("p1").is_none());

        clock.advance(Duration::from_millis(200));
        assert!(session.tick());
        assert_eq!(store.get_profile("p1").unwrap().name, "Jane");
        assert_eq!(events.try_recv().unwrap(), EditorEvent::AutoSaved);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_close_discards_pending_save() {
        let (mut session, store, clock) = session("p1");
        session.set_name("Jane");
        session.close();

        clock.advance(WINDOW * 2);
        assert!(store.get_profile("p1").is_none());
    }

    #[test]
    fn test_save_and_exit_saves_immediately() {
        let (mut session, store, _) = session("p1");
        session.set_name("Jane");

        let stored = session.save_and_exit().unwrap();
        assert_eq!(stored.name, "Jane");
        assert_eq!(store.get_profile("p1").unwrap().name, "Jane");
    }

    #[test]
    fn test_save_and_exit_reports_storage_error() {
        let backend = MemoryBackend::new();
        let (mut session, _, _) = session_on(backend.clone(), "p1");
        session.set_name("Jane");
        backend.set_fail_writes(true);

        let err = session.save_and_exit().unwrap_err();
        assert!(matches!(err, EditorError::Storage(StorageError::Unavailable(_))));
        assert!(err.recovery_suggestion().is_none());

        let corrupt = serde_json::from_str::<Profile>("{").unwrap_err();
        let err = EditorError::from(StorageError::Corrupt(corrupt));
        assert!(err.recovery_suggestion().unwrap().contains("Move it aside"));
        assert!(EditorError::EmptyUrl.recovery_suggestion().is_none());
    }

    #[test]
    fn test_autosave_failure_is_reported() {
        let backend = MemoryBackend::new();
        backend.set_fail_writes(true);
        let (mut session, _, clock) = session_on(backend, "p1");
        let mut events = session.take_events().unwrap();

        session.set_name("Jane");
        clock.advance(WINDOW);
        assert!(session.tick());
        assert!(matches!(
            events.try_recv().unwrap(),
            EditorEvent::SaveFailed(_)
        ));
    }

    #[test]
    fn test_link_editing() {
        let (mut session, _, _) = session("p1");
        let id = session.add_link();
        session
            .update_link(
                &id,
                LinkUpdate {
                    label: Some("Blog".to_string()),
                    url: Some("https://blog.example".to_string()),
                    icon: Some("feather".to_string()),
                },
            )
            .unwrap();

        let link = session.profile().link(&id).unwrap();
        assert_eq!(link.label, "Blog");
        assert_eq!(link.icon.as_deref(), Some("feather"));

        session
            .update_link(
                &id,
                LinkUpdate {
                    icon: Some(String::new()),
                    ..LinkUpdate::default()
                },
            )
            .unwrap();
        assert!(session.profile().link(&id).unwrap().icon.is_none());

        assert!(matches!(
            session.update_link("nope", LinkUpdate::default()),
            Err(EditorError::UnknownLink(_))
        ));

        assert!(session.delete_link(&id));
        assert!(!session.delete_link(&id));
        assert!(session.profile().links.is_empty());
    }

    #[test]
    fn test_move_link() {
        let (mut session, _, _) = session("p1");
        let a = session.push_link(LinkItem::new("A", "https://a.example"));
        let b = session.push_link(LinkItem::new("B", "https://b.example"));
        let c = session.push_link(LinkItem::new("C", "https://c.example"));

        assert!(session.move_link(LinkMove::to(0, 2)).unwrap());
        let ids: Vec<_> = session.profile().links.iter().map(|l| l.id.clone()).collect();
        assert_eq!(ids, vec![b, c, a]);

        assert!(matches!(
            session.move_link(LinkMove::to(0, 3)),
            Err(EditorError::Ordering(_))
        ));
    }

    #[test]
    fn test_cancelled_move_does_not_schedule_save() {
        let backend = MemoryBackend::new();
        let mut demo = Profile::demo();
        demo.id = "p1".to_string();
        ProfileStore::new(backend.clone()).save_profile(&demo);
        let writes = backend.write_count();

        let (mut session, store, clock) = session_on(backend.clone(), "p1");
        let before = session.profile().links.clone();

        assert!(!session.move_link(LinkMove::cancelled(1)).unwrap());
        assert_eq!(session.profile().links, before);
        assert_eq!(session.autosave_state(), AutoSaveState::Idle);

        clock.advance(WINDOW * 2);
        assert!(!session.tick());
        assert_eq!(backend.write_count(), writes);
        assert_eq!(store.profile_count(), 1);
    }

    #[test]
    fn test_social_links_one_per_platform() {
        let (mut session, _, _) = session("p1");
        assert_eq!(session.available_platforms().len(), Platform::KNOWN.len());

        session
            .add_social_link(Platform::Github, "https://github.com/jane")
            .unwrap();
        assert!(!session.available_platforms().contains(&Platform::Github));
        assert_eq!(session.available_platforms().len(), Platform::KNOWN.len() - 1);

        assert!(matches!(
            session.add_social_link(Platform::Github, "https://github.com/other"),
            Err(EditorError::DuplicatePlatform(Platform::Github))
        ));
        assert_eq!(session.profile().social_links.len(), 1);

        session
            .update_social_link_url(&Platform::Github, "https://github.com/jdoe")
            .unwrap();
        assert_eq!(
            session.profile().social_link(&Platform::Github).unwrap().url,
            "https://github.com/jdoe"
        );

        assert!(session.remove_social_link(&Platform::Github));
        assert!(session.available_platforms().contains(&Platform::Github));
    }

    #[test]
    fn test_social_link_validation() {
        let (mut session, _, _) = session("p1");
        assert!(matches!(
            session.add_social_link(Platform::from("myspace"), "https://myspace.com/j"),
            Err(EditorError::UnsupportedPlatform(_))
        ));
        assert!(matches!(
            session.add_social_link(Platform::Email, "  "),
            Err(EditorError::EmptyUrl)
        ));
        assert!(matches!(
            session.update_social_link_url(&Platform::Email, "mailto:j@example.com"),
            Err(EditorError::MissingPlatform(Platform::Email))
        ));
    }

    #[test]
    fn test_load_demo_keeps_id() {
        let (mut session, _, _) = session("profile-42");
        let mut events = session.take_events().unwrap();

        session.load_demo();
        assert_eq!(session.profile().id, "profile-42");
        assert_eq!(session.profile().name, "Jane Doe");
        assert!(matches!(session.autosave_state(), AutoSaveState::Pending { .. }));
        assert_eq!(events.try_recv().unwrap(), EditorEvent::DemoLoaded);
    }

    #[tokio::test]
    async fn test_publish_requires_name() {
        let (mut session, store, _) = session("p1");
        session.push_link(LinkItem::new("A", "https://a.example"));

        assert!(matches!(
            session.publish().await,
            Err(EditorError::Publish(PublishError::MissingName))
        ));
        assert!(session.profile().published_url.is_none());
        assert!(store.get_profile("p1").is_none());
    }

    #[tokio::test]
    async fn test_publish_falls_back_to_long_url_and_saves() {
        let (mut session, store, _) = session("p1");
        let mut events = session.take_events().unwrap();
        session.set_name("Jane");
        let snapshot = session.profile().clone();

        let url = session.publish().await.unwrap();

        assert_eq!(url, format!("{}/view?data={}", ORIGIN, encode(&snapshot)));
        assert_eq!(session.profile().published_url.as_deref(), Some(url.as_str()));
        assert_eq!(
            store.get_profile("p1").unwrap().published_url.as_deref(),
            Some(url.as_str())
        );
        // The explicit save replaces the pending auto-save
        assert_eq!(session.autosave_state(), AutoSaveState::Idle);
        assert_eq!(events.try_recv().unwrap(), EditorEvent::Published(url));
    }
}
