//! LinkDance Core Library
//!
//! This crate provides the core functionality for LinkDance, a local-first
//! link-in-bio builder: edit a profile of links, then share it as a
//! self-contained URL that any viewer can open without a server.
//!
//! # Architecture
//!
//! - **Store**: the local collection of profiles, persisted as one JSON record
//! - **Editor**: an editing session that debounces auto-saves
//! - **Publish**: profile <-> URL token codec, plus optional URL shortening
//! - **Viewer**: rebuilds a profile from a view URL alone
//!
//! # Quick Start
//!
//! ```text
//! let store = ProfileStore::open()?;
//! let mut session = EditorSession::open(store, "profile-1");
//!
//! session.set_name("Jane");
//! let url = session.publish().await?;
//!
//! let state = reconstruct(&url);
//! ```
//!
//! # Modules
//!
//! - `store`: keyed profile storage (main entry point)
//! - `models`: Profile, LinkItem, SocialLink, Platform
//! - `editor`: editing sessions
//! - `autosave`: debounce controller used by the editor
//! - `ordering`: drag-and-drop reordering
//! - `publish`: token codec and publishing
//! - `viewer`: read-only reconstruction from a URL
//! - `storage`: storage backends
//! - `config`: application configuration

pub mod autosave;
pub mod config;
pub mod editor;
pub mod models;
pub mod ordering;
pub mod publish;
pub mod storage;
pub mod store;
pub mod viewer;

pub use autosave::{AutoSaveState, AutoSaver, Clock, ManualClock, SystemClock};
pub use config::Config;
pub use editor::{EditorError, EditorEvent, EditorSession, LinkUpdate};
pub use models::{LinkItem, Platform, Profile, SocialLink};
pub use ordering::{reorder, LinkMove, OrderingError};
pub use publish::{
    build_view_url, decode, encode, DecodeError, PublishError, Publisher, ShortenError, Shortener,
};
pub use storage::{FileBackend, MemoryBackend, StorageBackend, StorageError, StorageResult};
pub use store::ProfileStore;
pub use viewer::{reconstruct, ViewError, ViewState, Viewer};
