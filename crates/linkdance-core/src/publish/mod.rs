//! Publishing profiles as self-contained URLs
//!
//! A published profile lives entirely in its URL: nothing is stored on a
//! server. The flow is:
//!
//! 1. Encode the profile into a token (`codec`)
//! 2. Build `<origin>/view?data=<token>`
//! 3. Optionally shorten it, falling back to the long URL on any failure
//!
//! Publishing is a one-way snapshot; later edits do not change URLs that were
//! already shared.

mod codec;
mod publisher;
mod shortener;

pub use codec::{build_view_url, decode, encode, DecodeError, DATA_PARAM, VIEW_PATH};
pub use publisher::{PublishError, Publisher};
pub use shortener::{ShortenError, Shortener};
