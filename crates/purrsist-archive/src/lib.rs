//! Static archive generation and publishing for Aether communities.
//!
//! Selected boards of an Aether backend database are rendered into a static
//! site ([`site::SiteBuilder`]) and published under a stable IPNS name
//! ([`publish::Publisher`]). Storage and publishing go through the
//! [`ForumStore`](purrsist_core::store::ForumStore) and
//! [`ContentStore`](purrsist_core::content::ContentStore) traits.

pub mod assets;
pub mod classify;
pub mod config;
pub mod error;
pub mod feed;
pub mod html;
pub mod index;
pub mod layout;
pub mod publish;
pub mod select;
pub mod site;
pub mod thread;
pub mod writer;

#[cfg(test)]
mod testing;

pub use crate::config::Settings;
pub use crate::error::{Error, Result, Stage};
pub use crate::publish::{PinRemoval, PreviousSnapshot, PublishOutcome, Publisher};
pub use crate::site::{RenderStats, SiteBuilder};
