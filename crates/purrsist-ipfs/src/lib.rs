//! Kubo (go-ipfs) RPC backend for the archiver.
//!
//! [`IpfsClient`] implements [`purrsist_core::content::ContentStore`] over
//! the daemon's HTTP API (`/api/v0/...`).

mod client;
mod maddr;
mod walk;

pub mod error;

pub use client::{ClientConfig, IpfsClient};
pub use error::{Error, Result};
pub use maddr::api_url_from_multiaddr;
