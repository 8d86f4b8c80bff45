//! External Metadata Providers
//!
//! This module contains clients for external metadata services:
//! - Cover Art Archive - release group artwork
//!
//! Providers go through the bridge `HttpClient` so tests can mock the wire.

pub mod coverart;

pub use coverart::CoverArtClient;
