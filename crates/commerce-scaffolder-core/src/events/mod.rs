//! Adobe I/O Events: providers and event metadata
//!
//! This module provides:
//! - The `EventsClient` seam and its HTTP implementation
//! - Commerce provider discovery, caching and selection
//! - Event metadata lookup with slug derivation

pub mod client;
pub mod metadata;
pub mod provider;

pub use client::{EventMetadataRecord, EventsClient, HttpEventsClient, ProviderRecord};
pub use metadata::{fetch_event_metadata, slugify, EventMetadata};
pub use provider::{
    find_commerce_providers, select_provider, EventProvider, ProviderCache,
    COMMERCE_PROVIDER_METADATA,
};
