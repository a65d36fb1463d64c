//! Core traits for the DDNS updater
//!
//! This module defines the seams between the reconciler and the outside world.
//!
//! - [`AddressSource`]: Discover the public address for an address family
//! - [`ProviderLogin`]: Authenticate against a DNS provider
//! - [`DnsProvider`]: Read and write a zone's record set (authenticated only)

pub mod address_source;
pub mod dns_provider;

pub use address_source::AddressSource;
pub use dns_provider::{DnsProvider, ProviderLogin};
