// # Address Source Trait
//
// Defines the interface for discovering the caller's public address.
//
// ## Implementations
//
// - HTTP echo endpoint: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::AddressSource;
//
// async fn show(source: &impl AddressSource) -> ddns_core::Result<()> {
//     let v4 = source.fetch_ipv4().await?;
//     let v6 = source.fetch_ipv6().await?;
//     println!("{v4} / {v6}");
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::model::{Address, AddressFamily};

/// Trait for public address discovery
///
/// Each call performs exactly one lookup for exactly one family and must
/// never answer with an address of the other family. Implementations hold
/// no state between calls: there is no caching and no retry.
#[async_trait]
pub trait AddressSource: Send + Sync {
    /// Discover the public address for `family`
    ///
    /// # Returns
    ///
    /// - `Ok(Address)`: The address as reported by the discovery endpoint
    /// - `Err(Error::Transport)`: The endpoint could not be reached
    /// - `Err(Error::Discovery)`: The endpoint answered with an error status
    ///   or an address of the wrong family
    async fn fetch(&self, family: AddressFamily) -> Result<Address, crate::Error>;

    /// Discover the public IPv4 address
    async fn fetch_ipv4(&self) -> Result<Address, crate::Error> {
        self.fetch(AddressFamily::V4).await
    }

    /// Discover the public IPv6 address
    async fn fetch_ipv6(&self) -> Result<Address, crate::Error> {
        self.fetch(AddressFamily::V6).await
    }
}
