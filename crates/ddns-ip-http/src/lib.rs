// # HTTP Address Source
//
// This crate discovers the caller's public address by asking an HTTP echo
// endpoint (ipify by default) which answers with the address it saw, as
// plain text.
//
// ## Family pinning
//
// A dual-stack endpoint answers over whichever family the connection used.
// To get the v4 address the request must travel over v4, and likewise for v6.
// Each lookup therefore builds its own client that:
// - resolves the endpoint's hostname to addresses of the requested family only
// - binds its local socket to the unspecified address of that family
//
// The answer is checked once more after the fact: a body that is not an
// address of the requested family is rejected.

use ddns_core::model::{Address, AddressFamily};
use ddns_core::traits::AddressSource;
use ddns_core::{Error, Result};

use std::error::Error as StdError;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use reqwest::dns::{Addrs, Name, Resolve, Resolving};

/// DNS resolver that only ever yields addresses of one family
#[derive(Debug, Clone, Copy)]
pub struct FamilyResolver {
    family: AddressFamily,
}

impl FamilyResolver {
    pub fn new(family: AddressFamily) -> Self {
        Self { family }
    }
}

/// Keep only the socket addresses belonging to `family`, in resolver order
pub fn filter_family<I>(addrs: I, family: AddressFamily) -> Vec<SocketAddr>
where
    I: IntoIterator<Item = SocketAddr>,
{
    addrs
        .into_iter()
        .filter(|addr| family.matches_socket(addr))
        .collect()
}

impl Resolve for FamilyResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let family = self.family;
        let host = name.as_str().to_string();

        Box::pin(async move {
            // Port is replaced by the connector
            let resolved = tokio::net::lookup_host((host.as_str(), 0)).await?;
            let addrs = filter_family(resolved, family);

            if addrs.is_empty() {
                let err = io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    format!("{} has no {} address", host, family),
                );
                return Err(Box::new(err) as Box<dyn StdError + Send + Sync>);
            }

            tracing::trace!("Resolved {} to {:?} ({})", host, addrs, family);
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}

/// Address source backed by an HTTP echo endpoint
///
/// Holds no state between calls. Every `fetch` performs exactly one GET.
#[derive(Debug, Clone)]
pub struct HttpAddressSource {
    url: String,
}

impl HttpAddressSource {
    /// Create a new HTTP address source
    ///
    /// # Parameters
    ///
    /// - `url`: Echo endpoint (e.g., "https://api64.ipify.org")
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Build a client whose connections can only use `family`
    fn client_for(&self, family: AddressFamily) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .dns_resolver(Arc::new(FamilyResolver::new(family)))
            .local_address(family.unspecified())
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))
    }
}

/// Parse an echo response body, requiring an address of `family`
pub fn parse_answer(body: &str, family: AddressFamily) -> Result<Address> {
    let text = body.trim();

    let ip: IpAddr = text
        .parse()
        .map_err(|_| Error::discovery(format!("Invalid IP address: {}", text)))?;

    if !family.matches_ip(&ip) {
        return Err(Error::discovery(format!("Expected {}, got: {}", family, ip)));
    }

    Ok(Address::new(text))
}

#[async_trait::async_trait]
impl AddressSource for HttpAddressSource {
    async fn fetch(&self, family: AddressFamily) -> Result<Address> {
        let client = self.client_for(family)?;

        tracing::debug!("Requesting {} address from {}", family, self.url);
        let response = client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::discovery(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))?;

        parse_answer(&body, family)
    }
}
