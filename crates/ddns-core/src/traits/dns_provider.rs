// # DNS Provider Traits
//
// Defines the interface for reading and writing a zone's records via a
// session-based provider API.
//
// ## Implementations
//
// - netcup CCP API: `ddns-provider-netcup` crate
//
// ## Session lifecycle
//
// ```text
// ProviderLogin ──login(self)──▶ DnsProvider
// (unauthenticated)              (authenticated session)
// ```
//
// `login` consumes the unauthenticated client, so record operations cannot
// be reached without a session. There is no logout and no refresh: a session
// lives as long as the value does.

use async_trait::async_trait;

use crate::model::{Address, DnsRecord, ObservedState, build_recordset};

/// Trait for the unauthenticated half of a provider client
#[async_trait]
pub trait ProviderLogin: Send {
    /// The authenticated session produced by a successful login
    type Session: DnsProvider;

    /// Authenticate and produce a session
    ///
    /// # Returns
    ///
    /// - `Ok(Session)`: The provider reported success and returned a session
    /// - `Err(Error::Authentication)`: The provider rejected the login
    async fn login(self) -> Result<Self::Session, crate::Error>;
}

/// Trait for an authenticated provider session
///
/// Implementations make one API call per method and never retry. Deciding
/// whether a write is needed is owned by the `Reconciler`.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Fetch every record of `domain`, unfiltered
    async fn fetch_dns_records(&self, domain: &str) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Write `records` to `domain` in a single call
    ///
    /// Records carry their existing provider id, so the provider treats the
    /// write as an in-place modification.
    async fn update_dns_recordset(
        &self,
        domain: &str,
        records: &[DnsRecord],
    ) -> Result<(), crate::Error>;

    /// Fetch the A and AAAA records for `hostname` within `domain`
    async fn fetch_dns_record(
        &self,
        domain: &str,
        hostname: &str,
    ) -> Result<ObservedState, crate::Error> {
        let records = self.fetch_dns_records(domain).await?;
        Ok(ObservedState::from_records(records, hostname))
    }

    /// Update the A and AAAA records for `hostname`
    ///
    /// A family is written only when both its existing record id and a new
    /// destination are given.
    async fn update_dns_records(
        &self,
        domain: &str,
        hostname: &str,
        record4: Option<&str>,
        destination4: Option<&Address>,
        record6: Option<&str>,
        destination6: Option<&Address>,
    ) -> Result<(), crate::Error> {
        let records = build_recordset(hostname, record4, destination4, record6, destination6);
        self.update_dns_recordset(domain, &records).await
    }
}
