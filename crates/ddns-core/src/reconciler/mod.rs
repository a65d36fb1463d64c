//! Reconciler (driver)
//!
//! The Reconciler is responsible for:
//! - Authenticating against the DNS provider
//! - Discovering the desired addresses via an AddressSource
//! - Fetching the records the provider currently holds
//! - Deciding whether a write is needed and what it contains
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐   login    ┌──────────────┐
//! │ ProviderLogin │──────────▶ │  DnsProvider │◀──── fetch / update ────┐
//! └───────────────┘            └──────────────┘                         │
//!                                                              ┌────────────────┐
//! ┌───────────────┐   fetch v4 / v6                            │   Reconciler   │
//! │ AddressSource │◀───────────────────────────────────────────│                │
//! └───────────────┘                                            └────────────────┘
//! ```
//!
//! ## Run Flow
//!
//! 1. Authenticate (fails before any discovery or record call)
//! 2. Discover v4, then v6 unless IPv6 checking is disabled
//! 3. Fetch the A and AAAA records for the hostname
//! 4. Compare destinations by exact string equality
//! 5. Write only if a differing family has a record to update
//!
//! ## Write Policy
//!
//! When a write happens, every family that has both an existing record and
//! a desired destination is sent, changed or not. Families without an
//! existing record are never created, and a family that was not checked
//! (IPv6 disabled) is never sent, so its record stays as it is.

use tracing::{debug, info, warn};

use crate::config::DdnsConfig;
use crate::error::Result;
use crate::model::{Address, AddressFamily, DesiredState, DnsRecord, ObservedState, build_recordset};
use crate::traits::{AddressSource, DnsProvider, ProviderLogin};

const FAMILIES: [AddressFamily; 2] = [AddressFamily::V4, AddressFamily::V6];

/// Result of a reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Every checked family already points at the desired address
    Unchanged,

    /// The record set was written
    Updated {
        /// The records sent to the provider
        records: Vec<DnsRecord>,
    },

    /// Some family differs, but none of the differing families has a record
    /// to update; nothing was written
    MissingRecords {
        /// Differing families with no existing record
        families: Vec<AddressFamily>,
    },
}

/// What a comparison between desired and observed state calls for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePlan {
    /// Checked families whose observed destination differs from the desired one
    pub differing: Vec<AddressFamily>,

    /// Differing families that have no existing record
    pub missing: Vec<AddressFamily>,

    /// Record set to write if a write is needed
    pub records: Vec<DnsRecord>,
}

impl UpdatePlan {
    /// Compare desired and observed state for `hostname`
    pub fn new(desired: &DesiredState, observed: &ObservedState, hostname: &str) -> Self {
        let mut plan = Self::default();

        for family in FAMILIES {
            // Families that were not checked are never compared
            let Some(expected) = desired.get(family) else {
                debug!("{} not checked, leaving record untouched", family);
                continue;
            };

            let actual = observed.destination(family);
            if actual == Some(expected) {
                debug!("{} record already points at {}", family, expected);
                continue;
            }

            debug!(
                "{} differs: {} (observed) != {} (expected)",
                family,
                actual.map(Address::as_str).unwrap_or("<none>"),
                expected
            );
            plan.differing.push(family);
            if observed.get(family).is_none() {
                plan.missing.push(family);
            }
        }

        plan.records = build_recordset(
            hostname,
            observed.v4.as_ref().map(|record| record.id.as_str()),
            Some(&desired.v4),
            observed.v6.as_ref().map(|record| record.id.as_str()),
            desired.v6.as_ref(),
        );

        plan
    }

    /// True if at least one differing family has a record to update
    pub fn needs_write(&self) -> bool {
        self.differing
            .iter()
            .any(|family| !self.missing.contains(family))
    }
}

/// Settings for a reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileSettings {
    /// DNS zone to inspect and update
    pub domain: String,

    /// Record name within the zone
    pub hostname: String,

    /// Skip IPv6 discovery and leave any AAAA record untouched
    pub disable_ipv6: bool,
}

impl From<&DdnsConfig> for ReconcileSettings {
    fn from(config: &DdnsConfig) -> Self {
        Self {
            domain: config.domain.clone(),
            hostname: config.hostname.clone(),
            disable_ipv6: config.disable_ipv6,
        }
    }
}

/// Single-pass DDNS driver
///
/// ## Lifecycle
///
/// 1. Create with [`Reconciler::new()`]
/// 2. Call [`Reconciler::run()`] once per invocation
/// 3. Drop; nothing is kept between runs
///
/// ## Threading
///
/// Every step awaits the previous one. The v4 and v6 discoveries never
/// overlap.
#[derive(Debug, Clone)]
pub struct Reconciler {
    settings: ReconcileSettings,
}

impl Reconciler {
    pub fn new(settings: ReconcileSettings) -> Self {
        Self { settings }
    }

    /// Run one reconciliation
    ///
    /// # Parameters
    ///
    /// - `login`: Unauthenticated provider client, consumed by the login
    /// - `source`: Address source used for both families
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileOutcome)`: The run completed, with or without a write
    /// - `Err(Error)`: The first error encountered; later steps did not run
    pub async fn run<L, S>(&self, login: L, source: &S) -> Result<ReconcileOutcome>
    where
        L: ProviderLogin,
        S: AddressSource + ?Sized,
    {
        info!("Authenticating against DNS provider");
        let session = login.login().await?;

        let desired = self.discover(source).await?;

        self.reconcile(&session, &desired).await
    }

    /// Discover the desired addresses, v4 first, then v6 if enabled
    async fn discover<S>(&self, source: &S) -> Result<DesiredState>
    where
        S: AddressSource + ?Sized,
    {
        info!("Fetching public IPv4 address");
        let v4 = source.fetch_ipv4().await?;
        info!("Public IPv4 address: {}", v4);

        let v6 = if self.settings.disable_ipv6 {
            info!("IPv6 checking disabled");
            None
        } else {
            info!("Fetching public IPv6 address");
            let v6 = source.fetch_ipv6().await?;
            info!("Public IPv6 address: {}", v6);
            Some(v6)
        };

        Ok(DesiredState { v4, v6 })
    }

    /// Compare against the provider's records and write if needed
    async fn reconcile<P>(&self, session: &P, desired: &DesiredState) -> Result<ReconcileOutcome>
    where
        P: DnsProvider + ?Sized,
    {
        let ReconcileSettings {
            domain, hostname, ..
        } = &self.settings;

        info!("Fetching current DNS records for {} in {}", hostname, domain);
        let observed = session.fetch_dns_record(domain, hostname).await?;

        let plan = UpdatePlan::new(desired, &observed, hostname);

        if plan.differing.is_empty() {
            info!("No DNS record update required");
            return Ok(ReconcileOutcome::Unchanged);
        }

        for family in &plan.missing {
            warn!(
                "No {} record exists for {} in {}; records are never created, skipping {}",
                family.record_type(),
                hostname,
                domain,
                family
            );
        }

        if !plan.needs_write() {
            return Ok(ReconcileOutcome::MissingRecords {
                families: plan.missing,
            });
        }

        info!(
            "Updating DNS records for {} in {} ({} record(s))",
            hostname,
            domain,
            plan.records.len()
        );
        session.update_dns_recordset(domain, &plan.records).await?;
        info!("DNS records updated");

        Ok(ReconcileOutcome::Updated {
            records: plan.records,
        })
    }
}
