// # ddns-core
//
// Core library for the netcup dynamic DNS updater.
//
// ## Architecture Overview
//
// A run is a single pass, composed linearly:
// - **AddressSource**: Discovers the public address for one address family
// - **ProviderLogin**: Authenticates against the DNS provider, yielding a session
// - **DnsProvider**: Reads and writes the record set of a zone (session only)
// - **Reconciler**: Compares desired and observed state and writes on mismatch
//
// ## Design Principles
//
// 1. **Stateless runs**: Every run re-derives truth from the provider
// 2. **Typed sessions**: Record operations only exist on an authenticated session
// 3. **Update, never create or delete**: Only records the provider already has are touched
// 4. **Fail fast**: Any error aborts the run, retries are left to the scheduler

pub mod config;
pub mod error;
pub mod model;
pub mod reconciler;
pub mod traits;

// Re-export core types for convenience
pub use config::{Credentials, DdnsConfig};
pub use error::{Error, Result};
pub use model::{Address, AddressFamily, DesiredState, DnsRecord, ObservedState, RecordType};
pub use reconciler::{ReconcileOutcome, ReconcileSettings, Reconciler};
pub use traits::{AddressSource, DnsProvider, ProviderLogin};
