//! Test doubles and common utilities for reconciler contract tests
//!
//! These doubles count every call so tests can assert not only on outcomes
//! but on which collaborators were (and were not) reached.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::model::{Address, AddressFamily, DnsRecord, RecordType};
use ddns_core::traits::{AddressSource, DnsProvider, ProviderLogin};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An AddressSource answering from fixed values
pub struct MockAddressSource {
    v4: std::result::Result<Address, String>,
    v6: std::result::Result<Address, String>,
    /// Families requested, in call order
    calls: Arc<Mutex<Vec<AddressFamily>>>,
}

impl MockAddressSource {
    pub fn new(v4: &str, v6: &str) -> Self {
        Self {
            v4: Ok(Address::from(v4)),
            v6: Ok(Address::from(v6)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A source whose v4 lookup fails as the discovery endpoint would on HTTP 500
    pub fn failing_v4(status: &str) -> Self {
        Self {
            v4: Err(format!("HTTP error: {}", status)),
            v6: Ok(Address::from("::1")),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<AddressFamily> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl AddressSource for MockAddressSource {
    async fn fetch(&self, family: AddressFamily) -> Result<Address> {
        self.calls.lock().unwrap().push(family);
        let answer = match family {
            AddressFamily::V4 => &self.v4,
            AddressFamily::V6 => &self.v6,
        };
        answer.clone().map_err(Error::discovery)
    }
}

/// An authenticated session over an in-memory zone listing
#[derive(Clone)]
pub struct MockSession {
    records: Vec<DnsRecord>,
    fail_fetch: bool,
    fail_update: bool,
    fetch_call_count: Arc<AtomicUsize>,
    /// Every record set written, in call order
    writes: Arc<Mutex<Vec<(String, Vec<DnsRecord>)>>>,
}

impl MockSession {
    pub fn new(records: Vec<DnsRecord>) -> Self {
        Self {
            records,
            fail_fetch: false,
            fail_update: false,
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
            writes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_fetch() -> Self {
        Self {
            fail_fetch: true,
            ..Self::new(Vec::new())
        }
    }

    /// A session whose write is rejected as the provider would on a bad record set
    pub fn failing_update(records: Vec<DnsRecord>) -> Self {
        Self {
            fail_update: true,
            ..Self::new(records)
        }
    }

    pub fn fetch_call_count(&self) -> usize {
        self.fetch_call_count.load(Ordering::SeqCst)
    }

    pub fn update_call_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn writes(&self) -> Vec<(String, Vec<DnsRecord>)> {
        self.writes.lock().unwrap().clone()
    }

    /// All records written across all calls
    pub fn written_records(&self) -> Vec<DnsRecord> {
        self.writes()
            .into_iter()
            .flat_map(|(_, records)| records)
            .collect()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockSession {
    async fn fetch_dns_records(&self, _domain: &str) -> Result<Vec<DnsRecord>> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch {
            return Err(Error::provider_api(
                "infoDnsRecords",
                r#"{"status":"error","shortmessage":"Domain not found"}"#,
            ));
        }
        Ok(self.records.clone())
    }

    async fn update_dns_recordset(&self, domain: &str, records: &[DnsRecord]) -> Result<()> {
        self.writes
            .lock()
            .unwrap()
            .push((domain.to_string(), records.to_vec()));
        if self.fail_update {
            return Err(Error::provider_api(
                "updateDnsRecords",
                r#"{"status":"error","shortmessage":"Validation Error."}"#,
            ));
        }
        Ok(())
    }
}

/// The unauthenticated half, handing out a MockSession on success
pub struct MockLogin {
    session: MockSession,
    accept: bool,
    login_call_count: Arc<AtomicUsize>,
}

impl MockLogin {
    pub fn accepting(session: &MockSession) -> Self {
        Self {
            session: session.clone(),
            accept: true,
            login_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn rejecting(session: &MockSession) -> Self {
        Self {
            accept: false,
            ..Self::accepting(session)
        }
    }

    /// Counter handle that outlives the consumed login value
    pub fn login_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.login_call_count)
    }
}

#[async_trait::async_trait]
impl ProviderLogin for MockLogin {
    type Session = MockSession;

    async fn login(self) -> Result<MockSession> {
        self.login_call_count.fetch_add(1, Ordering::SeqCst);
        if self.accept {
            Ok(self.session)
        } else {
            Err(Error::auth(r#"{"status":"error","shortmessage":"Login failed"}"#))
        }
    }
}

/// A zone listing holding `home` A/AAAA records plus unrelated noise
pub fn zone(v4: Option<(&str, &str)>, v6: Option<(&str, &str)>) -> Vec<DnsRecord> {
    let mut records = vec![
        DnsRecord::new("100", "www", RecordType::A, "9.9.9.9"),
        DnsRecord::new("101", "@", RecordType::Other("MX".to_string()), "mx.example.com"),
        DnsRecord::new("102", "www", RecordType::Aaaa, "2001:db8::9"),
    ];
    if let Some((id, dest)) = v4 {
        records.push(DnsRecord::new(id, "home", RecordType::A, dest));
    }
    if let Some((id, dest)) = v6 {
        records.push(DnsRecord::new(id, "home", RecordType::Aaaa, dest));
    }
    records
}

/// Helper to create reconciler settings for `home` in `example.com`
pub fn settings(disable_ipv6: bool) -> ddns_core::ReconcileSettings {
    ddns_core::ReconcileSettings {
        domain: "example.com".to_string(),
        hostname: "home".to_string(),
        disable_ipv6,
    }
}
