//! Data model shared by the address source, the provider and the reconciler
//!
//! All values are built fresh from live responses on every run and dropped
//! when the process exits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// A textual IPv4 or IPv6 literal
///
/// Compared by exact string equality. `::2` and `0::2` are different
/// addresses as far as reconciliation is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Address family (v4 or v6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// The record type that carries addresses of this family
    pub fn record_type(self) -> RecordType {
        match self {
            AddressFamily::V4 => RecordType::A,
            AddressFamily::V6 => RecordType::Aaaa,
        }
    }

    /// The unspecified ("any") address of this family
    pub fn unspecified(self) -> IpAddr {
        match self {
            AddressFamily::V4 => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            AddressFamily::V6 => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        }
    }

    pub fn matches_ip(self, ip: &IpAddr) -> bool {
        matches!(
            (self, ip),
            (AddressFamily::V4, IpAddr::V4(_)) | (AddressFamily::V6, IpAddr::V6(_))
        )
    }

    pub fn matches_socket(self, addr: &SocketAddr) -> bool {
        self.matches_ip(&addr.ip())
    }
}

impl From<IpAddr> for AddressFamily {
    fn from(value: IpAddr) -> Self {
        match value {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => f.write_str("IPv4"),
            AddressFamily::V6 => f.write_str("IPv6"),
        }
    }
}

/// DNS record type as reported by the provider
///
/// Only `A` and `AAAA` are reconciled. Everything else in a zone listing
/// (MX, CNAME, TXT, ...) is carried verbatim and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    A,
    Aaaa,
    Other(String),
}

impl RecordType {
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Other(other) => other,
        }
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            _ => RecordType::Other(value),
        }
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        match value {
            RecordType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One provider-side DNS record
///
/// Serializes to exactly the four fields the provider expects in an update.
/// Extra fields present in a listing (`priority`, `state`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned identifier, echoed back unchanged on update
    pub id: String,
    pub hostname: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub destination: Address,
}

impl DnsRecord {
    pub fn new(
        id: impl Into<String>,
        hostname: impl Into<String>,
        record_type: RecordType,
        destination: impl Into<Address>,
    ) -> Self {
        Self {
            id: id.into(),
            hostname: hostname.into(),
            record_type,
            destination: destination.into(),
        }
    }
}

/// Addresses the zone should point at, as discovered this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredState {
    pub v4: Address,
    /// `None` when IPv6 checking is disabled
    pub v6: Option<Address>,
}

impl DesiredState {
    pub fn get(&self, family: AddressFamily) -> Option<&Address> {
        match family {
            AddressFamily::V4 => Some(&self.v4),
            AddressFamily::V6 => self.v6.as_ref(),
        }
    }
}

/// The A and AAAA records currently held by the provider for one hostname
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedState {
    pub v4: Option<DnsRecord>,
    pub v6: Option<DnsRecord>,
}

impl ObservedState {
    /// Select the records for `hostname` from a full zone listing
    ///
    /// The first A and the first AAAA record whose hostname matches win.
    /// Records for other hostnames or of other types are ignored.
    pub fn from_records<I>(records: I, hostname: &str) -> Self
    where
        I: IntoIterator<Item = DnsRecord>,
    {
        let mut observed = Self::default();

        for record in records {
            if record.hostname != hostname {
                continue;
            }
            let slot = match record.record_type {
                RecordType::A => &mut observed.v4,
                RecordType::Aaaa => &mut observed.v6,
                RecordType::Other(_) => continue,
            };
            if slot.is_none() {
                *slot = Some(record);
            }
        }

        observed
    }

    pub fn get(&self, family: AddressFamily) -> Option<&DnsRecord> {
        match family {
            AddressFamily::V4 => self.v4.as_ref(),
            AddressFamily::V6 => self.v6.as_ref(),
        }
    }

    /// Current destination for the given family, if a record exists
    pub fn destination(&self, family: AddressFamily) -> Option<&Address> {
        self.get(family).map(|record| &record.destination)
    }
}

/// Build the record set for an update
///
/// A family is included only when both an existing record id and a
/// destination are present. A missing id (no record yet) or a missing
/// destination (family not checked) drops the family from the write.
pub fn build_recordset(
    hostname: &str,
    record4: Option<&str>,
    destination4: Option<&Address>,
    record6: Option<&str>,
    destination6: Option<&Address>,
) -> Vec<DnsRecord> {
    let families = [
        (RecordType::A, record4, destination4),
        (RecordType::Aaaa, record6, destination6),
    ];

    families
        .into_iter()
        .filter_map(|(record_type, id, destination)| match (id, destination) {
            (Some(id), Some(destination)) => Some(DnsRecord::new(
                id,
                hostname,
                record_type,
                destination.clone(),
            )),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<DnsRecord> {
        vec![
            DnsRecord::new("1", "www", RecordType::A, "9.9.9.9"),
            DnsRecord::new("2", "home", RecordType::Other("MX".into()), "mail.example.com"),
            DnsRecord::new("3", "home", RecordType::Other("TXT".into()), "v=spf1 -all"),
            DnsRecord::new("4", "home", RecordType::A, "1.2.3.4"),
            DnsRecord::new("5", "www", RecordType::Aaaa, "2001:db8::9"),
            DnsRecord::new("6", "home", RecordType::Aaaa, "::1"),
            DnsRecord::new("7", "home", RecordType::A, "5.5.5.5"),
        ]
    }

    #[test]
    fn test_from_records_selects_matching_hostname_and_types() {
        let observed = ObservedState::from_records(listing(), "home");

        let v4 = observed.v4.expect("A record selected");
        assert_eq!(v4.id, "4");
        assert_eq!(v4.destination.as_str(), "1.2.3.4");

        let v6 = observed.v6.expect("AAAA record selected");
        assert_eq!(v6.id, "6");
        assert_eq!(v6.destination.as_str(), "::1");
    }

    #[test]
    fn test_from_records_first_match_wins() {
        let observed = ObservedState::from_records(listing(), "home");
        assert_eq!(observed.destination(AddressFamily::V4).unwrap().as_str(), "1.2.3.4");
    }

    #[test]
    fn test_from_records_unknown_hostname_is_empty() {
        let observed = ObservedState::from_records(listing(), "nas");
        assert_eq!(observed, ObservedState::default());
    }

    #[test]
    fn test_build_recordset_requires_id_and_destination() {
        let v4 = Address::from("1.2.3.4");
        let v6 = Address::from("::2");

        let both = build_recordset("home", Some("4"), Some(&v4), Some("6"), Some(&v6));
        assert_eq!(
            both,
            vec![
                DnsRecord::new("4", "home", RecordType::A, "1.2.3.4"),
                DnsRecord::new("6", "home", RecordType::Aaaa, "::2"),
            ]
        );

        let no_v6_destination = build_recordset("home", Some("4"), Some(&v4), Some("6"), None);
        assert_eq!(no_v6_destination.len(), 1);
        assert_eq!(no_v6_destination[0].record_type, RecordType::A);

        let no_v4_record = build_recordset("home", None, Some(&v4), Some("6"), Some(&v6));
        assert_eq!(no_v4_record.len(), 1);
        assert_eq!(no_v4_record[0].record_type, RecordType::Aaaa);

        assert!(build_recordset("home", None, Some(&v4), None, None).is_empty());
    }

    #[test]
    fn test_record_serializes_to_provider_shape() {
        let record = DnsRecord::new("6", "home", RecordType::Aaaa, "::2");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "6",
                "hostname": "home",
                "type": "AAAA",
                "destination": "::2",
            })
        );
    }

    #[test]
    fn test_record_listing_entry_parses() {
        let entry = serde_json::json!({
            "id": "31337",
            "hostname": "@",
            "type": "MX",
            "priority": "10",
            "destination": "mx.example.com",
            "deleterecord": false,
            "state": "yes",
        });

        let record: DnsRecord = serde_json::from_value(entry).unwrap();
        assert_eq!(record.record_type, RecordType::Other("MX".to_string()));
        assert_eq!(record.id, "31337");
    }

    #[test]
    fn test_family_matching() {
        let v4: IpAddr = "127.0.0.1".parse().unwrap();
        let v6: IpAddr = "::1".parse().unwrap();

        assert!(AddressFamily::V4.matches_ip(&v4));
        assert!(!AddressFamily::V4.matches_ip(&v6));
        assert!(AddressFamily::V6.matches_ip(&v6));
        assert_eq!(AddressFamily::from(v6), AddressFamily::V6);
        assert_eq!(AddressFamily::V6.record_type(), RecordType::Aaaa);
    }
}
