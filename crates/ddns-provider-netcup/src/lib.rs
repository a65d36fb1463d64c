// # netcup DNS Provider
//
// This crate implements the DNS provider traits against the netcup CCP
// JSON API.
//
// ## Protocol
//
// Every call is a `POST` of `{"action": ..., "param": {...}}` to a single
// endpoint. `param` always carries `customernumber` and `apikey`, and
// `apisessionid` once logged in. Every response carries `status`; anything
// other than `"success"` is an error and the whole response is kept as the
// error payload.
//
// | Action             | Extra params                        | Used by                   |
// |--------------------|-------------------------------------|---------------------------|
// | `login`            | `apipassword`                       | `NetcupClient::login`     |
// | `infoDnsRecords`   | `domainname`                        | `fetch_dns_records`       |
// | `updateDnsRecords` | `domainname`, `dnsrecordset`        | `update_dns_recordset`    |
//
// ## Security
//
// - The API key, password and session id NEVER appear in logs
// - Debug output of every type in this crate redacts them
//
// ## API Reference
//
// - https://ccp.netcup.net/run/webservice/servers/endpoint.php

use async_trait::async_trait;
use ddns_core::config::Credentials;
use ddns_core::model::DnsRecord;
use ddns_core::traits::{DnsProvider, ProviderLogin};
use ddns_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ACTION_LOGIN: &str = "login";
pub const ACTION_INFO_DNS_RECORDS: &str = "infoDnsRecords";
pub const ACTION_UPDATE_DNS_RECORDS: &str = "updateDnsRecords";

const STATUS_SUCCESS: &str = "success";

/// Request envelope
#[derive(Serialize)]
struct Request<'a, P: Serialize> {
    action: &'a str,
    param: Param<'a, P>,
}

/// Parameters common to every action, plus the action's own
#[derive(Serialize)]
struct Param<'a, P: Serialize> {
    customernumber: &'a str,
    apikey: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    apisessionid: Option<&'a str>,
    #[serde(flatten)]
    extra: P,
}

#[derive(Serialize)]
struct LoginParams<'a> {
    apipassword: &'a str,
}

#[derive(Serialize)]
struct DomainParams<'a> {
    domainname: &'a str,
}

#[derive(Serialize)]
struct UpdateParams<'a> {
    domainname: &'a str,
    dnsrecordset: RecordSet<'a>,
}

#[derive(Serialize)]
struct RecordSet<'a> {
    dnsrecords: &'a [DnsRecord],
}

#[derive(Deserialize)]
struct LoginData {
    apisessionid: String,
}

#[derive(Deserialize)]
struct RecordListing {
    dnsrecords: Vec<DnsRecord>,
}

/// Shared request plumbing for both halves of the client
#[derive(Clone)]
struct ApiClient {
    http: reqwest::Client,
    endpoint: String,
    customer_number: String,
    /// ⚠️ NEVER log this value
    api_key: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoint", &self.endpoint)
            .field("customer_number", &self.customer_number)
            .field("api_key", &"<REDACTED>")
            .finish()
    }
}

impl ApiClient {
    /// Send one action and return the `responsedata` of a successful response
    ///
    /// # Returns
    ///
    /// - `Ok(Value)`: `responsedata` (may be an empty string for some actions)
    /// - `Err(Error::Transport)`: Unreachable endpoint or non-2xx status
    /// - `Err(Error::Json)`: Body is not JSON
    /// - `Err(Error::ProviderApi)`: `status` is not `"success"`
    async fn request<P: Serialize>(
        &self,
        action: &str,
        session_id: Option<&str>,
        extra: P,
    ) -> Result<Value> {
        let body = Request {
            action,
            param: Param {
                customernumber: &self.customer_number,
                apikey: &self.api_key,
                apisessionid: session_id,
                extra,
            },
        };

        tracing::debug!("netcup API call: {}", action);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(format!(
                "netcup API returned HTTP {} for {}",
                status, action
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))?;
        let mut data: Value = serde_json::from_str(&text)?;

        if data.get("status").and_then(Value::as_str) != Some(STATUS_SUCCESS) {
            return Err(Error::provider_api(action, text));
        }

        Ok(data
            .get_mut("responsedata")
            .map(Value::take)
            .unwrap_or(Value::Null))
    }
}

/// Unauthenticated netcup client
///
/// Consumed by [`ProviderLogin::login`], which yields a [`NetcupSession`].
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the session will:
/// - Perform the login and every read
/// - Log the intended record set write
/// - **NOT** send `updateDnsRecords`
pub struct NetcupClient {
    api: ApiClient,
    /// Used only for login. ⚠️ NEVER log this value
    api_password: String,
    dry_run: bool,
}

impl std::fmt::Debug for NetcupClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetcupClient")
            .field("api", &self.api)
            .field("api_password", &"<REDACTED>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl NetcupClient {
    /// Create a new netcup client
    ///
    /// # Parameters
    ///
    /// - `credentials`: Customer number, API key and API password
    /// - `endpoint`: JSON API endpoint, usually
    ///   [`DEFAULT_API_ENDPOINT`](ddns_core::config::DEFAULT_API_ENDPOINT)
    pub fn new(credentials: Credentials, endpoint: impl Into<String>) -> Self {
        let Credentials {
            customer_number,
            api_key,
            api_password,
        } = credentials;

        Self {
            api: ApiClient {
                http: reqwest::Client::new(),
                endpoint: endpoint.into(),
                customer_number,
                api_key,
            },
            api_password,
            dry_run: false,
        }
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[async_trait]
impl ProviderLogin for NetcupClient {
    type Session = NetcupSession;

    async fn login(self) -> Result<NetcupSession> {
        let params = LoginParams {
            apipassword: &self.api_password,
        };

        let data = match self.api.request(ACTION_LOGIN, None, params).await {
            Ok(data) => data,
            Err(Error::ProviderApi { payload, .. }) => return Err(Error::auth(payload)),
            Err(e) => return Err(e),
        };

        let LoginData { apisessionid } = serde_json::from_value(data)
            .map_err(|e| Error::auth(format!("Login response has no session id: {}", e)))?;

        tracing::debug!("netcup session established");

        Ok(NetcupSession {
            api: self.api,
            session_id: apisessionid,
            dry_run: self.dry_run,
        })
    }
}

/// Authenticated netcup session
///
/// There is no logout; the session ends when the value is dropped.
pub struct NetcupSession {
    api: ApiClient,
    /// ⚠️ NEVER log this value
    session_id: String,
    dry_run: bool,
}

impl std::fmt::Debug for NetcupSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetcupSession")
            .field("api", &self.api)
            .field("session_id", &"<REDACTED>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

#[async_trait]
impl DnsProvider for NetcupSession {
    async fn fetch_dns_records(&self, domain: &str) -> Result<Vec<DnsRecord>> {
        let data = self
            .api
            .request(
                ACTION_INFO_DNS_RECORDS,
                Some(&self.session_id),
                DomainParams { domainname: domain },
            )
            .await?;

        let listing: RecordListing = serde_json::from_value(data)?;
        tracing::debug!("{} holds {} record(s)", domain, listing.dnsrecords.len());
        Ok(listing.dnsrecords)
    }

    async fn update_dns_recordset(&self, domain: &str, records: &[DnsRecord]) -> Result<()> {
        let params = UpdateParams {
            domainname: domain,
            dnsrecordset: RecordSet { dnsrecords: records },
        };

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send {} with payload: {}",
                ACTION_UPDATE_DNS_RECORDS,
                serde_json::to_string(&params)?
            );
            return Ok(());
        }

        self.api
            .request(ACTION_UPDATE_DNS_RECORDS, Some(&self.session_id), params)
            .await?;
        Ok(())
    }
}
