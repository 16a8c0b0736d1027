//! HTTP plumbing shared by drivers for goform-style management APIs.
//!
//! All request construction lives here: the two fixed endpoints, the
//! anti-hotlinking `Referer` header the firmware insists on, and the
//! optional binding of outbound connections to one local interface.

use crate::error::{ActionError, Error};
use crate::ModemConfig;
use reqwest::{header, StatusCode};
use serde::de::DeserializeOwned;
use std::net::{IpAddr, Ipv4Addr};
use tracing::debug;
use url::{form_urlencoded, Url};

/// Command endpoint ("set"), shared by connect/disconnect/send.
pub(crate) const SET_CMD_PATH: &str = "/goform/goform_set_cmd_process";
/// Query endpoint ("get"), shared by status and message listing.
pub(crate) const GET_CMD_PATH: &str = "/goform/goform_get_cmd_process";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// One device's HTTP client: a [`reqwest::Client`] configured once with the
/// overall timeout (and source address, when bound), plus the base URL.
/// Holds no per-request state, so sharing across tasks is fine; the device
/// itself is the part that cannot take overlapping commands.
#[derive(Debug)]
pub(crate) struct DeviceClient {
    http: reqwest::Client,
    base: Url,
    referer: String,
}

impl DeviceClient {
    pub(crate) fn new(config: &ModemConfig) -> Result<Self, Error> {
        let base = Url::parse(&format!("http://{}/", config.host)).map_err(|err| {
            Error::Config {
                key: "host",
                value: config.host.clone(),
                reason: err.to_string(),
            }
        })?;

        let mut builder = reqwest::Client::builder().timeout(config.timeout);
        if let Some(interface) = config.interface.as_deref() {
            let addr = interface_ipv4(interface)?;
            debug!(interface, %addr, "binding outbound requests");
            builder = builder.local_address(IpAddr::V4(addr));
        }
        let http = builder.build().map_err(|err| Error::Config {
            key: "transport",
            value: config.host.clone(),
            reason: err.to_string(),
        })?;

        let referer = format!("http://{}/index.html", config.host);
        Ok(Self { http, base, referer })
    }

    /// GET `path` with the given query parameters. Returns the body bytes of
    /// a 200 reply; anything else surfaces as-is, unread.
    pub(crate) async fn get_bytes(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<u8>, ActionError> {
        let url = self.url(path, query);
        debug!(%url, "request");
        let response = self
            .http
            .get(url)
            .header(header::REFERER, &self.referer)
            .send()
            .await?;
        Self::read_ok(response).await
    }

    /// POST `path` with a form-urlencoded body.
    pub(crate) async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<Vec<u8>, ActionError> {
        let url = self.url(path, &[]);
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form)
            .finish();
        debug!(%url, body, "request");
        let response = self
            .http
            .post(url)
            .header(header::REFERER, &self.referer)
            .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;
        Self::read_ok(response).await
    }

    pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ActionError> {
        serde_json::from_slice(body).map_err(|source| ActionError::Unmarshal {
            raw: body.to_vec(),
            source,
        })
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        url.set_path(path);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    async fn read_ok(response: reqwest::Response) -> Result<Vec<u8>, ActionError> {
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ActionError::Status(status));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// First IPv4 address of the named local interface. Hosts with several NICs
/// use this to reach a modem that only answers on one of them.
fn interface_ipv4(name: &str) -> Result<Ipv4Addr, Error> {
    let config_error = |reason: String| Error::Config {
        key: "interface",
        value: name.to_owned(),
        reason,
    };

    let addrs = nix::ifaddrs::getifaddrs().map_err(|err| config_error(err.to_string()))?;
    let mut seen = false;
    for ifaddr in addrs {
        if ifaddr.interface_name != name {
            continue;
        }
        seen = true;
        if let Some(sin) = ifaddr.address.as_ref().and_then(|a| a.as_sockaddr_in()) {
            return Ok(Ipv4Addr::from(sin.ip()));
        }
    }

    Err(config_error(if seen {
        "interface has no IPv4 address".to_owned()
    } else {
        "no such interface".to_owned()
    }))
}
