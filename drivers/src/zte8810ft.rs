//! Protocol driver for the ZTE 8810FT family.
//!
//! The firmware speaks terse JSON over two goform endpoints: a "set"
//! endpoint taking `goformId` commands and a "get" endpoint taking `cmd`
//! queries. Replies to commands are a bare `{"result": ...}` envelope.
//! Requests without a `Referer` pointing at the device's own web UI are
//! rejected, so the transport adds one everywhere.

use crate::error::{Action, ActionError};
use crate::http::{DeviceClient, GET_CMD_PATH, SET_CMD_PATH};
use crate::sms::{self, SmsMessage};
use crate::{BaseModem, Capability, Error, LinkStatus, ModemCell, ModemSms, ModemConfig};
use async_trait::async_trait;
use chrono::{Local, Utc};
use serde::Deserialize;
use tracing::debug;

pub(crate) const NAME: &str = "ZTE 8810FT";

const CAPABILITIES: &[Capability] = &[Capability::Cell, Capability::Sms];

#[derive(Debug)]
struct Zte8810Ft {
    client: DeviceClient,
}

pub(crate) fn new(config: ModemConfig) -> Result<Box<dyn BaseModem>, Error> {
    Ok(Box::new(Zte8810Ft {
        client: DeviceClient::new(&config)?,
    }))
}

/// Command reply envelope; anything but `success` means the device balked.
#[derive(Debug, Deserialize)]
struct CmdResult {
    result: String,
}

#[derive(Debug, Deserialize)]
struct PppStatus {
    ppp_status: String,
}

/// One record of the `sms_data_total` listing. All fields arrive as
/// strings; `content` is hex-encoded UCS-2.
#[derive(Debug, Deserialize)]
struct SmsRecord {
    id: String,
    number: String,
    content: String,
    date: String,
}

fn check_result(body: &[u8]) -> Result<(), ActionError> {
    let reply: CmdResult = DeviceClient::decode(body)?;
    if reply.result != "success" {
        return Err(ActionError::Failed(reply.result));
    }
    Ok(())
}

/// Cache-buster the stock web UI appends to every query.
fn unix_millis() -> String {
    Utc::now().timestamp_millis().to_string()
}

impl Zte8810Ft {
    async fn run_command(&self, action: Action, goform_id: &str) -> Result<(), Error> {
        let outcome = async {
            let body = self
                .client
                .get_bytes(SET_CMD_PATH, &[("goformId", goform_id)])
                .await?;
            check_result(&body)
        };
        outcome
            .await
            .map_err(|source| Error::Action { action, source })
    }

    async fn query_link_status(&self) -> Result<LinkStatus, ActionError> {
        let millis = unix_millis();
        let body = self
            .client
            .get_bytes(
                GET_CMD_PATH,
                &[
                    ("isTest", "False"),
                    ("cmd", "ppp_status"),
                    ("multi_data", "1"),
                    ("sms_received_flag_flag", "0"),
                    ("sts_received_flag_flag", "0"),
                    ("_", &millis),
                ],
            )
            .await?;
        let reply: PppStatus = DeviceClient::decode(&body)?;
        LinkStatus::from_ppp_status(&reply.ppp_status)
            .ok_or(ActionError::UnknownLinkStatus(reply.ppp_status))
    }

    async fn fetch_all_sms(&self) -> Result<Vec<SmsMessage>, ActionError> {
        let millis = unix_millis();
        let body = self
            .client
            .get_bytes(
                GET_CMD_PATH,
                &[
                    ("cmd", "sms_data_total"),
                    ("page", "0"),
                    ("data_per_page", "100"),
                    ("mem_store", "1"),
                    ("tags", "12"),
                    ("order_by", "order by id desc"),
                    ("_", &millis),
                ],
            )
            .await?;
        let records: Vec<SmsRecord> = DeviceClient::decode(&body)?;
        debug!(count = records.len(), "listing received");

        // Device order (most recent first) is passed through untouched.
        records
            .into_iter()
            .map(|record| {
                let time = sms::parse_record_date(&record.date).map_err(|source| {
                    ActionError::Record {
                        id: record.id.clone(),
                        source,
                    }
                })?;
                let body = sms::decode_ucs2(&record.content).map_err(|source| {
                    ActionError::Record {
                        id: record.id.clone(),
                        source,
                    }
                })?;
                Ok(SmsMessage {
                    id: record.id,
                    time,
                    sender: record.number,
                    body,
                })
            })
            .collect()
    }
}

impl BaseModem for Zte8810Ft {
    fn model(&self) -> &str {
        NAME
    }

    fn capabilities(&self) -> &[Capability] {
        CAPABILITIES
    }

    fn as_cell(&self) -> Option<&dyn ModemCell> {
        Some(self)
    }

    fn as_sms(&self) -> Option<&dyn ModemSms> {
        Some(self)
    }
}

#[async_trait]
impl ModemCell for Zte8810Ft {
    async fn connect_cell(&self) -> Result<(), Error> {
        self.run_command(Action::Connect, "CONNECT_NETWORK").await
    }

    async fn disconnect_cell(&self) -> Result<(), Error> {
        self.run_command(Action::Disconnect, "DISCONNECT_NETWORK")
            .await
    }

    async fn cell_link_status(&self) -> Result<LinkStatus, Error> {
        self.query_link_status()
            .await
            .map_err(|source| Error::Action {
                action: Action::Status,
                source,
            })
    }
}

#[async_trait]
impl ModemSms for Zte8810Ft {
    async fn send_sms(&self, phone: &str, message: &str) -> Result<(), Error> {
        let outcome = async {
            // Encoding failures happen here, before any network traffic.
            let body_hex = sms::encode_message_body(message)?;
            let sms_time = sms::format_send_time(&Local::now());
            let form = [
                ("goformId", "SEND_SMS"),
                ("ID", "-1"),
                ("encode_type", "GSM7_default"),
                ("Number", phone),
                ("MessageBody", body_hex.as_str()),
                ("sms_time", sms_time.as_str()),
            ];
            let body = self.client.post_form(SET_CMD_PATH, &form).await?;
            check_result(&body)
        };
        outcome.await.map_err(|source| Error::Action {
            action: Action::SmsSend,
            source,
        })
    }

    async fn read_all_sms(&self) -> Result<Vec<SmsMessage>, Error> {
        self.fetch_all_sms()
            .await
            .map_err(|source| Error::Action {
                action: Action::SmsRead,
                source,
            })
    }
}
