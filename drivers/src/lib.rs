//! Capability-based drivers for USB modems that expose a proprietary HTTP
//! management API.
//!
//! A [`DriverRegistry`] maps a model name to a constructor producing a
//! [`BaseModem`] handle. Drivers declare which capabilities they implement;
//! callers narrow a handle to [`ModemCell`] or [`ModemSms`] at runtime and
//! get a typed error, never a crash, when a capability is missing.
//!
//! ```rust,no_run
//! use modem_drivers::{DriverRegistry, ModemConfig};
//!
//! # async fn run() -> Result<(), modem_drivers::Error> {
//! let registry = DriverRegistry::with_builtin();
//! let modem = registry.resolve("ZTE 8810FT", ModemConfig::new("192.168.0.1"))?;
//!
//! let cell = modem.cell()?;
//! println!("link is {}", cell.cell_link_status().await?);
//! # Ok(())
//! # }
//! ```
//!
//! Every operation is a single HTTP round trip that blocks the calling task
//! until completion or timeout; nothing is retried or cached. Handles hold
//! only immutable configuration, but the device itself is not guaranteed to
//! serialize overlapping commands, so callers should not issue concurrent
//! operations against one physical modem.

use async_trait::async_trait;
use std::time::Duration;

mod dummy;
mod error;
mod http;
mod link;
mod registry;
pub mod sms;
mod zte8810ft;

pub use error::{Action, ActionError, Error};
pub use link::LinkStatus;
pub use registry::{Constructor, DriverRegistry};
pub use sms::{CodecError, SmsMessage};

/// Default bound on one command round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport configuration handed to a driver constructor.
#[derive(Debug, Clone)]
pub struct ModemConfig {
    /// Device address, `host` or `host:port`.
    pub host: String,
    /// Overall per-request timeout.
    pub timeout: Duration,
    /// Local network interface to dial from, for hosts with several NICs.
    pub interface: Option<String>,
}

impl ModemConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            timeout: DEFAULT_TIMEOUT,
            interface: None,
        }
    }
}

/// A capability a driver may declare at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Cellular link control: [`ModemCell`].
    Cell,
    /// SMS exchange: [`ModemSms`].
    Sms,
}

/// Contract every driver implements: model identity plus an explicit
/// declaration of the capabilities it supports.
pub trait BaseModem: Send + Sync + std::fmt::Debug {
    /// Human-readable model name.
    fn model(&self) -> &str;

    /// Capabilities this driver declared at construction.
    fn capabilities(&self) -> &[Capability];

    /// Narrows to cellular-link control, if declared.
    fn as_cell(&self) -> Option<&dyn ModemCell> {
        None
    }

    /// Narrows to SMS control, if declared.
    fn as_sms(&self) -> Option<&dyn ModemSms> {
        None
    }
}

impl dyn BaseModem {
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Narrows to [`ModemCell`], reporting an unsupported-operation error
    /// for drivers that did not declare the capability.
    pub fn cell(&self) -> Result<&dyn ModemCell, Error> {
        self.as_cell().ok_or_else(|| Error::Unsupported {
            model: self.model().to_owned(),
            operation: "cell connection",
        })
    }

    /// Narrows to [`ModemSms`], reporting an unsupported-operation error
    /// for drivers that did not declare the capability.
    pub fn sms(&self) -> Result<&dyn ModemSms, Error> {
        self.as_sms().ok_or_else(|| Error::Unsupported {
            model: self.model().to_owned(),
            operation: "SMS",
        })
    }
}

/// Cellular link control.
///
/// Connect and disconnect are fire-and-forget: the device acknowledges the
/// command, and reaching `Up`/`Down` is for the caller to poll if it cares.
#[async_trait]
pub trait ModemCell: BaseModem {
    async fn connect_cell(&self) -> Result<(), Error>;

    async fn disconnect_cell(&self) -> Result<(), Error>;

    /// Fresh, side-effect-free read of the current link state.
    async fn cell_link_status(&self) -> Result<LinkStatus, Error>;
}

/// SMS exchange.
#[async_trait]
pub trait ModemSms: BaseModem {
    async fn send_sms(&self, phone: &str, message: &str) -> Result<(), Error>;

    /// All stored messages, most recent first as the device lists them.
    /// Each call re-fetches; nothing is kept between calls.
    async fn read_all_sms(&self) -> Result<Vec<SmsMessage>, Error>;
}
