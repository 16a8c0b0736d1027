//! Driver that answers identity queries and nothing else. Useful as the
//! configured model on machines without a modem attached, and as the
//! base-only case in capability tests.

use crate::{BaseModem, Capability, Error, ModemConfig};
use tracing::debug;

pub(crate) const NAME: &str = "dummy";

#[derive(Debug)]
struct Dummy;

pub(crate) fn new(config: ModemConfig) -> Result<Box<dyn BaseModem>, Error> {
    debug!(host = %config.host, "dummy driver built");
    Ok(Box::new(Dummy))
}

impl BaseModem for Dummy {
    fn model(&self) -> &str {
        "Dummy"
    }

    fn capabilities(&self) -> &[Capability] {
        &[]
    }
}
