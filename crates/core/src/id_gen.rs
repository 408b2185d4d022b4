//! Client order id generation
//!
//! Every routed order carries an id we generated ourselves, so a rejected or
//! timed-out order can still be looked up on the venue it was sent to.

use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::timing::millis;

/// Both Binance (`newClientOrderId`) and Bybit (`orderLinkId`) cap ids at 36 chars
pub const MAX_CLIENT_ORDER_ID_LEN: usize = 36;

/// Client-assigned order identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientOrderId(String);

impl ClientOrderId {
    pub fn new() -> Self {
        Self(generate_client_order_id("BX"))
    }

    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ClientOrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ClientOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `<prefix>-<millis>-<nanoid>`, truncated to the exchange limit
pub fn generate_client_order_id(prefix: &str) -> String {
    let id = format!("{prefix}-{}-{}", millis(), nanoid!(12));
    id.chars().take(MAX_CLIENT_ORDER_ID_LEN).collect()
}
