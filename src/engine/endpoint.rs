//! Normalization of netstat `address.port` tokens.

use crate::engine::config::LOOPBACK_ADDR;
use crate::engine::error::EndpointError;
use crate::engine::types::Endpoint;
use std::fmt;
use std::str::FromStr;

impl Endpoint {
    pub fn new(addr: impl Into<String>, port: u16) -> Self {
        Self { addr: addr.into(), port }
    }

    /// Whether this endpoint is on the loopback address.
    pub fn is_loopback(&self) -> bool {
        self.addr == LOOPBACK_ADDR
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    /// Parses a netstat endpoint such as `10.0.0.1.5000`.
    ///
    /// The address itself contains dots, so the split anchors on the rightmost
    /// one. The port must be plain decimal digits in `0..=65535`; signs,
    /// whitespace and trailing characters are rejected.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (addr, port) = token
            .rsplit_once('.')
            .ok_or_else(|| EndpointError::MissingSeparator(token.to_string()))?;

        if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EndpointError::InvalidPort(port.to_string()));
        }

        // All digits, so the only way to fail is overflow.
        let port = port
            .parse::<u16>()
            .map_err(|_| EndpointError::PortOutOfRange(port.to_string()))?;

        Ok(Self::new(addr, port))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Render to a String first so width/alignment flags apply to the whole
        // `addr:port` text.
        f.pad(&format!("{}:{}", self.addr, self.port))
    }
}
