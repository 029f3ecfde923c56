use crate::engine::types::{ConnKey, Endpoint};
use std::fmt;

impl ConnKey {
    /// Builds the canonical, direction-agnostic key for a connection.
    ///
    /// Host X reports `(x, y)` and host Y reports `(y, x)` for the same
    /// connection; both produce the same key because the endpoints are sorted
    /// by address string, then by port.
    pub fn new(local: Endpoint, remote: Endpoint) -> Self {
        if local <= remote {
            Self { a: local, b: remote }
        } else {
            Self { a: remote, b: local }
        }
    }

    /// Both addresses of the key, smaller first.
    pub fn addrs(&self) -> (&str, &str) {
        (&self.a.addr, &self.b.addr)
    }
}

impl fmt::Display for ConnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>21} <-> {:>21}", self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ep(addr: &str, port: u16) -> Endpoint {
        Endpoint::new(addr, port)
    }

    #[test]
    fn test_key_sorts_by_address_first() {
        let key = ConnKey::new(ep("10.0.0.2", 1), ep("10.0.0.1", 9));
        assert_eq!(key.a, ep("10.0.0.1", 9));
        assert_eq!(key.b, ep("10.0.0.2", 1));
    }

    #[test]
    fn test_key_address_order_is_textual() {
        // "10.0.0.10" < "10.0.0.9" as strings.
        let key = ConnKey::new(ep("10.0.0.9", 1), ep("10.0.0.10", 1));
        assert_eq!(key.a.addr, "10.0.0.10");
    }

    #[test]
    fn test_key_port_breaks_ties() {
        let key = ConnKey::new(ep("10.0.0.1", 5000), ep("10.0.0.1", 80));
        assert_eq!(key.a.port, 80);
        assert_eq!(key.b.port, 5000);
    }

    #[test]
    fn test_display() {
        let key = ConnKey::new(ep("10.0.0.1", 5000), ep("10.0.0.2", 80));
        let expected = format!(
            "{}10.0.0.1:5000 <-> {}10.0.0.2:80",
            " ".repeat(8),
            " ".repeat(10),
        );
        assert_eq!(key.to_string(), expected);
    }

    proptest! {
        #[test]
        fn prop_key_is_commutative(
            a in "[0-9]{1,3}(\\.[0-9]{1,3}){3}",
            pa in any::<u16>(),
            b in "[0-9]{1,3}(\\.[0-9]{1,3}){3}",
            pb in any::<u16>(),
        ) {
            let forward = ConnKey::new(ep(&a, pa), ep(&b, pb));
            let reverse = ConnKey::new(ep(&b, pb), ep(&a, pa));
            prop_assert!(forward.a <= forward.b);
            prop_assert_eq!(forward, reverse);
        }
    }
}
