//! Registry of deduplicated connections.
//!
//! In the best case every four-tuple is seen exactly twice, once in the report
//! of each endpoint's host. Both rows collapse into one [`Connection`] under
//! the canonical [`ConnKey`], which accumulates how many rows reported it and
//! which sources the first two came from.

use crate::engine::config::MAX_RETAINED_SOURCES;
use crate::engine::types::{ConnKey, Connection, Endpoint, Source, TcpState};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::rc::Rc;

impl Connection {
    fn new(key: ConnKey, state: TcpState, source: Rc<Source>) -> Self {
        Self {
            key,
            state,
            observations: 1,
            sources: vec![source],
        }
    }

    /// Records another row for this connection.
    ///
    /// Only the first [`MAX_RETAINED_SOURCES`] sources are kept; past that the
    /// counter still moves (saturating) so overflow can be detected without
    /// unbounded memory. The state is left as first reported.
    fn add_observation(&mut self, source: Rc<Source>) {
        self.observations = self.observations.saturating_add(1);
        if self.sources.len() < MAX_RETAINED_SOURCES {
            self.sources.push(source);
        }
    }

    /// Label of the first source that reported this connection.
    pub fn first_label(&self) -> Option<&str> {
        self.sources.first().map(|s| s.label.as_str())
    }
}

/// Ordered map of canonical connections plus the loopback-skip counter.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    conns:             BTreeMap<ConnKey, Connection>,
    localhost_skipped: u64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts and rejects rows with a loopback endpoint.
    ///
    /// Returns `true` when the row must be dropped. Callers check this before
    /// registering the row's source, so a loopback-only host contributes
    /// nothing to either registry.
    pub fn skip_loopback(&mut self, local: &Endpoint, remote: &Endpoint) -> bool {
        if local.is_loopback() || remote.is_loopback() {
            self.localhost_skipped += 1;
            true
        } else {
            false
        }
    }

    /// Folds one row into the registry.
    ///
    /// Rows are not deduplicated by source: a file repeating the same tuple
    /// counts twice.
    pub fn observe(
        &mut self,
        local:  Endpoint,
        remote: Endpoint,
        state:  TcpState,
        source: Rc<Source>,
    ) {
        let key = ConnKey::new(local, remote);

        match self.conns.entry(key) {
            Entry::Vacant(slot) => {
                let key = slot.key().clone();
                slot.insert(Connection::new(key, state, source));
            }
            Entry::Occupied(mut slot) => slot.get_mut().add_observation(source),
        }
    }

    /// Connections in canonical key order.
    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.conns.values()
    }

    pub fn len(&self) -> usize {
        self.conns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }

    pub fn localhost_skipped(&self) -> u64 {
        self.localhost_skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::sources::SourceRegistry;

    fn ep(s: &str) -> Endpoint {
        s.parse().unwrap()
    }

    #[test]
    fn test_first_observation_inserts() {
        let mut sources = SourceRegistry::new();
        let mut reg = ConnectionRegistry::new();
        let src = sources.register("10.0.0.1", "hostA");

        reg.observe(ep("10.0.0.1.5000"), ep("10.0.0.2.80"), TcpState::Established, src);
        assert_eq!(reg.len(), 1);

        let conn = reg.iter().next().unwrap();
        assert_eq!(conn.observations, 1);
        assert_eq!(conn.state, TcpState::Established);
        assert_eq!(conn.first_label(), Some("hostA"));
    }

    #[test]
    fn test_reverse_direction_merges() {
        let mut sources = SourceRegistry::new();
        let mut reg = ConnectionRegistry::new();
        let a = sources.register("10.0.0.1", "hostA");
        let b = sources.register("10.0.0.2", "hostB");

        reg.observe(ep("10.0.0.1.5000"), ep("10.0.0.2.80"), TcpState::Established, a);
        reg.observe(ep("10.0.0.2.80"), ep("10.0.0.1.5000"), TcpState::Established, b);

        assert_eq!(reg.len(), 1);
        let conn = reg.iter().next().unwrap();
        assert_eq!(conn.observations, 2);
        let labels: Vec<&str> = conn.sources.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["hostA", "hostB"]);
    }

    #[test]
    fn test_state_is_first_wins() {
        let mut sources = SourceRegistry::new();
        let mut reg = ConnectionRegistry::new();
        let a = sources.register("10.0.0.1", "hostA");
        let b = sources.register("10.0.0.2", "hostB");

        reg.observe(ep("10.0.0.1.5000"), ep("10.0.0.2.80"), TcpState::Established, a);
        reg.observe(ep("10.0.0.2.80"), ep("10.0.0.1.5000"), TcpState::Closed, b);

        let conn = reg.iter().next().unwrap();
        assert_eq!(conn.key, ConnKey::new(ep("10.0.0.1.5000"), ep("10.0.0.2.80")));
        assert_eq!(conn.state, TcpState::Established);
    }

    #[test]
    fn test_retains_two_sources_and_keeps_counting() {
        let mut sources = SourceRegistry::new();
        let mut reg = ConnectionRegistry::new();

        for i in 0..5 {
            let src = sources.register(&format!("10.0.1.{}", i), &format!("host{}", i));
            reg.observe(ep("10.0.0.1.5000"), ep("10.0.0.2.80"), TcpState::Established, src);
        }

        let conn = reg.iter().next().unwrap();
        assert_eq!(conn.observations, 5);
        assert_eq!(conn.sources.len(), MAX_RETAINED_SOURCES);
        assert_eq!(conn.sources[1].label, "host1");
    }

    #[test]
    fn test_count_saturates() {
        let mut sources = SourceRegistry::new();
        let mut reg = ConnectionRegistry::new();
        let src = sources.register("10.0.0.1", "hostA");

        for _ in 0..300 {
            reg.observe(
                ep("10.0.0.1.5000"),
                ep("10.0.0.2.80"),
                TcpState::Established,
                Rc::clone(&src),
            );
        }

        assert_eq!(reg.iter().next().unwrap().observations, u8::MAX);
    }

    #[test]
    fn test_skip_loopback_counts() {
        let mut reg = ConnectionRegistry::new();

        assert!(reg.skip_loopback(&ep("127.0.0.1.22"), &ep("10.0.0.1.5000")));
        assert!(reg.skip_loopback(&ep("10.0.0.1.5000"), &ep("127.0.0.1.22")));
        assert!(!reg.skip_loopback(&ep("10.0.0.1.5000"), &ep("10.0.0.2.22")));

        assert_eq!(reg.localhost_skipped(), 2);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_iteration_is_key_ordered() {
        let mut sources = SourceRegistry::new();
        let mut reg = ConnectionRegistry::new();
        let src = sources.register("10.0.0.1", "hostA");

        reg.observe(ep("10.0.0.1.9"), ep("10.0.0.3.80"), TcpState::Established, Rc::clone(&src));
        reg.observe(ep("10.0.0.1.7"), ep("10.0.0.2.80"), TcpState::Established, Rc::clone(&src));
        reg.observe(ep("10.0.0.1.8"), ep("10.0.0.2.80"), TcpState::Established, src);

        let ports: Vec<u16> = reg.iter().map(|c| c.key.a.port).collect();
        assert_eq!(ports, [7, 8, 9]);
    }
}
