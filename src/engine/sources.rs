//! Registry of hosts the tool has data for.
//!
//! A source is keyed by a local IP address rather than by file: a host with
//! several interfaces contributes one entry per address, all sharing the
//! file's label. The classifier uses membership here to tell "the other side
//! never reported this" apart from "we never heard from the other side".

use crate::engine::types::Source;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Ordered set of known sources, keyed by IP string.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    sources: BTreeMap<String, Rc<Source>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the source for `ip`, creating it with `label` if needed.
    ///
    /// The first label registered for an address wins. A later file that uses
    /// the same local address gets the existing entry back and its label is
    /// ignored.
    pub fn register(&mut self, ip: &str, label: &str) -> Rc<Source> {
        if let Some(existing) = self.sources.get(ip) {
            return Rc::clone(existing);
        }

        let source = Rc::new(Source {
            ip:    ip.to_string(),
            label: label.to_string(),
        });
        self.sources.insert(ip.to_string(), Rc::clone(&source));
        source
    }

    pub fn lookup(&self, ip: &str) -> Option<&Rc<Source>> {
        self.sources.get(ip)
    }

    /// Whether some input file claimed `ip` as a local address.
    pub fn contains(&self, ip: &str) -> bool {
        self.lookup(ip).is_some()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Sources in IP order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<Source>> {
        self.sources.values()
    }
}
