//! netcmp: cross-reference `netstat` snapshots taken on several hosts and
//! report TCP connections that one side still holds while the other side has
//! already discarded them.

pub mod cli;
pub mod engine;
pub mod logger;
pub mod report;
