// Library root: exposes config, providers and reporting so the binary and the
// integration tests share one API.

pub mod config;
pub mod provider;
pub mod report;
