//! Web-app launcher management: icon discovery for a site, and the launchers
//! installed under `~/.local/share/applications`.

pub mod config;
pub mod favicon;
pub mod http;
pub mod launchers;
pub mod storage;
#[cfg(test)]
mod tests;
