//! finreport binary crate: pipeline orchestration, the report delivery
//! endpoint, and the provisioning-tool runner.

pub mod pipeline;
pub mod provision;
pub mod web;
