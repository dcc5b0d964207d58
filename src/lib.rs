//! # macmaint
//!
//! A risk-aware macOS maintenance orchestrator.
//!
//! macmaint turns a catalogue of system-maintenance operations into a
//! consistent, auditable, interruption-safe run. It features:
//!
//! - **Risk-Classified Operations**: every operation carries a LOW/MEDIUM/HIGH
//!   risk level that drives confirmation wording and filtering
//! - **Per-Operation Confirmation**: interactive go/no-go gate, `--yes` for
//!   unattended runs
//! - **Auditable Reports**: one Markdown and one HTML report per run, plus an
//!   append-only log, all sharing a single run timestamp
//! - **Interruption-Safe**: signal-driven cleanup, sleep inhibition, and
//!   privilege keep-alive for the lifetime of the run
//! - **Space Accounting**: reclaimed disk space tracked across operations
//! - **100% Offline**: zero telemetry, no accounts, no cloud

pub mod cli;
pub mod common;
pub mod logging;
pub mod ops;
pub mod orchestrator;
pub mod registry;
pub mod report;
pub mod supervisor;
