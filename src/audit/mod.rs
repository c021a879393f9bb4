//! Audit logging for the finance tracker
//!
//! Records every expense added, every budget change and every save in an
//! append-only, line-delimited JSON log (JSONL).
//!
//! # Example
//!
//! ```rust,ignore
//! use finance_tracker::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let entry = AuditEntry::update(EntityType::Budget, "monthly-budget", &100.0, &250.0);
//! logger.log(&entry)?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
