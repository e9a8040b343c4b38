//! core types for docket - an evidence-records service.
//!
//! this crate provides the fundamental data structures used throughout docket:
//! - [`report`]: top-level case records (police reports)
//! - [`order`]: investigation orders scoped to a report
//! - [`proceeding`]: minutes-of-proceeding scoped to an investigation order
//! - [`asset`]: evidence items scoped to a proceeding
//! - [`user`]: accounts and the two-role access model
//! - [`config`]: application configuration

#![warn(missing_docs)]

mod asset;
mod config;
mod order;
mod proceeding;
mod report;
mod user;

pub use asset::{Asset, AssetCategory, AssetCategoryError, AssetId, AssetPatch};
pub use config::{Config, DatabaseConfig, SessionConfig, UploadConfig};
pub use order::{InvestigationOrder, InvestigationOrderPatch, OrderId};
pub use proceeding::{Proceeding, ProceedingId, ProceedingPatch};
pub use report::{Report, ReportId, ReportPatch};
pub use user::{Role, RoleError, User, UserId, UserPatch};
