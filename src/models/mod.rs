pub mod auth;
pub mod common;
pub mod entry;
pub mod legal;
pub mod referral;
pub mod submission;
pub mod sweepstakes;
pub mod webhook_config;

pub use auth::*;
pub use common::*;
pub use entry::*;
pub use legal::*;
pub use referral::*;
pub use submission::*;
pub use sweepstakes::*;
pub use webhook_config::*;
