pub mod auth_service;
pub mod entry_service;
pub mod legal_service;
pub mod referral_service;
pub mod submission_service;
pub mod sweepstakes_service;
pub mod webhook_config_service;

pub use auth_service::*;
pub use entry_service::*;
pub use legal_service::*;
pub use referral_service::*;
pub use submission_service::*;
pub use sweepstakes_service::*;
pub use webhook_config_service::*;
