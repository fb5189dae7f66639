pub mod admin;
pub mod auth;
pub mod entry;
pub mod legal;
pub mod referral;
pub mod sweepstakes;
pub mod webhook;

pub use admin::admin_config;
pub use auth::auth_config;
pub use entry::entry_config;
pub use legal::legal_config;
pub use referral::referral_config;
pub use sweepstakes::sweepstakes_config;
pub use webhook::webhook_config;
