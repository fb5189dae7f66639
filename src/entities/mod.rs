pub mod admin_users;
pub mod form_submissions;
pub mod legal_documents;
pub mod referrals;
pub mod sweepstakes;
pub mod sweepstakes_entries;
pub mod webhook_configs;

pub use admin_users as admin_user_entity;
pub use form_submissions as form_submission_entity;
pub use legal_documents as legal_document_entity;
pub use referrals as referral_entity;
pub use sweepstakes as sweepstakes_entity;
pub use sweepstakes_entries as sweepstakes_entry_entity;
pub use webhook_configs as webhook_config_entity;
