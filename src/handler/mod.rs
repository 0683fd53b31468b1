pub mod auth;
pub mod leads;
pub mod properties;
pub mod sms;
