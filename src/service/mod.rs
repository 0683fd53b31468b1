pub mod assignment_service;
pub mod error;
pub mod sms_service;
