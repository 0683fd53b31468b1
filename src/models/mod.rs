pub mod agentmodel;
pub mod leadmodel;
pub mod propertymodel;
