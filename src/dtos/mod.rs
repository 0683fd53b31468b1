pub mod agentdtos;
pub mod leaddtos;
pub mod propertydtos;
