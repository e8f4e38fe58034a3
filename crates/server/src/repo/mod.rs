pub mod draft;
pub mod file;
pub mod payment;
