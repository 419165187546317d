pub mod compare;
pub mod policy;
