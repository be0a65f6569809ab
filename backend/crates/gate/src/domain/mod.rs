pub mod capability;
pub mod context;
pub mod policy;
pub mod predicates;
pub mod response;
