pub mod filters;
pub mod modifiers;
pub mod preprocessors;
pub mod processors;
