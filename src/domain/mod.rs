// Domain layer - Core business logic

pub mod errors;
pub mod model;
pub mod queue;
pub mod rules;
