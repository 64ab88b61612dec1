pub mod conflict;
pub mod entity;
pub mod resolution;
pub mod seating;
pub mod settings;
pub mod snapshot;
