//! The CV wizard: document model, validation, completion tracking, editing
//! and the step state machine, plus the persistence seams around them.

pub mod completion;
pub mod document;
pub mod edit;
pub mod field_validation;
pub mod handlers;
pub mod progress;
pub mod render;
pub mod repository;
pub mod service;
pub mod step;
pub mod step_validation;
pub mod wizard;
