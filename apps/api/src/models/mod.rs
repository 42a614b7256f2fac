pub mod application;
pub mod history;
pub mod resume;
