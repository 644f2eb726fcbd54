pub mod history_store;
pub mod jobs;
pub mod regions;
pub mod segments;
pub mod session;
