pub mod analyze;
pub mod estimate;
pub mod history;
pub mod share;
