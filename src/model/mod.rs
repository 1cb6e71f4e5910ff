pub mod character;
pub mod stats;
pub mod turn;
pub mod turn_report;
