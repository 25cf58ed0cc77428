pub mod reads;
pub mod reference;
pub mod report;
