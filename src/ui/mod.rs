pub mod charts;
pub mod panels;
pub mod plot;
pub mod table;
