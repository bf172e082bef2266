pub mod extract;
pub mod name;
pub mod sample;
pub mod select;
