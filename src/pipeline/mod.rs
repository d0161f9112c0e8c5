pub mod label;
pub mod sample;
pub mod summary;
pub mod view;
