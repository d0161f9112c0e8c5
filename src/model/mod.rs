pub mod category;
pub mod mask;
pub mod score;
