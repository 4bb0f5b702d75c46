pub mod comparison;
pub mod condition;
pub mod input;
pub mod model_info;
pub mod payload;
pub mod prediction;
pub mod record;
