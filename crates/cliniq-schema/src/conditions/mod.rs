pub mod diabetes;
pub mod heart_disease;
