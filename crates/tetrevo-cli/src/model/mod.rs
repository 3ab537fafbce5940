pub mod ai_model;
pub mod play_record;
