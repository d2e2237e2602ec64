pub mod meal;
pub mod mood_entry;
pub mod reminder;
