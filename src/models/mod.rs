pub mod diary_entry;
pub mod user;
