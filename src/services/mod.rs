pub mod calendar;
pub mod diary;
