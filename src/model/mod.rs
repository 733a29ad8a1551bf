pub mod action;
pub mod leave_record;
