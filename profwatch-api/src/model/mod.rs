pub mod monitor;
pub mod profile_record;
