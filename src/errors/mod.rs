pub mod custom;
pub mod job;
