pub mod otp;
pub mod repository;
pub mod rooms;
pub mod types;
