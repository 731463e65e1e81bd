pub mod chat;
pub mod completion;
pub mod health;
pub mod otp;
