pub mod authorize;
pub mod chat;
pub mod completion;
pub mod otp;
