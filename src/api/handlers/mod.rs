pub mod auth_otp;

pub mod health;
pub use self::health::health;
