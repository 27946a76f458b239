//! Push notification delivery strategies.

mod fcm;
mod onesignal;

pub use fcm::FcmStrategy;
pub use onesignal::OneSignalStrategy;
