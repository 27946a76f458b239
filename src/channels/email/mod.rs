//! Email delivery strategies.

mod sendgrid;
mod ses;

pub use sendgrid::SendGridStrategy;
pub use ses::SesStrategy;
