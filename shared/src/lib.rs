//! Wire types shared by the gym API and its client.

mod envelope;
mod member;

pub use envelope::*;
pub use member::*;
