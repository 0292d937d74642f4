//! Domain models for the case console.

mod case;
mod intake;
mod person;
mod rating;
mod record;
mod resource;

pub use case::*;
pub use intake::*;
pub use person::*;
pub use rating::*;
pub use record::*;
pub use resource::*;
