// Re-export all model types
pub use self::auth::*;
pub use self::enums::*;
pub use self::errors::*;
pub use self::feedback::*;
pub use self::food::*;
pub use self::query::*;
pub use self::rating::*;
pub use self::validation::*;

mod auth;
mod enums;
mod errors;
mod feedback;
mod food;
mod query;
mod rating;
mod validation;
