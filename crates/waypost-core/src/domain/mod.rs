//! Domain entities - the core business objects.

mod comment;
mod geo;
mod post;
mod user;

pub use comment::Comment;
pub use geo::GeoPoint;
pub use post::Post;
pub use user::{validate_password, User};
