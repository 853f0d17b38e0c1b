// Public routes (`/`, `/health`) answer without credentials; everything under
// `/api/stories` passes the auth gate first.
pub mod service;
pub mod stories;

pub use stories::{Created, StoryHandler};
