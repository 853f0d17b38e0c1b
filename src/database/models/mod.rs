pub mod story;

pub use story::{NewStory, Story, StoryChanges, StoryId};
