mod resource;

pub use resource::{Resource, ResourceList, Stamp, Stamped};
