pub mod list;
pub mod record;

pub use list::{ContainerSource, DockerSource, ListRequest, SourceError};
pub use record::{ContainerRecord, PublishedPort};
