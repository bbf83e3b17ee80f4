//! Mesh transport: message chunking and the radio link sender.

pub mod chunker;
pub mod mesh;
pub mod traits;

pub use chunker::split_message;
pub use mesh::{MeshSender, TransportError};
pub use traits::TextSender;
