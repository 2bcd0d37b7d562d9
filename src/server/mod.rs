pub mod protocol;
pub mod tcp;

// Re-exports for convenience
pub use protocol::{ProtocolError, Request, Response};
pub use tcp::{GenerationClient, GenerationServer, handle_request};
