//! Repository access classification.
//!
//! Decides whether a repository can be read anonymously and validates
//! tokens against the provider's metadata API before they are attached to a
//! [`Reference`](crate::reference::Reference).

mod classifier;
mod transport;

pub use classifier::{AccessClassifier, AuthError};
pub use transport::{
    DEFAULT_HTTP_TIMEOUT, HttpRequest, ReqwestTransport, Transport, TransportError,
    resolve_timeout,
};
