pub mod documents;
pub mod identity;
pub mod metrics;

pub use documents::{DocumentStore, HttpDocumentStore};
pub use identity::{HttpIdentityClient, IdentityVerifier, VerifiedIdentity};
pub use metrics::{get_metrics, init_metrics};
