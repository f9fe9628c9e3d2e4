pub mod auth;
pub mod client;
pub mod estimator;
pub mod gate;
pub mod redact;
pub mod transport;

pub use auth::{Credential, CredentialCache, SsoAuthClient, StaticToken, TokenSource};
pub use client::EnterpriseClient;
pub use estimator::{estimate_contents, estimate_text};
pub use gate::EndpointGate;
pub use transport::{HttpTransport, TransportOptions, TransportRequest, TransportResponse};
