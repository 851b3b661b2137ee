//! External-service clients and session-scoped helpers
//!
//! One client per upstream REST collaborator, each with its own error enum
//! and a constructor-set request timeout, plus the in-session lookup memo.

pub mod invasive_client;
pub mod memo;
pub mod plantnet_client;
pub mod wikipedia_client;

pub use invasive_client::InvasiveSpeciesClient;
pub use memo::Memo;
pub use plantnet_client::PlantNetClient;
pub use wikipedia_client::WikipediaClient;
