//! # Gridkeeper Client
//!
//! Talks to the REST backend on behalf of the grid controllers.
//!
//! - [`CollectionSource`]: list/create/update/delete for one entity type
//! - [`RemoteCollection`]: the `reqwest` implementation over an entity type's
//!   endpoints
//! - [`OptionLoader`]: parallel fetch of the collections pickers draw from
//!

pub mod error;
pub mod loader;
pub mod remote;

pub use error::{ClientError, ClientResult, NETWORK_ERROR_MESSAGE};
pub use loader::{OptionLoader, OptionSets};
pub use remote::{ApiClient, CollectionSource, Credentials, DEFAULT_AUTH_COOKIE, RemoteCollection};
