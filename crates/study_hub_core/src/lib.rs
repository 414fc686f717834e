pub mod context;
pub mod domain;
pub mod extract;
pub mod filename;
pub mod ports;

pub use domain::{Account, AccountCredentials, Document};
pub use ports::{AnswerGenerator, DatabaseService, FileStore, PortError, PortResult};
