//! Database access: the client façade and its data models.

pub mod client;
pub mod models;

pub use client::{
    ConnectMode, ConnectOptions, Connector, NoSqlClient, PreparedStatement, RestClient,
    RestConnector, execute,
};
pub use models::{FieldValue, IndexInfo, Row, TableDetails, is_numeric_type};
