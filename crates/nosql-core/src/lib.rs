//! # nosql-core
//!
//! Core library for exploring an Oracle-style NoSQL database.
//!
//! This crate holds everything `nosql-tui` needs that does not touch the
//! terminal: the database client, DDL parsing, query construction, table
//! tree ordering, configuration, and rune-aware text helpers.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nosql_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> nosql_core::Result<()> {
//!     let config = Config::load(None)?;
//!
//!     let options = ConnectOptions {
//!         endpoint: config.connection.endpoint.clone(),
//!         port: config.connection.port.clone(),
//!         mode: ConnectMode::OnPremise,
//!     };
//!     let client = RestConnector.connect(options).await?;
//!
//!     let tables = sort_table_tree(client.list_tables().await?);
//!     let schema = TableSchema::parse(&client.get_table(&tables[0]).await?);
//!     let sql = default_sql(&tables[0], &schema.primary_keys);
//!     let rows = execute(client.as_ref(), &sql).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture (4-Layer)
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │           API Layer                 │  REST client, row values, wire models
//! ├─────────────────────────────────────┤
//! │          Core Layer                 │  DDL parser, query builder, table tree
//! ├─────────────────────────────────────┤
//! │        Storage Layer                │  Configuration file and env overrides
//! ├─────────────────────────────────────┤
//! │         Utils Layer                 │  Display width, truncation, text input
//! └─────────────────────────────────────┘
//! ```

pub use error::AppError;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use nosql_core::prelude::*;
/// ```
pub mod prelude {
    // Error handling
    pub use crate::Result;
    pub use crate::error::{AppError, ClientError, QueryError};

    // API client and models
    pub use crate::api::{
        ConnectMode, ConnectOptions, Connector, FieldValue, IndexInfo, NoSqlClient, RestConnector,
        Row, TableDetails, execute,
    };

    // Domain logic
    pub use crate::core::ddl::TableSchema;
    pub use crate::core::query::default_sql;
    pub use crate::core::tables::sort_table_tree;

    // Storage
    pub use crate::storage::config::Config;
}

/// Domain logic layer.
///
/// - [`core::ddl`]: CREATE TABLE parsing (primary keys, columns, types)
/// - [`core::query`]: default, cursor and OFFSET query construction
/// - [`core::tables`]: parent/child table ordering
pub mod core;

/// Storage layer - read-only configuration.
pub mod storage;

/// Utilities layer - display width and text editing helpers.
pub mod utils;

/// API layer - database client and row values.
///
/// - [`api::client`]: `NoSqlClient` trait and its REST implementation
/// - [`api::models`]: `FieldValue`, `Row`, index and table descriptors
pub mod api;

/// Error handling - hierarchical error system.
pub mod error;

/// Convenient Result type alias using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
