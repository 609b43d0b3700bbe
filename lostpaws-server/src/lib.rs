//! lostpaws-server: HTTP server for a community lost/found pet board
//!
//! Users register and log in by e-mail, post listings with an optional
//! photo, flag listings for moderation, and administrators review and
//! delete flagged listings. The crate is split into the database layer
//! (schema management plus one repository per table), the photo storage
//! collaborator, and the axum HTTP surface.

pub mod db;
pub mod http;
pub mod models;
pub mod storage;
