//! Relagraph - Cypher translation layer for relational databases
//!
//! This crate translates a constrained openCypher subset into SQL against a
//! relational schema that was derived from a property graph:
//! - Typed parsing of MATCH / WHERE / RETURN / ORDER BY / WITH / FOREACH
//! - Schema-aware SQL generation over label and relationship-type tables
//! - Temporary-relation materialization for WITH pipelines
//! - Per-element action expansion for FOREACH

pub mod graph_catalog;
pub mod open_cypher_parser;
pub mod sql_query_generator;

pub use sql_query_generator::translate_query;
