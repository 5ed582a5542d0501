//! Products Domain
//!
//! Catalog products with generated codes (`PRD-YYMMDD-NNNN`) and stored images.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, JSON or multipart bodies
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, image storage, code assignment
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + Postgres / in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use core_storage::InMemoryContentStore;
//! use domain_products::{handlers, InMemoryProductRepository, ProductService};
//!
//! let store = Arc::new(InMemoryContentStore::new("/storage"));
//! let service = ProductService::new(InMemoryProductRepository::new(), store);
//! let router = handlers::router(service);
//! ```

pub mod code;
pub mod entity;
pub mod error;
pub mod form;
pub mod handlers;
pub mod image;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use code::{Clock, CodeGenerator, FixedClock, MAX_CODE_ATTEMPTS, SystemClock};
pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use image::ImageSource;
pub use models::{
    NewProduct, Price, Product, ProductChanges, ProductFilter, ProductInput, ProductPayload,
};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
