pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod media;
pub mod notifications;
pub mod receipts;
pub mod repository;
pub mod service;
