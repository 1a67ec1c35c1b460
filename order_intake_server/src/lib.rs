//! # Pizzeria order intake server
//! This crate hosts the HTTP server for the order intake pipeline. It is responsible for:
//! Listening for incoming webhook requests from the workflow-automation bot and the voice agent.
//! Converting each source's payload into the engine's common order shape.
//! Handing the order to the [`order_intake_engine`] and translating the outcome into an HTTP response.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/webhook/n8n`: Orders placed through the workflow-automation bot.
//! * `/webhook/vapi`: Call events from the voice agent. Only end-of-call reports create orders.
//!
//! Both webhook routes answer `OPTIONS` pre-flight requests, and every response carries permissive CORS headers.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod intake_adapters;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
