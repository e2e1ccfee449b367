pub mod api;
pub mod api_client;
pub mod cart;
pub mod chat;
pub mod cli;
pub mod config;
pub mod database;
pub mod dispatcher;
pub mod endpoints;
pub mod errors;
pub mod http;
pub mod lifecycle;
pub mod query;
pub mod routes;
pub mod seed;
pub mod threadpool;
