//! Solar PV power prediction: a physics-labelled synthetic dataset, a trained
//! regressor chosen by holdout R², and horizon/orientation synthesis on top.

pub mod api_docs;
pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod shared_state;
