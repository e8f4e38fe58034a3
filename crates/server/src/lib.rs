pub mod config;
pub mod db;
pub mod error_convert;
pub mod fees;
pub mod health;
pub mod identity;
pub mod ids;
pub mod openapi;
pub mod payment;
pub mod repo;
pub mod rest;
pub mod storage;
pub mod telemetry;
