//! Job-application tracker and the "clear all data" action. Plain CRUD over
//! Postgres; no session or AI involvement.

pub mod handlers;
