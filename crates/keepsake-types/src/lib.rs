//! Shared record and wire types for the keepsake service.

pub mod api;
pub mod models;
