//! Domain types of the Paylane gateway and the ports to the billing
//! application it plugs into.

pub mod account;
pub mod config;
pub mod hash;
pub mod invoice;
pub mod notification;
pub mod ports;
pub mod transaction;
