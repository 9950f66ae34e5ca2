//! # mcastmap core
//!
//! Drives the switch sessions and keeps what they learn.
//!
//! * [`session`]: the transport seam ([`session::CommandChannel`]) and the
//!   paced command-script driver that feeds a line assembler.
//! * [`scraper`]: runs the mroute and LLDP scrapes concurrently against one
//!   [`store::FactStore`]; [`scraper::ssh`] is the SSH transport.
//! * [`store`]: the in-memory fact tables and their reporting queries.
//! * [`report`]: joins the tables into per-port report rows.

pub mod report;
pub mod scraper;
pub mod session;
pub mod store;
