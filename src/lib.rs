//! Backend for the Elysene Engineering portfolio site.
//!
//! Serves the contact form relay (`POST /api/send`), the public site
//! settings, and the XML sitemap.

pub mod brevo;
pub mod config;
pub mod contact;
pub mod handler;
pub mod i18n;
pub mod server;
pub mod sitemap;
