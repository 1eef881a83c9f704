//! Mail relay function: accepts `POST /send-email` with a JSON body and
//! forwards it to a mail transport, by default an unauthenticated SMTP
//! catcher.

pub mod config;
pub mod dto;
pub mod function;
pub mod handlers;
pub mod service;
