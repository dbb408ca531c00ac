#![allow(dead_code)]

pub mod client_hello;
pub mod mock_server;
pub mod tls;
