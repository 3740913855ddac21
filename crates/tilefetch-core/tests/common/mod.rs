#![allow(dead_code)]

#[cfg(unix)]
pub mod docker_daemon;
pub mod http_server;
