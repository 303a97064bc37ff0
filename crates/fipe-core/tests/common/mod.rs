#![allow(dead_code)]

pub mod fipe_server;
