#![allow(dead_code)]

pub mod airq_env;
