#![allow(dead_code)]

pub mod archive;
pub mod test_env;
