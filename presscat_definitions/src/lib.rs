#![recursion_limit = "1024"]
#![allow(renamed_and_removed_lints)]

#[macro_use]
extern crate serde_derive;
extern crate serde;
extern crate serde_json;
extern crate serde_yaml;

#[macro_use]
extern crate log;

extern crate regex;

#[macro_use]
extern crate error_chain;
error_chain! {
    types {
        Error, ErrorKind, ResultExt, Result;
    }
    links {}
    foreign_links {
        Fmt(::std::fmt::Error);
        Io(::std::io::Error) #[cfg(unix)];
        SerdeY(serde_yaml::Error);
        SerdeJ(serde_json::Error);
    }
    errors {
        InvalidConfig(reason: String) {
            description("compiler config does not validate")
            display("compiler config does not validate: {}", &reason)
        }
        MissingConfig(path: String) {
            description("compiler config file not found")
            display("compiler config file '{}' not found", &path)
        }
    }
}

/// Compiler configuration for images and fixed paths
pub mod config;
pub use config::Config;

/// Structs nested in the site resource
pub mod structs;

/// The Wordpress site resource
pub mod wordpress;
pub use wordpress::{Component, Wordpress, WordpressSpec};

/// Slash-separated path helpers
pub mod paths;
