extern crate actix_web;
extern crate futures;
extern crate serde_json;
#[macro_use] extern crate serde_derive;
extern crate actix;
#[macro_use] extern crate failure;
extern crate url;
extern crate chrono;
#[macro_use] extern crate log;

pub mod web;
pub mod app;
pub mod settings;
