#![feature(proc_macro_hygiene, decl_macro)]
extern crate chrono;

#[macro_use]
extern crate rocket;
extern crate bcrypt;
extern crate rocket_contrib;
extern crate time;
#[macro_use]
extern crate diesel;

pub mod api;
pub mod db;
pub mod engagement;
pub mod feed;
pub mod logger;
pub mod schema;
pub mod state;
pub mod timestamp;
pub mod setup_rocket;
