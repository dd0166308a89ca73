//! Page components, one per route. Pages are view glue: forms and lists
//! that call the session core and the endpoint helpers in `net::api`.

pub mod about;
pub mod activities;
pub mod dashboard;
pub mod donate;
pub mod home;
pub mod login;
