//! Restructures flat jsdoc comment records into a package → module → class
//! documentation model.
//!
//! Pipeline per module: [`records`] → [`tags`] → [`classify`] → [`assemble`].
//! [`walker`] drives one package, [`driver`] all configured packages.
pub mod assemble;
pub mod classify;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod extract;
pub mod ir;
pub mod logging;
pub mod model;
pub mod overview;
pub mod path_de;
pub mod prefilter;
pub mod records;
pub mod tags;
pub mod walker;

pub use assemble::{assemble, Assembly};
pub use error::{ApidocError, Result};
