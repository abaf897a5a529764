//! Terminal interaction: private key prompt and the interactive menu.

pub mod menu;

pub use menu::{Menu, MenuChoice};
