pub mod config;
pub mod deblur;
pub mod info;
pub mod run;
