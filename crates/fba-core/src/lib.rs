pub mod consts;
pub mod deblur;
pub mod error;
pub mod filters;
pub mod frame;
pub mod io;
pub mod pipeline;
