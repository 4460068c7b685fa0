pub mod code;
pub mod err;
pub mod r;
