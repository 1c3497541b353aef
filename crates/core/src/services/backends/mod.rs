pub mod gdb;

pub use gdb::GdbBackend;
