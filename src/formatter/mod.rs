pub mod naming;
mod writer;

pub use naming::{class_name, quote, to_camel_case};
pub use writer::IndentedWriter;
