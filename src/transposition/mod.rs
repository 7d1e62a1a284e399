pub mod chord_transpose;

pub use chord_transpose::{transpose_document, transpose_name};
