//! duct picture files.
//!
//! A picture file holds one or more curve records, each a list of knots with
//! their optional tangents. See [`parser`] for the accepted layout.

pub mod file;
pub mod lexer;
pub mod parser;
pub mod writer;

pub use file::{read_picture_file, write_picture_file, write_picture_file_all, PictureFile};
pub use parser::parse_picture;
pub use writer::{format_picture, Picture};
