//! HTTP protocol layer module
//!
//! Path resolution, content types, listings and response builders shared by
//! the file handlers.

pub mod listing;
pub mod mime;
pub mod path;
pub mod response;

pub use response::{
    build_403_response, build_404_response, build_500_response, build_501_response,
    build_encoded_response, build_file_response, build_head_response, build_html_response,
    build_redirect_response, FileResponse,
};
