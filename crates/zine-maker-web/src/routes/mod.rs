//! HTTP route handlers for the zine maker web application.
//!
//! Routes return either HTML (askama templates) or binary data (the merged
//! booklet). Which affordances the landing page shows is decided here from
//! the booklet phase, never client-side.

mod download;
mod pages;
mod upload;

pub use download::download_booklet;
pub use pages::index;
pub use upload::upload_pages;
