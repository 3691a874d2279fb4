// src/lib.rs
// =============================================================================
// Library root shared by the two binaries:
//
// - spider (src/main.rs): crawl a site and download the images it references
// - scorpion (src/bin/scorpion.rs): print the metadata stored in image files
// =============================================================================

pub mod cli;
pub mod config;
pub mod crawl;
pub mod download;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod metadata;
