//! Signature-based file type gate.
//!
//! Detects the concrete format of uploaded files with a magic-number
//! detector and decides whether a file, or a whole collection of files, is
//! allowed under a [`Policy`]: an allow-list or deny-list of types, an
//! allowed category (documents, images, archives) or a forbidden one
//! (executables).
//!
//! ```no_run
//! use std::fs::File;
//! use typegate::{Policy, TypeGate};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gate = TypeGate::new();
//! let uploads = vec![File::open("avatar.png")?, File::open("banner.jpg")?];
//!
//! if !gate.evaluate(&Policy::allow_images(), uploads)? {
//!     println!("rejected");
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod gate;

pub use config::Config;
pub use detector::{Category, CustomType, FileType, InferDetector, TypeDetector, TypeRegistry};
pub use error::{ConfigError, GateError};
pub use gate::{FileInput, FileVerdict, Policy, TypeGate};
