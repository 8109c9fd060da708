//! Output generation for a finished [`Edition`](crate::models::Edition).
//!
//! # Submodules
//!
//! - [`json`]: pretty-printed JSON, one file per edition and category
//! - [`html`]: a standalone page with embedded audio and images
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-10-17/
//!     ├── morning-top-stories.json
//!     └── evening-sports.json
//!
//! html_output_dir/
//! ├── 2025-10-17_morning-top-stories.html
//! └── 2025-10-17_evening-sports.html
//! ```

pub mod html;
pub mod json;
