//! Adapters around the external transformation crates.
//!
//! Each adapter takes source text or bytes and returns the transformed
//! result. Steps in `pipeline` compose them; nothing here touches the
//! build directory.
//!
//! | Module     | Crate       | Used by |
//! |------------|-------------|---------|
//! | `sass`     | grass       | styles  |
//! | `css`      | lightningcss| styles  |
//! | `include`  | regex       | scripts |
//! | `js`       | oxc         | scripts |
//! | `image`    | image       | images  |
//! | `svg`      | usvg        | images  |
//! | `template` | minijinja   | views   |

pub mod css;
pub mod image;
pub mod include;
pub mod js;
pub mod sass;
pub mod svg;
pub mod template;
