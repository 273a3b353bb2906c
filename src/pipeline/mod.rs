//! Pipeline stages of a live analysis.
//!
//! Each submodule implements exactly one step, so each can be tested without
//! the others (and without a network).
//!
//! ## Data Flow
//!
//! ```text
//! encode ──▶ request ──▶ transport ──▶ decode
//! (base64)   (JSON body)  (one POST)   (fences, validation)
//! ```
//!
//! 1. [`encode`]   : read the document and base64-wrap it
//! 2. [`request`]  : build the two-part messages request body
//! 3. [`transport`]: send it once; surface the vendor's error message
//! 4. [`decode`]   : pull the first text part, strip fences, validate

pub mod decode;
pub mod encode;
pub mod request;
pub mod transport;
