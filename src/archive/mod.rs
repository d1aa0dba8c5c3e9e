//! Archive codecs.
//!
//! - [`targz`]: the inner control and data archives
//! - [`deb`]: the outer `ar` container that wraps them

pub mod deb;
pub mod targz;

pub use deb::{assemble, assemble_in, extract_all, members, read_member, MemberInfo};
pub use targz::GeneratedFile;
