//! 字幕模块：字幕数据类型、校验、合并与 SRT/VTT 序列化。
//!
//! Caption types and post-processing: structural validation, overlap merge,
//! and SRT/VTT text serialization for downstream consumers.

mod format;
mod merge;
mod types;
mod validate;

pub use format::{to_srt, to_vtt};
pub use merge::merge_overlapping;
pub use types::{Caption, CaptionTrack, Word};
pub use validate::validate_track;
