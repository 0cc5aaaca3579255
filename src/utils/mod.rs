pub mod format;
pub mod storage;

// 重新导出常用工具
pub use format::{
    format_contact_name, format_file_size, format_message_preview, format_number,
    format_video_duration, format_voice_duration, parse_json, parse_xml_content, truncate_text,
};
pub use storage::{Storage, StorageOptions, StorageScope};
