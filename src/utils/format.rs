//! 格式化工具
//!
//! 纯函数，无状态；输入相同则输出相同

use crate::api::chatlog::models::message_type;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::warn;

/// 文件大小单位表（1024 进制）
const SIZE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// 格式化文件大小
///
/// 0 返回 `0 B`，负数返回 `-`；单位按 `floor(log(bytes)/log(1024))` 选取
pub fn format_file_size(bytes: i64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    if bytes < 0 {
        return "-".to_string();
    }

    // 等价于 floor(log(bytes) / log(1024))，整数运算避免浮点误差
    let i = (bytes.ilog2() / 10) as usize;
    let i = i.min(SIZE_UNITS.len() - 1);
    let size = bytes as f64 / 1024f64.powi(i as i32);

    let mut formatted = format!("{:.*}", decimals, size);
    if formatted.contains('.') {
        formatted = formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string();
    }
    format!("{} {}", formatted, SIZE_UNITS[i])
}

/// 格式化数字：添加千分位分隔符
pub fn format_number(num: i64) -> String {
    let digits = num.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if num < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// 格式化百分比，总数为 0 时返回 `0%`
pub fn format_percent(value: f64, total: f64, decimals: usize) -> String {
    if total == 0.0 {
        return "0%".to_string();
    }
    format!("{:.*}%", decimals, value / total * 100.0)
}

/// 格式化消息预览：按消息类型映射占位文案
///
/// 文本消息透传原文（空内容退回占位），未知类型返回固定文案
pub fn format_message_preview(msg_type: i32, content: &str) -> String {
    match msg_type {
        message_type::TEXT => {
            if content.is_empty() {
                "[文本消息]".to_string()
            } else {
                content.to_string()
            }
        }
        message_type::IMAGE => "[图片]".to_string(),
        message_type::VOICE => "[语音]".to_string(),
        message_type::VIDEO => "[视频]".to_string(),
        message_type::EMOJI => "[表情]".to_string(),
        message_type::LOCATION => "[位置]".to_string(),
        message_type::FILE => "[文件]".to_string(),
        message_type::SYSTEM => "[系统消息]".to_string(),
        message_type::REVOKE => "[撤回消息]".to_string(),
        _ => "[未知消息]".to_string(),
    }
}

/// 格式化消息内容：合并空白字符，可选按最大长度截断
pub fn format_message_content(content: &str, max_length: Option<usize>) -> String {
    let formatted: String = content.split_whitespace().collect::<Vec<_>>().join(" ");
    match max_length {
        Some(max) if formatted.chars().count() > max => {
            let truncated: String = formatted.chars().take(max).collect();
            format!("{}...", truncated)
        }
        _ => formatted,
    }
}

/// 截断文本，超长时保留后缀
pub fn truncate_text(text: &str, max_length: usize, suffix: &str) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    let keep = max_length.saturating_sub(suffix.chars().count());
    let truncated: String = text.chars().take(keep).collect();
    format!("{}{}", truncated, suffix)
}

/// 格式化联系人显示名称
///
/// 优先级：备注 > 昵称 > 别名 > 微信号，全部为空时退回固定文案
pub fn format_contact_name(remark: &str, nickname: &str, alias: &str, wxid: &str) -> String {
    [remark, nickname, alias, wxid]
        .iter()
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "未知联系人".to_string())
}

/// 格式化语音时长
///
/// 60 秒以内向上取整为 `N″`，超过则渲染为 `M′S″`（残余秒向上取整）
pub fn format_voice_duration(duration: f64) -> String {
    if !duration.is_finite() || duration <= 0.0 {
        return "0″".to_string();
    }
    if duration < 60.0 {
        return format!("{}″", duration.ceil() as i64);
    }
    let minutes = (duration / 60.0).floor() as i64;
    let seconds = (duration % 60.0).ceil() as i64;
    format!("{}′{}″", minutes, seconds)
}

/// 格式化视频时长：`MM:SS`，超过一小时为 `HH:MM:SS`
pub fn format_video_duration(duration: f64) -> String {
    if !duration.is_finite() || duration <= 0.0 {
        return "00:00".to_string();
    }
    let total = duration.floor() as i64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

fn xml_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<(\w+)>([^<]*)</(\w+)>").unwrap())
}

/// 解析消息内容中的简单 XML，提取 `<标签>值</标签>` 形式的字段
///
/// 语音、文件等非文本消息的 `content` 是微信原始 XML。
/// 只处理无属性、无嵌套的叶子标签；输入不是 XML 时返回空映射，从不 panic
pub fn parse_xml_content(xml: &str) -> HashMap<String, String> {
    let mut result = HashMap::new();
    for caps in xml_tag_regex().captures_iter(xml) {
        // 开闭标签必须一致
        if caps[1] == caps[3] {
            result.insert(caps[1].to_string(), caps[2].to_string());
        }
    }
    result
}

/// 手机号脱敏：中间四位显示为 `*`，不足 11 位数字时原样返回
pub fn format_phone(phone: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(\d{3})\d{4}(\d{4})").unwrap());
    re.replace(phone, "${1}****${2}").into_owned()
}

/// 身份证号脱敏：出生日期段显示为 `*`，不足 18 位数字时原样返回
pub fn format_id_card(id_card: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(\d{6})\d{8}(\d{4})").unwrap());
    re.replace(id_card, "${1}********${2}").into_owned()
}

/// 格式化银行卡号：去掉已有空白后每四位插入一个空格
pub fn format_bank_card(card_number: &str) -> String {
    let digits: String = card_number.chars().filter(|c| !c.is_whitespace()).collect();
    let mut out = String::with_capacity(digits.len() + digits.len() / 4);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// 安全解析 JSON：失败时记录日志并返回调用方提供的默认值，从不 panic
pub fn parse_json<T: serde::de::DeserializeOwned>(s: &str, fallback: T) -> T {
    match serde_json::from_str(s) {
        Ok(value) => value,
        Err(e) => {
            warn!("[Format] JSON 解析失败: {}", e);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_size_sentinels() {
        assert_eq!(format_file_size(0, 2), "0 B");
        assert_eq!(format_file_size(-1, 2), "-");
    }

    #[test]
    fn file_size_units() {
        assert_eq!(format_file_size(512, 2), "512 B");
        assert_eq!(format_file_size(1024, 2), "1 KB");
        assert_eq!(format_file_size(1536, 2), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024, 2), "1 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024, 2), "5 GB");
        assert_eq!(format_file_size(1024_i64.pow(4), 2), "1 TB");
        assert_eq!(format_file_size(1024_i64.pow(5), 2), "1 PB");
    }

    #[test]
    fn file_size_unit_is_monotone() {
        let mut last_unit = 0;
        for exp in 0..6 {
            let formatted = format_file_size(1024_i64.pow(exp), 2);
            let suffix = formatted.split(' ').nth(1).unwrap();
            let unit = SIZE_UNITS.iter().position(|u| *u == suffix).unwrap();
            assert!(unit >= last_unit);
            last_unit = unit;
        }
    }

    #[test]
    fn number_with_separators() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(-1234567), "-1,234,567");
        assert_eq!(format_number(i64::MIN), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn percent_with_zero_total() {
        assert_eq!(format_percent(1.0, 0.0, 2), "0%");
        assert_eq!(format_percent(1.0, 4.0, 2), "25.00%");
        assert_eq!(format_percent(1.0, 3.0, 0), "33%");
    }

    #[test]
    fn voice_duration() {
        assert_eq!(format_voice_duration(45.0), "45″");
        assert_eq!(format_voice_duration(44.2), "45″");
        assert_eq!(format_voice_duration(75.0), "1′15″");
        assert_eq!(format_voice_duration(0.0), "0″");
        assert_eq!(format_voice_duration(-3.0), "0″");
    }

    #[test]
    fn video_duration() {
        assert_eq!(format_video_duration(65.0), "01:05");
        assert_eq!(format_video_duration(3665.0), "01:01:05");
        assert_eq!(format_video_duration(0.0), "00:00");
        assert_eq!(format_video_duration(-1.0), "00:00");
    }

    #[test]
    fn message_preview_lookup() {
        assert_eq!(format_message_preview(1, "你好"), "你好");
        assert_eq!(format_message_preview(1, ""), "[文本消息]");
        assert_eq!(format_message_preview(3, ""), "[图片]");
        assert_eq!(format_message_preview(34, ""), "[语音]");
        assert_eq!(format_message_preview(43, ""), "[视频]");
        assert_eq!(format_message_preview(10002, ""), "[撤回消息]");
        assert_eq!(format_message_preview(424242, ""), "[未知消息]");
    }

    #[test]
    fn message_content_collapse_and_truncate() {
        assert_eq!(format_message_content("  a \n b\t c ", None), "a b c");
        assert_eq!(format_message_content("hello world", Some(5)), "hello...");
    }

    #[test]
    fn truncate_keeps_suffix_budget() {
        assert_eq!(truncate_text("hello", 10, "..."), "hello");
        assert_eq!(truncate_text("hello world", 8, "..."), "hello...");
        assert_eq!(truncate_text("中文也按字符数截断测试", 6, "…"), "中文也按字…");
    }

    #[test]
    fn contact_name_precedence() {
        assert_eq!(format_contact_name("备注", "昵称", "alias", "wxid"), "备注");
        assert_eq!(format_contact_name("", "昵称", "alias", "wxid"), "昵称");
        assert_eq!(format_contact_name("", "", "alias", "wxid"), "alias");
        assert_eq!(format_contact_name("", "", "", "wxid"), "wxid");
        assert_eq!(format_contact_name("", "", "", ""), "未知联系人");
    }

    #[test]
    fn xml_content_extracts_leaf_tags() {
        let xml = "<msg><title>报销单.pdf</title><des>第三季度</des></msg>";
        let fields = parse_xml_content(xml);
        assert_eq!(fields["title"], "报销单.pdf");
        assert_eq!(fields["des"], "第三季度");
        assert!(!fields.contains_key("msg"));
    }

    #[test]
    fn xml_content_degrades_to_empty_map() {
        assert!(parse_xml_content("").is_empty());
        assert!(parse_xml_content("纯文本，不是 XML").is_empty());
        // 开闭标签不一致的片段被跳过
        assert!(parse_xml_content("<a>1</b>").is_empty());
    }

    #[test]
    fn phone_masks_middle_digits() {
        assert_eq!(format_phone("13812345678"), "138****5678");
        assert_eq!(format_phone("123"), "123");
        assert_eq!(format_phone(""), "");
    }

    #[test]
    fn id_card_masks_birth_date() {
        assert_eq!(format_id_card("110101199001011234"), "110101********1234");
        assert_eq!(format_id_card("12345"), "12345");
    }

    #[test]
    fn bank_card_groups_by_four() {
        assert_eq!(format_bank_card("6222021234567890"), "6222 0212 3456 7890");
        assert_eq!(format_bank_card("6222 0212 34567890123"), "6222 0212 3456 7890 123");
        assert_eq!(format_bank_card(""), "");
    }

    #[test]
    fn parse_json_falls_back() {
        let value: serde_json::Value = parse_json("not json", serde_json::json!({}));
        assert_eq!(value, serde_json::json!({}));
        let parsed: Vec<i32> = parse_json("[1,2,3]", vec![]);
        assert_eq!(parsed, vec![1, 2, 3]);
    }
}
