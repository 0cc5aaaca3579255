//! 聊天记录 CLI 客户端
//!
//! 非交互式 CLI，用于查看会话、联系人、消息以及导出聊天记录

use anyhow::Result;
use chatlog_client_rust::api::chatlog::types::{ChatlogParams, SearchParams};
use chatlog_client_rust::api::client::{ChatlogClient, ClientConfig};
use chatlog_client_rust::api::chatlog::models::message_type;
use chatlog_client_rust::utils::format::{
    format_message_preview, format_number, parse_xml_content, truncate_text,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// 聊天记录 CLI 客户端
#[derive(Parser, Debug)]
#[command(name = "chatlog-cli")]
#[command(about = "聊天记录 CLI 客户端 - 查看会话、联系人和消息", long_about = None)]
struct Args {
    /// 后端服务地址
    #[arg(short, long, default_value = "http://127.0.0.1:5030")]
    server: String,

    /// 日志级别（默认: warn,chatlog_client_rust=info）
    #[arg(long, default_value = "warn,chatlog_client_rust=info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 查看会话列表
    Sessions {
        /// 返回数量
        #[arg(short, long, default_value = "20")]
        limit: i64,
        /// 只显示有未读消息的会话
        #[arg(long)]
        unread: bool,
    },
    /// 查看联系人列表
    Contacts {
        /// 联系人类型（friend / chatroom / official）
        #[arg(short = 't', long)]
        contact_type: Option<String>,
        /// 返回数量
        #[arg(short, long, default_value = "100")]
        limit: i64,
        /// 按首字母分组显示好友
        #[arg(long)]
        grouped: bool,
    },
    /// 查看指定会话的消息
    Messages {
        /// 会话 ID
        talker: String,
        /// 返回数量
        #[arg(short, long, default_value = "50")]
        limit: i64,
        /// 偏移量
        #[arg(short, long, default_value = "0")]
        offset: i64,
    },
    /// 搜索消息
    Search {
        /// 搜索关键词
        keyword: String,
        /// 限定会话 ID
        #[arg(long)]
        talker: Option<String>,
        /// 消息类型编码
        #[arg(long)]
        msg_type: Option<i32>,
        /// 返回数量
        #[arg(short, long, default_value = "50")]
        limit: i64,
    },
    /// 导出聊天记录
    Export {
        /// 导出格式（json / csv / text）
        #[arg(short, long, default_value = "csv")]
        format: String,
        /// 会话 ID
        #[arg(long)]
        talker: Option<String>,
        /// 时间戳或时间范围（`timestamp` 或 `start~end`）
        #[arg(long)]
        time: Option<String>,
        /// 输出文件（默认 chatlog.csv / chatlog.txt）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 查看联系人和会话统计信息
    Stats,
}

/// 初始化日志（同时输出到 stderr 和文件，stdout 留给查询结果）
fn init_logger(log_level: &str) {
    use std::fs::OpenOptions;
    use std::io;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    // 优先使用环境变量 RUST_LOG（如果设置了），否则使用命令行参数
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("无法创建日志文件 debug.log");

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(true);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stderr_layer)
        .with(file_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level);

    let client = ChatlogClient::new(ClientConfig::new(&args.server))?;
    info!("[CLI] 连接服务: {}", args.server);

    match args.command {
        Command::Sessions { limit, unread } => {
            let service = client.session();
            let sessions = if unread {
                service.get_unread_sessions().await?
            } else {
                service.get_active_sessions(limit).await?
            };
            for session in &sessions {
                let preview = session
                    .last_message
                    .as_ref()
                    .map(|m| format_message_preview(m.msg_type, &m.content))
                    .unwrap_or_default();
                println!(
                    "{}{} {:24} {}",
                    if session.is_pinned { "📌" } else { "  " },
                    if session.unread_count > 0 {
                        format!("({})", session.unread_count)
                    } else {
                        "   ".to_string()
                    },
                    truncate_text(&session.name, 24, "…"),
                    truncate_text(&preview, 40, "…"),
                );
            }
            println!("共 {} 个会话", sessions.len());
        }
        Command::Contacts {
            contact_type,
            limit,
            grouped,
        } => {
            let service = client.contact();
            if grouped {
                let groups = service.get_contacts_by_letter().await?;
                for (letter, contacts) in &groups {
                    println!("== {} ==", letter);
                    for contact in contacts {
                        println!("  {} ({})", contact.display_name(), contact.wxid);
                    }
                }
            } else {
                let contacts = match contact_type.as_deref() {
                    Some("friend") => service.get_friends(limit).await?,
                    Some("chatroom") => service.get_chatrooms(limit).await?,
                    Some("official") => service.get_official_accounts(limit).await?,
                    _ => service.get_all_contacts(limit).await?,
                };
                for contact in &contacts {
                    let star = if contact.is_starred { "★ " } else { "  " };
                    println!("{}{} ({})", star, contact.display_name(), contact.wxid);
                }
                println!("共 {} 个联系人", contacts.len());
            }
        }
        Command::Messages {
            talker,
            limit,
            offset,
        } => {
            let messages = client
                .chatlog()
                .get_session_messages(&talker, limit, offset)
                .await?;
            for message in &messages {
                let mut preview = message.preview();
                // 文件消息的 content 是原始 XML，从中取出文件名
                if message.msg_type == message_type::FILE {
                    if let Some(title) = parse_xml_content(&message.content).get("title") {
                        preview = format!("[文件] {}", title);
                    }
                }
                println!(
                    "[{}] {}: {}",
                    message.create_time,
                    message.sender_name,
                    truncate_text(&preview, 60, "…"),
                );
            }
            println!("共 {} 条消息", messages.len());
        }
        Command::Search {
            keyword,
            talker,
            msg_type,
            limit,
        } => {
            let resp = client
                .chatlog()
                .search_messages(&SearchParams {
                    keyword,
                    talker,
                    msg_type,
                    limit: Some(limit),
                    ..Default::default()
                })
                .await?;
            for message in &resp.items {
                println!(
                    "[{}] {} @ {}: {}",
                    message.create_time,
                    message.sender_name,
                    message.talker,
                    truncate_text(&message.preview(), 60, "…"),
                );
            }
            println!(
                "本页 {} 条，共 {} 条",
                resp.items.len(),
                format_number(resp.total)
            );
        }
        Command::Export {
            format,
            talker,
            time,
            output,
        } => {
            let params = ChatlogParams {
                talker,
                time,
                ..Default::default()
            };
            let api = client.chatlog();
            match format.as_str() {
                "json" => {
                    let messages = api.export_json(&params).await?;
                    let path = output.unwrap_or_else(|| PathBuf::from("chatlog.json"));
                    tokio::fs::write(&path, serde_json::to_vec_pretty(&messages)?).await?;
                    println!("已导出 {} 条消息到 {}", messages.len(), path.display());
                }
                "text" => {
                    let path = output.unwrap_or_else(|| PathBuf::from("chatlog.txt"));
                    api.export_text(&params, &path).await?;
                    println!("已导出到 {}", path.display());
                }
                _ => {
                    let path = output.unwrap_or_else(|| PathBuf::from("chatlog.csv"));
                    api.export_csv(&params, &path).await?;
                    println!("已导出到 {}", path.display());
                }
            }
        }
        Command::Stats => {
            let contact_service = client.contact();
            let session_service = client.session();
            let (contact_stats, session_stats) = tokio::join!(
                contact_service.get_contact_stats(),
                session_service.get_session_stats()
            );
            let contact_stats = contact_stats?;
            let session_stats = session_stats?;
            println!("联系人: 总数 {}, 好友 {}, 群聊 {}, 公众号 {}, 星标 {}",
                contact_stats.total,
                contact_stats.friends,
                contact_stats.chatrooms,
                contact_stats.official,
                contact_stats.starred,
            );
            println!(
                "会话: 总数 {}, 私聊 {}, 群聊 {}, 未读 {}, 置顶 {}",
                session_stats.total,
                session_stats.private,
                session_stats.group,
                session_stats.unread,
                session_stats.pinned,
            );
        }
    }

    Ok(())
}
