use crate::error::ConfigError;
use crate::models::Identifier;
use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::fs;

const DOCX_BODY: &str = "word/document.xml";

/// 读取标识符列表
///
/// `input` 指向已存在的文件时按行读取（每行一个，跳过空行与 `#` 注释），
/// `.docx` 文件则每个段落一个；否则把 `input` 本身当作唯一的标识符。
pub async fn load_identifiers(input: &str) -> Result<Vec<Identifier>> {
    let path = Path::new(input);
    let is_file = fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);

    if !is_file {
        tracing::info!("输入不是文件，按单个标识符处理: {}", input);
        return Ok(vec![Identifier::parse(input)?]);
    }

    let is_docx = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"));

    let content = if is_docx {
        let bytes = fs::read(path)
            .await
            .with_context(|| format!("无法读取标识符文件: {}", path.display()))?;
        docx_paragraphs(&bytes)
            .with_context(|| format!("无法解析 Word 文件: {}", path.display()))?
            .join("\n")
    } else {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("无法读取标识符文件: {}", path.display()))?
    };

    let identifiers = parse_identifier_lines(&content)
        .with_context(|| format!("无法解析标识符文件: {}", path.display()))?;

    tracing::info!("从 {} 读取到 {} 个标识符", path.display(), identifiers.len());
    Ok(identifiers)
}

/// 按行解析标识符，保持原有顺序
pub fn parse_identifier_lines(content: &str) -> Result<Vec<Identifier>, ConfigError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| Identifier::parse_line(line, index + 1))
        .collect()
}

/// Word 文档中每个段落的纯文本（同一段落内的多个 run 合并）
pub fn docx_paragraphs(bytes: &[u8]) -> Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).context("不是有效的 .docx 文件")?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .with_context(|| format!("缺少 {}", DOCX_BODY))?
        .read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(e) if e.name().as_ref() == b"w:t" => in_text = false,
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::End(e) if e.name().as_ref() == b"w:p" => {
                paragraphs.push(std::mem::take(&mut current));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
