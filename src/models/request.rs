use regex::{Regex, RegexBuilder};

use crate::error::ConfigError;
use crate::models::DocumentType;

/// 调用方的购买意图，整个批次不变
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub document_type: DocumentType,
    /// 每个公司请求的文件份数
    pub quantity: u32,
    matcher: Regex,
}

impl RequestSpec {
    pub fn new(document_type: DocumentType, quantity: u32) -> Result<Self, ConfigError> {
        if quantity == 0 {
            return Err(ConfigError::InvalidQuantity);
        }
        let matcher = RegexBuilder::new(document_type.pattern())
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            document_type,
            quantity,
            matcher,
        })
    }

    /// 文件索引中的文件名是否属于所请求的类型
    pub fn matches_document(&self, document_name: &str) -> bool {
        self.matcher.is_match(document_name)
    }
}
