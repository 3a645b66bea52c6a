//! 可购买的文件类型
//!
//! 名称与表格代号都可用于解析，例如 "Annual Return" / "NAR1"。
use phf::phf_map;
use serde::Serialize;
use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocumentType {
    /// 周年申报表
    AnnualReturn,
    /// 法团成立表格
    IncorporationForm,
    /// 更改公司秘书及董事通知书
    ChangeOfSecretaryAndDirector,
    /// 更改注册办事处地址通知书
    ChangeOfRegisteredOffice,
    /// 组织章程细则
    ArticlesOfAssociation,
    /// 特别决议
    SpecialResolution,
    /// 按揭 / 押记详情
    MortgageCharge,
}

/// 别名表，键为小写
static ALIASES: phf::Map<&'static str, DocumentType> = phf_map! {
    "annual return" => DocumentType::AnnualReturn,
    "nar1" => DocumentType::AnnualReturn,
    "incorporation form" => DocumentType::IncorporationForm,
    "nnc1" => DocumentType::IncorporationForm,
    "change of secretary and director" => DocumentType::ChangeOfSecretaryAndDirector,
    "change of company secretary and director" => DocumentType::ChangeOfSecretaryAndDirector,
    "nd2a" => DocumentType::ChangeOfSecretaryAndDirector,
    "change of registered office" => DocumentType::ChangeOfRegisteredOffice,
    "nr1" => DocumentType::ChangeOfRegisteredOffice,
    "articles of association" => DocumentType::ArticlesOfAssociation,
    "articles" => DocumentType::ArticlesOfAssociation,
    "special resolution" => DocumentType::SpecialResolution,
    "mortgage" => DocumentType::MortgageCharge,
    "charge" => DocumentType::MortgageCharge,
    "mortgage/charge" => DocumentType::MortgageCharge,
};

impl DocumentType {
    pub const ALL: [DocumentType; 7] = [
        DocumentType::AnnualReturn,
        DocumentType::IncorporationForm,
        DocumentType::ChangeOfSecretaryAndDirector,
        DocumentType::ChangeOfRegisteredOffice,
        DocumentType::ArticlesOfAssociation,
        DocumentType::SpecialResolution,
        DocumentType::MortgageCharge,
    ];

    /// 网站上显示的名称
    pub fn label(self) -> &'static str {
        match self {
            DocumentType::AnnualReturn => "Annual Return",
            DocumentType::IncorporationForm => "Incorporation Form",
            DocumentType::ChangeOfSecretaryAndDirector => {
                "Notice of Change of Company Secretary and Director"
            }
            DocumentType::ChangeOfRegisteredOffice => {
                "Notice of Change of Address of Registered Office"
            }
            DocumentType::ArticlesOfAssociation => "Articles of Association",
            DocumentType::SpecialResolution => "Special Resolution",
            DocumentType::MortgageCharge => "Mortgage/Charge",
        }
    }

    /// 与文件索引中文件名称比对用的正则（不区分大小写，由调用方设置）
    pub fn pattern(self) -> &'static str {
        match self {
            DocumentType::AnnualReturn => r"annual return|\bNAR1\b",
            DocumentType::IncorporationForm => r"incorporation form|\bNNC1\b",
            DocumentType::ChangeOfSecretaryAndDirector => {
                r"change of company secretary and director|\bND2A\b"
            }
            DocumentType::ChangeOfRegisteredOffice => {
                r"change of address of registered office|\bNR1\b"
            }
            DocumentType::ArticlesOfAssociation => r"articles of association",
            DocumentType::SpecialResolution => r"special resolution",
            DocumentType::MortgageCharge => r"mortgage|\bcharge\b",
        }
    }

    fn known_names() -> String {
        Self::ALL
            .iter()
            .map(|t| t.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for DocumentType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        if let Some(doc_type) = ALIASES.get(key.as_str()) {
            return Ok(*doc_type);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(&key))
            .ok_or_else(|| ConfigError::UnknownDocumentType {
                name: s.to_string(),
                known: Self::known_names(),
            })
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_form_codes() {
        assert_eq!(
            "Annual Return".parse::<DocumentType>().unwrap(),
            DocumentType::AnnualReturn
        );
        assert_eq!(
            " nar1 ".parse::<DocumentType>().unwrap(),
            DocumentType::AnnualReturn
        );
        assert_eq!(
            "ND2A".parse::<DocumentType>().unwrap(),
            DocumentType::ChangeOfSecretaryAndDirector
        );
        assert_eq!(
            "notice of change of address of registered office"
                .parse::<DocumentType>()
                .unwrap(),
            DocumentType::ChangeOfRegisteredOffice
        );
    }

    #[test]
    fn unknown_name_lists_choices() {
        let err = "Birth Certificate".parse::<DocumentType>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Birth Certificate"));
        assert!(msg.contains("Annual Return"));
    }
}
