use serde::Serialize;

/// 公司状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EntityStatus {
    Live,
    /// 已解散、已撤销注册等非存续状态，保留网站上的原文
    Inactive(String),
}

impl EntityStatus {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.eq_ignore_ascii_case("live") {
            EntityStatus::Live
        } else {
            EntityStatus::Inactive(text.to_string())
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, EntityStatus::Live)
    }
}

/// 搜索结果列表中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub registry_number: String,
    pub name: String,
    pub status: EntityStatus,
    /// 该行在结果表格中的位置（用于点击）
    #[serde(skip)]
    pub row: usize,
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.registry_number)
    }
}

/// 一次搜索得到的候选实体（零个、一个或多个）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub candidates: Vec<Candidate>,
}

impl SearchResult {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}
