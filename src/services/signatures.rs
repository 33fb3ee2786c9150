//! 图标签名表
//!
//! 课程按钮里的图标地址 → 图标类型。图片地址只要包含某个签名就算命中，
//! 文件名由宿主应用决定，换图标时只需要在配置里补充签名。

use std::collections::BTreeMap;

use phf::phf_map;

use crate::models::MarkerKind;

/// 内置签名
static BUILTIN_SIGNATURES: phf::Map<&'static str, MarkerKind> = phf_map! {
    "bfa591f6854b4de08e1656b3e8ca084f.svg" => MarkerKind::LegendaryIncomplete,
    "53727b0c96103443bc616435bb1f2fbc.svg" => MarkerKind::Completed,
};

/// 签名表
#[derive(Debug, Clone)]
pub struct SignatureTable {
    entries: BTreeMap<String, MarkerKind>,
}

impl SignatureTable {
    /// 内置签名表
    pub fn builtin() -> Self {
        let entries = BUILTIN_SIGNATURES
            .entries()
            .map(|(signature, kind)| (signature.to_string(), *kind))
            .collect();
        Self { entries }
    }

    /// 添加或覆盖一个签名
    pub fn with_signature(mut self, signature: impl Into<String>, kind: MarkerKind) -> Self {
        self.entries.insert(signature.into(), kind);
        self
    }

    /// 合并多个签名（配置文件中的补充项）
    pub fn extend<I, S>(mut self, signatures: I) -> Self
    where
        I: IntoIterator<Item = (S, MarkerKind)>,
        S: Into<String>,
    {
        for (signature, kind) in signatures {
            self.entries.insert(signature.into(), kind);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 识别单个图片地址；多个签名同时命中时取最长的一个
    pub fn lookup(&self, image_source: &str) -> Option<MarkerKind> {
        self.entries
            .iter()
            .filter(|(signature, _)| image_source.contains(signature.as_str()))
            .max_by_key(|(signature, _)| signature.len())
            .map(|(_, kind)| *kind)
    }

    /// 按顺序检查按钮里的图片，第一个认得的图片决定类型
    pub fn classify<'a, I>(&self, image_sources: I) -> Option<MarkerKind>
    where
        I: IntoIterator<Item = &'a String>,
    {
        image_sources
            .into_iter()
            .find_map(|source| self.lookup(source))
    }
}

impl Default for SignatureTable {
    fn default() -> Self {
        Self::builtin()
    }
}
