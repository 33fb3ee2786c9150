//! 持久化后端
//!
//! 只负责把一整份 JSON 文本读出来或写进去，不认识单元和课程

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::{AppResult, StoreError};

/// 持久化后端
pub trait Persistence: Send {
    /// 读取已保存的文档，不存在时返回 None
    fn load(&self) -> AppResult<Option<String>>;

    /// 覆盖保存整份文档
    fn save(&mut self, document: &str) -> AppResult<()>;
}

/// 文件后端：先写临时文件再重命名
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Persistence for FilePersistence {
    fn load(&self) -> AppResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::ReadFailed {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(Some(content))
    }

    fn save(&mut self, document: &str) -> AppResult<()> {
        let tmp = self.tmp_path();
        let write_failed = |source| StoreError::WriteFailed {
            path: self.path.display().to_string(),
            source,
        };

        fs::write(&tmp, document).map_err(write_failed)?;
        fs::rename(&tmp, &self.path).map_err(write_failed)?;
        debug!("进度已写入 {} ({} 字节)", self.path.display(), document.len());
        Ok(())
    }
}

/// 内存后端，克隆后共享同一份内容
#[derive(Clone, Default)]
pub struct MemoryPersistence {
    document: Arc<Mutex<Option<String>>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Arc::new(Mutex::new(Some(document.into()))),
        }
    }

    /// 当前保存的内容
    pub fn snapshot(&self) -> Option<String> {
        self.document
            .lock()
            .map(|doc| doc.clone())
            .unwrap_or_default()
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> AppResult<Option<String>> {
        Ok(self.snapshot())
    }

    fn save(&mut self, document: &str) -> AppResult<()> {
        if let Ok(mut doc) = self.document.lock() {
            *doc = Some(document.to_string());
        }
        Ok(())
    }
}
