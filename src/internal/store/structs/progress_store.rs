//! 进度存储：传输记录的唯一持久化写入方，所有操作经同一把锁串行化。

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::sync::Mutex;

use crate::internal::store::codec;
use crate::internal::store::crypto::StoreCipher;
use crate::internal::store::error::StoreError;

use super::transfer_descriptor::TransferDescriptor;

/// 进度条目扩展名
const ENTRY_EXTENSION: &str = "transfer";

/// 保存协议期间的临时文件扩展名（`<条目名>.transfer.tmp`）
const TMP_EXTENSION: &str = "transfer.tmp";

/// 密钥文件名
const KEY_FILE_NAME: &str = "store.key";

/// 进度存储：每个目标路径一个加密条目，条目名由目标路径确定性导出。
///
/// 所有 save / load / delete 在内部互斥锁内完成完整的编码、加密与文件替换序列，
/// 这是并发取段任务之间防止条目交错损坏的唯一串行化点。
pub struct ProgressStore {
    dir: PathBuf,
    cipher: StoreCipher,
    lock: Mutex<()>,
}

impl ProgressStore {
    /// 打开指定目录下的进度存储；目录不存在则创建，密钥文件缺失则生成。
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(StoreError::CreateDir)?;
        let cipher = StoreCipher::load_or_generate(&dir.join(KEY_FILE_NAME)).await?;

        Ok(Self {
            dir,
            cipher,
            lock: Mutex::new(()),
        })
    }

    /// 目标路径对应的条目文件路径：`<dir>/<sha256(dest) 前 16 位十六进制>.transfer`。
    pub fn entry_path(&self, dest: &str) -> PathBuf {
        let digest = Sha256::digest(dest.as_bytes());
        self.dir
            .join(format!("{}.{}", &hex::encode(digest)[..16], ENTRY_EXTENSION))
    }

    /// 保存传输记录：编码、加密后先写临时文件，再一次原子改名替换条目。
    ///
    /// 任何时刻崩溃，条目位置上要么是完整的旧内容要么是完整的新内容，
    /// 不会出现半写状态；残留的临时文件由后续保存覆盖，load 不读取它。
    pub async fn save(&self, descriptor: &TransferDescriptor) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;

        let sealed = self.cipher.seal(&codec::encode(descriptor))?;
        let entry = self.entry_path(&descriptor.dest);
        let tmp = tmp_path(&entry);

        fs::write(&tmp, &sealed)
            .await
            .map_err(StoreError::WriteEntry)?;
        if let Err(e) = fs::rename(&tmp, &entry).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(StoreError::ReplaceEntry(e));
        }

        tracing::trace!(entry = %entry.display(), confirmed = descriptor.confirmed_bytes(), "进度已落盘");
        Ok(())
    }

    /// 加载目标路径的传输记录；无条目返回 `None`。
    ///
    /// 解密或解码失败直接报错，不做部分恢复；调用方据此决定重新开始。
    pub async fn load(&self, dest: &str) -> Result<Option<TransferDescriptor>, StoreError> {
        let _guard = self.lock.lock().await;

        let entry = self.entry_path(dest);
        let sealed = match fs::read(&entry).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::ReadEntry(e)),
        };

        let plain = self.cipher.open(&sealed)?;
        let descriptor = codec::decode(&plain)?;
        Ok(Some(descriptor))
    }

    /// 删除目标路径的条目；条目不存在时为无操作，幂等。
    pub async fn delete(&self, dest: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;

        let entry = self.entry_path(dest);
        match fs::remove_file(&entry).await {
            Ok(()) => {
                tracing::debug!(entry = %entry.display(), "进度条目已删除");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::DeleteEntry(e)),
        }
    }
}

/// 条目对应的临时文件路径（保存协议窗口内存在）。
fn tmp_path(entry: &Path) -> PathBuf {
    entry.with_extension(TMP_EXTENSION)
}
