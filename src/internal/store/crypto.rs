//! 进度条目的对称加密：单把密钥落盘复用，随机 nonce 前置拼接。
//!
//! 定位是防止进度文件被随手翻看的混淆手段，不是安全边界：
//! 拿到密钥文件即可解开任何条目，密钥文件丢失则全部历史进度作废。

use std::path::Path;

use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use tokio::fs;

use super::error::StoreError;

/// 密钥长度（字节）
const KEY_LEN: usize = 32;

/// nonce 长度（字节），密文前置拼接
const NONCE_LEN: usize = 12;

/// 进度条目加解密器。
pub struct StoreCipher {
    cipher: ChaCha20Poly1305,
}

impl StoreCipher {
    /// 从密钥文件加载；文件不存在时生成新密钥并写入，之后所有条目复用同一把。
    pub async fn load_or_generate(key_path: &Path) -> Result<Self, StoreError> {
        let key_bytes = match fs::read(key_path).await {
            Ok(bytes) => {
                if bytes.len() != KEY_LEN {
                    return Err(StoreError::BadKeyLength {
                        expected: KEY_LEN,
                        actual: bytes.len(),
                    });
                }
                bytes
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let key = ChaCha20Poly1305::generate_key(&mut OsRng);
                fs::write(key_path, key.as_slice())
                    .await
                    .map_err(StoreError::WriteKey)?;
                key.as_slice().to_vec()
            }
            Err(e) => return Err(StoreError::ReadKey(e)),
        };

        let key = Key::from_slice(&key_bytes);
        Ok(Self {
            cipher: ChaCha20Poly1305::new(key),
        })
    }

    /// 加密：返回 `nonce || 密文`。
    pub fn seal(&self, plain: &[u8]) -> Result<Vec<u8>, StoreError> {
        let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plain)
            .map_err(|_| StoreError::Encrypt)?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// 解密 `nonce || 密文`；数据不完整或校验失败一律报解密错误，不做部分恢复。
    pub fn open(&self, data: &[u8]) -> Result<Vec<u8>, StoreError> {
        if data.len() < NONCE_LEN {
            return Err(StoreError::Decrypt);
        }
        let (nonce, ciphertext) = data.split_at(NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| StoreError::Decrypt)
    }
}
