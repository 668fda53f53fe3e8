use crate::error::RegistryError;
use crate::models::RegisteredClient;
use chrono::Local;
use indexmap::IndexMap;
use md5::{Digest, Md5};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// 客户登记簿 (JSON 文件持久化, 保持插入顺序)
#[derive(Debug)]
pub struct ClientRegistry {
    path: PathBuf,
    clients: RwLock<IndexMap<String, RegisteredClient>>,
}

/// 客户 ID: 小写名字的 MD5 前 12 位十六进制 (与已有 clients.json 一致)
pub fn client_id(name: &str) -> String {
    let digest = Md5::digest(name.to_lowercase().as_bytes());
    let mut hex = format!("{:x}", digest);
    hex.truncate(12);
    hex
}

impl ClientRegistry {
    /// 加载登记簿; 文件不存在时创建空文件
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref().to_path_buf();
        let clients = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let empty = IndexMap::new();
                save(&path, &empty).await?;
                empty
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            clients: RwLock::new(clients),
        })
    }

    /// 新建, 或只更新非空字段
    pub async fn add_or_update(
        &self,
        name: &str,
        phone: &str,
        email: &str,
        notes: &str,
    ) -> Result<RegisteredClient, RegistryError> {
        let id = client_id(name);
        let now = Local::now().naive_local();
        let mut clients = self.clients.write().await;

        let client = match clients.get_mut(&id) {
            Some(existing) => {
                if !phone.is_empty() {
                    existing.phone = phone.to_string();
                }
                if !email.is_empty() {
                    existing.email = email.to_string();
                }
                if !notes.is_empty() {
                    existing.notes = notes.to_string();
                }
                existing.updated_at = now;
                existing.clone()
            }
            None => {
                let created = RegisteredClient {
                    id: id.clone(),
                    name: name.to_string(),
                    phone: phone.to_string(),
                    email: email.to_string(),
                    notes: notes.to_string(),
                    created_at: now,
                    updated_at: now,
                };
                clients.insert(id, created.clone());
                created
            }
        };

        save(&self.path, &clients).await?;
        Ok(client)
    }

    pub async fn get(&self, id: &str) -> Option<RegisteredClient> {
        self.clients.read().await.get(id).cloned()
    }

    pub async fn get_by_name(&self, name: &str) -> Option<RegisteredClient> {
        self.get(&client_id(name)).await
    }

    /// 名字/电话/邮箱 不区分大小写的子串匹配
    pub async fn search(&self, query: &str) -> Vec<RegisteredClient> {
        let query = query.to_lowercase();
        self.clients
            .read()
            .await
            .values()
            .filter(|c| {
                c.name.to_lowercase().contains(&query)
                    || c.phone.to_lowercase().contains(&query)
                    || c.email.to_lowercase().contains(&query)
            })
            .cloned()
            .collect()
    }

    pub async fn all(&self) -> Vec<RegisteredClient> {
        self.clients.read().await.values().cloned().collect()
    }

    pub async fn delete(&self, id: &str) -> Result<bool, RegistryError> {
        let mut clients = self.clients.write().await;
        if clients.shift_remove(id).is_none() {
            return Ok(false);
        }
        save(&self.path, &clients).await?;
        Ok(true)
    }
}

async fn save(path: &Path, clients: &IndexMap<String, RegisteredClient>) -> Result<(), RegistryError> {
    let json = serde_json::to_vec_pretty(clients)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
