use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use mockall::automock;
use serde::{Deserialize, Serialize};
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};

/// The persisted session document. Field names on disk are the storage keys
/// the API client has always used, so an existing session survives upgrades.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SessionData {
    pub token: String,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(rename = "messageShown", default)]
    pub welcome_shown: bool,
}

impl SessionData {
    /// A freshly issued session: the welcome message has not been shown yet.
    pub fn new(token: String, is_admin: bool, username: Option<String>) -> Self {
        Self {
            token,
            is_admin,
            username,
            welcome_shown: false,
        }
    }
}

/// Remembered login credentials, stored in clear text on explicit user
/// request. Lifecycle is independent of the session itself.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RememberedCredentials {
    #[serde(rename = "rememberedUsername")]
    pub username: String,
    #[serde(rename = "rememberedPassword")]
    pub password: String,
}

#[automock]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn write(
        &self,
        session: SessionData,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    async fn read(&self)
        -> Result<Option<SessionData>, Box<dyn std::error::Error + Send + Sync>>;
    async fn mark_welcome_shown(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    async fn clear(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    async fn write_remembered(
        &self,
        credentials: RememberedCredentials,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    async fn read_remembered(
        &self,
    ) -> Result<Option<RememberedCredentials>, Box<dyn std::error::Error + Send + Sync>>;
    async fn clear_remembered(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// File-backed store keeping the session and the remembered credentials as
/// two JSON documents under the configured data directory.
#[derive(Clone)]
pub struct FileSystemStore {
    session_path: PathBuf,
    credentials_path: PathBuf,
}

impl FileSystemStore {
    pub fn new(data_dir: String) -> Self {
        Self {
            session_path: Path::new(&data_dir).join("session.json"),
            credentials_path: Path::new(&data_dir).join("credentials.json"),
        }
    }

    async fn write_document<T: Serialize>(
        path: &Path,
        document: &T,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }

        let payload = serde_json::to_vec_pretty(document)?;

        let mut file = File::create(path).await?;

        if let Err(e) = file.write_all(&payload).await {
            file.shutdown().await?;
            return Err(Box::new(e));
        }

        file.shutdown().await?;

        Ok(())
    }

    async fn read_document<T: for<'de> Deserialize<'de>>(
        path: &Path,
    ) -> Result<Option<T>, Box<dyn std::error::Error + Send + Sync>> {
        if !path.exists() {
            return Ok(None);
        }

        let mut file = File::open(path).await?;
        let mut buffer = vec![];

        file.read_to_end(&mut buffer).await?;

        let document = serde_json::from_slice::<T>(&buffer)?;

        Ok(Some(document))
    }

    fn remove_document(path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }

        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSystemStore {
    async fn write(
        &self,
        session: SessionData,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        debug!("persisting session");

        FileSystemStore::write_document(&self.session_path, &session).await
    }

    async fn read(
        &self,
    ) -> Result<Option<SessionData>, Box<dyn std::error::Error + Send + Sync>> {
        FileSystemStore::read_document(&self.session_path).await
    }

    async fn mark_welcome_shown(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let session = FileSystemStore::read_document::<SessionData>(&self.session_path).await?;

        match session {
            Some(mut s) => {
                s.welcome_shown = true;
                FileSystemStore::write_document(&self.session_path, &s).await
            }
            None => Ok(()),
        }
    }

    async fn clear(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        debug!("clearing session");

        FileSystemStore::remove_document(&self.session_path)
    }

    async fn write_remembered(
        &self,
        credentials: RememberedCredentials,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        FileSystemStore::write_document(&self.credentials_path, &credentials).await
    }

    async fn read_remembered(
        &self,
    ) -> Result<Option<RememberedCredentials>, Box<dyn std::error::Error + Send + Sync>> {
        FileSystemStore::read_document(&self.credentials_path).await
    }

    async fn clear_remembered(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        FileSystemStore::remove_document(&self.credentials_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &std::path::Path) -> FileSystemStore {
        FileSystemStore::new(dir.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn read_returns_none_when_no_session_was_written() {
        let dir = std::env::temp_dir().join("product-admin-store-empty");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let store = store_in(&dir);

        store.clear().await.unwrap();

        assert!(store.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn session_round_trips_and_clear_removes_everything() {
        let dir = std::env::temp_dir().join("product-admin-store-roundtrip");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let store = store_in(&dir);

        let session = SessionData::new(
            "abc.def.ghi".to_string(),
            true,
            Some("jane.doe".to_string()),
        );
        store.write(session).await.unwrap();

        let read = store.read().await.unwrap().unwrap();
        assert_eq!("abc.def.ghi", read.token);
        assert!(read.is_admin);
        assert!(!read.welcome_shown);

        store.clear().await.unwrap();
        assert!(store.read().await.unwrap().is_none());

        // clearing twice is a no-op
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn mark_welcome_shown_persists_across_reads() {
        let dir = std::env::temp_dir().join("product-admin-store-welcome");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let store = store_in(&dir);

        store
            .write(SessionData::new("abc.def.ghi".to_string(), false, None))
            .await
            .unwrap();

        store.mark_welcome_shown().await.unwrap();
        assert!(store.read().await.unwrap().unwrap().welcome_shown);

        store.mark_welcome_shown().await.unwrap();
        assert!(store.read().await.unwrap().unwrap().welcome_shown);

        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn remembered_credentials_are_independent_of_the_session() {
        let dir = std::env::temp_dir().join("product-admin-store-remember");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let store = store_in(&dir);

        store
            .write_remembered(RememberedCredentials {
                username: "jane.doe".to_string(),
                password: "jane".to_string(),
            })
            .await
            .unwrap();

        store.clear().await.unwrap();

        let remembered = store.read_remembered().await.unwrap().unwrap();
        assert_eq!("jane.doe", remembered.username);
        assert_eq!("jane", remembered.password);

        store.clear_remembered().await.unwrap();
        assert!(store.read_remembered().await.unwrap().is_none());
    }

    #[test]
    fn session_document_uses_the_fixed_storage_keys() {
        let session = SessionData::new(
            "abc.def.ghi".to_string(),
            true,
            Some("jane.doe".to_string()),
        );

        let json = serde_json::to_value(&session).unwrap();

        assert_eq!("abc.def.ghi", json["token"]);
        assert_eq!(true, json["isAdmin"]);
        assert_eq!("jane.doe", json["username"]);
        assert_eq!(false, json["messageShown"]);
    }

    #[test]
    fn role_defaults_to_non_admin_when_absent() {
        let session =
            serde_json::from_str::<SessionData>(r#"{ "token": "abc.def.ghi" }"#).unwrap();

        assert!(!session.is_admin);
        assert!(!session.welcome_shown);
    }
}
