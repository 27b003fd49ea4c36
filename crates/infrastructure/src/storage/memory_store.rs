use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

use domain::DomainError;
use domain::storage::{FileEntry, FileStore, StoragePath, validate_name};

#[derive(Debug)]
enum Node {
    Folder(BTreeMap<String, Node>),
    File(Bytes),
}

impl Node {
    fn entry(&self, name: &str) -> FileEntry {
        match self {
            Node::Folder(_) => FileEntry::folder(name),
            Node::File(data) => FileEntry::file(name, data.len() as u64),
        }
    }
}

/// File tree held in memory
pub struct InMemoryFileStore {
    root: RwLock<Node>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Node::Folder(BTreeMap::new())),
        }
    }
}

impl Default for InMemoryFileStore {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve<'a>(root: &'a Node, path: &StoragePath) -> Result<&'a Node, DomainError> {
    let mut node = root;
    for segment in path.segments() {
        node = match node {
            Node::Folder(children) => children
                .get(segment)
                .ok_or_else(|| DomainError::not_found("Path", path))?,
            Node::File(_) => return Err(DomainError::not_found("Path", path)),
        };
    }
    Ok(node)
}

fn folder_mut<'a>(
    root: &'a mut Node,
    dir: &StoragePath,
) -> Result<&'a mut BTreeMap<String, Node>, DomainError> {
    let mut node = root;
    for segment in dir.segments() {
        node = match node {
            Node::Folder(children) => children
                .get_mut(segment)
                .ok_or_else(|| DomainError::not_found("Folder", dir))?,
            Node::File(_) => return Err(DomainError::not_found("Folder", dir)),
        };
    }
    match node {
        Node::Folder(children) => Ok(children),
        Node::File(_) => Err(DomainError::Validation(format!("{dir} is not a folder"))),
    }
}

fn ensure_free(children: &BTreeMap<String, Node>, dir: &StoragePath, name: &str) -> Result<(), DomainError> {
    if children.contains_key(name) {
        return Err(DomainError::Conflict(format!("{name} already exists in {dir}")));
    }
    Ok(())
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn list(&self, dir: &StoragePath) -> Result<Vec<FileEntry>, DomainError> {
        let root = self.root.read().await;
        let children = match resolve(&root, dir)? {
            Node::Folder(children) => children,
            Node::File(_) => return Err(DomainError::Validation(format!("{dir} is not a folder"))),
        };

        let mut entries: Vec<FileEntry> = children.iter().map(|(name, node)| node.entry(name)).collect();
        // BTreeMap already orders by name; the sort is stable
        entries.sort_by_key(|e| !e.is_directory);
        Ok(entries)
    }

    async fn create_folder(&self, dir: &StoragePath, name: &str) -> Result<FileEntry, DomainError> {
        validate_name(name)?;
        let mut root = self.root.write().await;
        let children = folder_mut(&mut root, dir)?;
        ensure_free(children, dir, name)?;

        children.insert(name.to_string(), Node::Folder(BTreeMap::new()));
        debug!(dir = %dir, name, "Folder stored");
        Ok(FileEntry::folder(name))
    }

    async fn put_file(
        &self,
        dir: &StoragePath,
        name: &str,
        data: Bytes,
    ) -> Result<FileEntry, DomainError> {
        validate_name(name)?;
        let mut root = self.root.write().await;
        let children = folder_mut(&mut root, dir)?;
        ensure_free(children, dir, name)?;

        let entry = FileEntry::file(name, data.len() as u64);
        children.insert(name.to_string(), Node::File(data));
        debug!(dir = %dir, name, size = entry.size, "File stored");
        Ok(entry)
    }

    async fn read(&self, path: &StoragePath) -> Result<Bytes, DomainError> {
        let root = self.root.read().await;
        match resolve(&root, path)? {
            Node::File(data) => Ok(data.clone()),
            Node::Folder(_) => Err(DomainError::Validation(format!("{path} is a folder"))),
        }
    }

    async fn delete(&self, dir: &StoragePath, name: &str) -> Result<FileEntry, DomainError> {
        let mut root = self.root.write().await;
        let children = folder_mut(&mut root, dir)?;

        let entry = match children.get(name) {
            None => return Err(DomainError::not_found("File", dir.join(name)?)),
            Some(Node::Folder(grandchildren)) if !grandchildren.is_empty() => {
                return Err(DomainError::Conflict(format!(
                    "Folder {} is not empty",
                    dir.join(name)?
                )));
            }
            Some(node) => node.entry(name),
        };

        children.remove(name);
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(raw: &str) -> StoragePath {
        StoragePath::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_lists_folders_first_then_by_name() {
        let store = InMemoryFileStore::new();
        let root = StoragePath::root();
        store.put_file(&root, "b.png", Bytes::from_static(b"png")).await.unwrap();
        store.create_folder(&root, "zeta").await.unwrap();
        store.put_file(&root, "a.mp4", Bytes::from_static(b"mp4!")).await.unwrap();
        store.create_folder(&root, "alpha").await.unwrap();

        let names: Vec<String> = store.list(&root).await.unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["alpha", "zeta", "a.mp4", "b.png"]);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() {
        let store = InMemoryFileStore::new();
        let root = StoragePath::root();
        store.create_folder(&root, "promo").await.unwrap();

        let err = store.put_file(&root, "promo", Bytes::new()).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        let err = store.create_folder(&root, "promo").await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_nested_read_and_missing_folder() {
        let store = InMemoryFileStore::new();
        store.create_folder(&StoragePath::root(), "folder1").await.unwrap();
        store
            .put_file(&path("/folder1"), "bg.jpg", Bytes::from_static(b"jpeg"))
            .await
            .unwrap();

        assert_eq!(store.read(&path("/folder1/bg.jpg")).await.unwrap(), Bytes::from_static(b"jpeg"));
        let err = store.list(&path("/missing")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        let err = store.put_file(&path("/folder1/bg.jpg"), "x.png", Bytes::new()).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_non_empty_folder_cannot_be_deleted() {
        let store = InMemoryFileStore::new();
        let root = StoragePath::root();
        store.create_folder(&root, "folder1").await.unwrap();
        store.put_file(&path("/folder1"), "a.png", Bytes::from_static(b"1")).await.unwrap();

        let err = store.delete(&root, "folder1").await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let removed = store.delete(&path("/folder1"), "a.png").await.unwrap();
        assert_eq!(removed.size, 1);
        assert!(store.delete(&root, "folder1").await.unwrap().is_directory);
        assert!(store.list(&root).await.unwrap().is_empty());
    }
}
