mod common;

use application::files::Upload;
use application::playlist::PlaylistRequest;
use common::harness;
use domain::DomainError;
use domain::playlist::ActivationScope;
use domain::storage::StoragePath;
use domain::template::TemplateDraft;

fn path(raw: &str) -> StoragePath {
    StoragePath::parse(raw).unwrap()
}

#[tokio::test]
async fn test_upload_registers_media_under_files_url() {
    let h = harness(ActivationScope::Overlapping);
    let root = StoragePath::root();
    h.files.create_folder(&root, "folder1").await.unwrap();

    let entries = h
        .files
        .upload(
            &path("/folder1"),
            vec![
                Upload::new("promo.png", b"png-bytes".to_vec()),
                Upload::new("notes.txt", b"hello".to_vec()),
            ],
        )
        .await
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert!(entries[0].media_id.is_some());
    assert!(entries[1].media_id.is_none(), "non-media files are stored but not registered");
    assert_eq!(entries[0].size, 9);

    let media = h.playlists.list_media().await.unwrap();
    assert_eq!(media.len(), 1);
    assert_eq!(media[0].path, "/files/folder1/promo.png");
    assert_eq!(media[0].name, "promo.png");
}

#[tokio::test]
async fn test_listing_annotates_media_ids() {
    let h = harness(ActivationScope::Overlapping);
    let ids = h.upload(&["b.jpg", "a.txt"]).await;
    h.files.create_folder(&StoragePath::root(), "z-folder").await.unwrap();

    let entries = h.files.list(&StoragePath::root()).await.unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["z-folder", "a.txt", "b.jpg"]);
    assert!(entries[0].is_directory);
    assert_eq!(entries[2].media_id.as_ref(), Some(&ids[0]));
    assert!(entries[1].media_id.is_none());
}

#[tokio::test]
async fn test_duplicate_names_are_rejected_before_writing() {
    let h = harness(ActivationScope::Overlapping);
    h.upload(&["a.png"]).await;

    let err = h
        .files
        .upload(
            &StoragePath::root(),
            vec![Upload::new("new.png", vec![1]), Upload::new("a.png", vec![2])],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    let err = h
        .files
        .upload(
            &StoragePath::root(),
            vec![Upload::new("twice.png", vec![1]), Upload::new("twice.png", vec![2])],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    // Nothing from the rejected batches was stored
    assert_eq!(h.files.list(&StoragePath::root()).await.unwrap().len(), 1);
    assert_eq!(h.playlists.list_media().await.unwrap().len(), 1);

    let err = h.files.create_folder(&StoragePath::root(), "a.png").await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
}

#[tokio::test]
async fn test_invalid_names_and_missing_folders() {
    let h = harness(ActivationScope::Overlapping);
    let root = StoragePath::root();

    for bad in ["", "..", ".", "a/b"] {
        let err = h.files.create_folder(&root, bad).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)), "{bad:?} accepted");
    }

    let err = h
        .files
        .upload(&path("/nowhere"), vec![Upload::new("a.png", vec![1])])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let err = h.files.upload(&root, vec![]).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_delete_refuses_referenced_media_and_full_folders() {
    let h = harness(ActivationScope::Overlapping);
    let root = StoragePath::root();
    let media = h.upload(&["used.png", "bg.jpg", "free.png"]).await;

    h.playlists
        .create(PlaylistRequest::new("Lobby", vec![media[0].clone()]))
        .await
        .unwrap();
    h.templates
        .create(TemplateDraft {
            name: "Hall".into(),
            background: Some("/files/bg.jpg".into()),
            footnote: None,
            show_clock: false,
            content_area: Default::default(),
        })
        .await
        .unwrap();

    let err = h.files.delete(&root, "used.png").await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    let err = h.files.delete(&root, "bg.jpg").await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    let removed = h.files.delete(&root, "free.png").await.unwrap();
    assert!(!removed.is_directory);
    assert_eq!(h.playlists.list_media().await.unwrap().len(), 2);

    h.files.create_folder(&root, "full").await.unwrap();
    h.files
        .upload(&path("/full"), vec![Upload::new("x.txt", vec![0])])
        .await
        .unwrap();
    let err = h.files.delete(&root, "full").await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    let err = h.files.delete(&root, "ghost.png").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_read_returns_payload_and_content_type() {
    let h = harness(ActivationScope::Overlapping);
    h.upload(&["clip.mp4"]).await;

    let (data, content_type) = h.files.read(&path("/clip.mp4")).await.unwrap();
    assert_eq!(&data[..], b"clip.mp4");
    assert_eq!(content_type, "video/mp4");

    let err = h.files.read(&path("/missing.png")).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}
