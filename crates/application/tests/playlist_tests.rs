mod common;

use application::playlist::PlaylistRequest;
use common::harness;
use domain::media::{MediaId, MediaType};
use domain::playlist::ActivationScope;
use domain::template::TemplateDraft;
use domain::tv::TvId;
use domain::{DomainError, DomainEvent};

#[tokio::test]
async fn test_create_validates_input() {
    let h = harness(ActivationScope::Overlapping);
    let media = h.upload(&["a.png"]).await;

    let err = h
        .playlists
        .create(PlaylistRequest::new("", media.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = h
        .playlists
        .create(PlaylistRequest::new("Lobby", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let mut too_long = PlaylistRequest::new("Lobby", media.clone());
    too_long.duration_secs = Some(61);
    let err = h.playlists.create(too_long).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = h
        .playlists
        .create(PlaylistRequest::new("Lobby", vec![MediaId::new("missing")]))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "Media", .. }));

    let err = h
        .playlists
        .create(PlaylistRequest::new("Lobby", media).with_tvs(vec![TvId::from_sequence(7)]))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "TV", .. }));

    assert!(h.playlists.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_new_playlist_is_inactive_with_defaults() {
    let h = harness(ActivationScope::Overlapping);
    let media = h.upload(&["a.png", "b.mp4"]).await;

    let playlist = h
        .playlists
        .create(PlaylistRequest::new("Lobby", media))
        .await
        .unwrap();

    assert_eq!(playlist.id().as_str(), "playlist1");
    assert!(!playlist.is_active());
    assert_eq!(playlist.duration_secs, 5);
    assert!(playlist.loop_playback);
    assert_eq!(playlist.files.len(), 2);
    assert_eq!(playlist.files[1].media_type, MediaType::Video);
    assert_eq!(playlist.revision(), 1);
}

#[tokio::test]
async fn test_activation_leaves_one_active_playlist_per_tv() {
    let h = harness(ActivationScope::Overlapping);
    let tvs = h.register_tvs(3).await;
    let media = h.upload(&["a.png"]).await;

    let p1 = h
        .playlists
        .create(PlaylistRequest::new("Morning", media.clone()).with_tvs(vec![tvs[0].clone(), tvs[1].clone()]))
        .await
        .unwrap();
    let p2 = h
        .playlists
        .create(PlaylistRequest::new("Cafeteria", media.clone()).with_tvs(vec![tvs[2].clone()]))
        .await
        .unwrap();
    let p3 = h
        .playlists
        .create(PlaylistRequest::new("Evening", media).with_tvs(vec![tvs[1].clone()]))
        .await
        .unwrap();

    h.playlists.activate(p1.id()).await.unwrap();
    h.playlists.activate(p2.id()).await.unwrap();
    let outcome = h.playlists.activate(p3.id()).await.unwrap();

    // p3 overlaps p1 on TV2 only; p2 is untouched
    assert_eq!(outcome.superseded, vec![p1.id().clone()]);
    assert!(!h.playlists.get(p1.id()).await.unwrap().is_active());
    assert!(h.playlists.get(p2.id()).await.unwrap().is_active());

    let assignments = h.playlists.assignments().await.unwrap();
    let playing: Vec<(String, String)> = assignments
        .iter()
        .map(|a| (a.tv_id.to_string(), a.playlist_id.to_string()))
        .collect();
    assert_eq!(
        playing,
        vec![
            ("TV2".to_string(), "playlist3".to_string()),
            ("TV3".to_string(), "playlist2".to_string()),
        ]
    );

    for tv in &tvs {
        let active_targeting = h
            .playlists
            .list()
            .await
            .unwrap()
            .into_iter()
            .filter(|p| p.is_active() && p.targets(tv))
            .count();
        assert!(active_targeting <= 1, "{tv} has {active_targeting} active playlists");
    }
}

#[tokio::test]
async fn test_global_scope_deactivates_everything_else() {
    let h = harness(ActivationScope::Global);
    let tvs = h.register_tvs(2).await;
    let media = h.upload(&["a.png"]).await;

    let p1 = h
        .playlists
        .create(PlaylistRequest::new("One", media.clone()).with_tvs(vec![tvs[0].clone()]))
        .await
        .unwrap();
    let p2 = h
        .playlists
        .create(PlaylistRequest::new("Two", media).with_tvs(vec![tvs[1].clone()]))
        .await
        .unwrap();

    h.playlists.activate(p1.id()).await.unwrap();
    let outcome = h.playlists.activate(p2.id()).await.unwrap();

    assert_eq!(outcome.superseded, vec![p1.id().clone()]);
    assert!(h.playlists.content_for(&tvs[0]).await.unwrap().is_empty());
    assert_eq!(h.playlists.content_for(&tvs[1]).await.unwrap().slides.len(), 1);
}

#[tokio::test]
async fn test_superseding_reports_tvs_left_without_playlist() {
    let h = harness(ActivationScope::Overlapping);
    let tvs = h.register_tvs(2).await;
    let media = h.upload(&["a.png"]).await;
    let p1 = h
        .playlists
        .create(PlaylistRequest::new("Both", media.clone()).with_tvs(tvs.clone()))
        .await
        .unwrap();
    let p2 = h
        .playlists
        .create(PlaylistRequest::new("First only", media).with_tvs(vec![tvs[0].clone()]))
        .await
        .unwrap();
    h.playlists.activate(p1.id()).await.unwrap();
    let mut rx = h.events.subscribe();

    h.playlists.activate(p2.id()).await.unwrap();

    let mut changes = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let DomainEvent::AssignmentChanged { tv_id, playlist_id, .. } = event {
            changes.push((tv_id, playlist_id));
        }
    }
    assert_eq!(
        changes,
        vec![
            (tvs[0].clone(), Some(p2.id().clone())),
            (tvs[1].clone(), None),
        ]
    );
    assert!(h.playlists.content_for(&tvs[1]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_activation_emits_events() {
    let h = harness(ActivationScope::Overlapping);
    let tvs = h.register_tvs(1).await;
    let media = h.upload(&["a.png"]).await;
    let p1 = h
        .playlists
        .create(PlaylistRequest::new("One", media).with_tvs(tvs.clone()))
        .await
        .unwrap();
    let mut rx = h.events.subscribe();

    h.playlists.activate(p1.id()).await.unwrap();

    let mut seen = Vec::new();
    while let Ok(event) = rx.try_recv() {
        seen.push(event);
    }
    assert!(seen.iter().any(|e| matches!(
        e,
        DomainEvent::AssignmentChanged { tv_id, playlist_id: Some(p), .. } if tv_id == &tvs[0] && p == p1.id()
    )));
    assert!(matches!(
        seen.last(),
        Some(DomainEvent::PlaylistActivated { tv_ids, superseded, .. }) if tv_ids == &tvs && superseded.is_empty()
    ));
}

#[tokio::test]
async fn test_deactivate_and_delete_clear_assignments() {
    let h = harness(ActivationScope::Overlapping);
    let tvs = h.register_tvs(2).await;
    let media = h.upload(&["a.png"]).await;
    let p1 = h
        .playlists
        .create(PlaylistRequest::new("One", media).with_tvs(tvs.clone()))
        .await
        .unwrap();

    h.playlists.activate(p1.id()).await.unwrap();
    assert_eq!(h.playlists.assignments().await.unwrap().len(), 2);

    let playlist = h.playlists.deactivate(p1.id()).await.unwrap();
    assert!(!playlist.is_active());
    assert!(h.playlists.assignments().await.unwrap().is_empty());
    // Targets survive deactivation
    assert_eq!(playlist.assigned_tvs().len(), 2);

    h.playlists.activate(p1.id()).await.unwrap();
    h.playlists.delete(p1.id()).await.unwrap();
    assert!(h.playlists.assignments().await.unwrap().is_empty());
    assert!(matches!(
        h.playlists.get(p1.id()).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert!(matches!(
        h.playlists.delete(p1.id()).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
}

#[tokio::test]
async fn test_update_bumps_revision_and_retargets_live_playlist() {
    let h = harness(ActivationScope::Overlapping);
    let tvs = h.register_tvs(2).await;
    let media = h.upload(&["a.png", "b.png"]).await;
    let p1 = h
        .playlists
        .create(PlaylistRequest::new("One", vec![media[0].clone()]).with_tvs(vec![tvs[0].clone()]))
        .await
        .unwrap();
    h.playlists.activate(p1.id()).await.unwrap();

    let edited = PlaylistRequest::new("One v2", media.clone()).with_tvs(vec![tvs[1].clone()]);
    let updated = h.playlists.update(p1.id(), edited).await.unwrap();

    assert_eq!(updated.revision(), 2);
    assert!(updated.is_active());
    assert!(h.playlists.content_for(&tvs[0]).await.unwrap().is_empty());
    let content = h.playlists.content_for(&tvs[1]).await.unwrap();
    assert_eq!(content.revision, 2);
    assert_eq!(content.slides.len(), 2);
    assert_eq!(content.playlist_name.as_deref(), Some("One v2"));
}

#[tokio::test]
async fn test_assign_moves_tv_between_playlists() {
    let h = harness(ActivationScope::Overlapping);
    let tvs = h.register_tvs(1).await;
    let media = h.upload(&["a.png"]).await;
    let p1 = h
        .playlists
        .create(PlaylistRequest::new("One", media.clone()).with_tvs(tvs.clone()))
        .await
        .unwrap();
    let p2 = h
        .playlists
        .create(PlaylistRequest::new("Two", media))
        .await
        .unwrap();
    h.playlists.activate(p1.id()).await.unwrap();
    h.playlists.activate(p2.id()).await.unwrap();

    let playlist = h.playlists.assign(&tvs[0], p2.id()).await.unwrap();
    assert!(playlist.targets(&tvs[0]));
    assert!(!h.playlists.get(p1.id()).await.unwrap().targets(&tvs[0]));
    assert_eq!(
        h.playlists.content_for(&tvs[0]).await.unwrap().playlist_id.as_ref(),
        Some(p2.id())
    );

    assert!(h.playlists.unassign(&tvs[0]).await.unwrap());
    assert!(!h.playlists.unassign(&tvs[0]).await.unwrap());
    assert!(h.playlists.content_for(&tvs[0]).await.unwrap().is_empty());
    assert!(!h.playlists.get(p2.id()).await.unwrap().targets(&tvs[0]));
}

#[tokio::test]
async fn test_assign_to_inactive_playlist_only_targets() {
    let h = harness(ActivationScope::Overlapping);
    let tvs = h.register_tvs(1).await;
    let media = h.upload(&["a.png"]).await;
    let p1 = h
        .playlists
        .create(PlaylistRequest::new("One", media))
        .await
        .unwrap();

    h.playlists.assign(&tvs[0], p1.id()).await.unwrap();
    assert!(h.playlists.assignments().await.unwrap().is_empty());

    h.playlists.activate(p1.id()).await.unwrap();
    assert_eq!(h.playlists.assignments().await.unwrap()[0].tv_id, tvs[0]);
}

#[tokio::test]
async fn test_content_includes_slides_and_template() {
    let h = harness(ActivationScope::Overlapping);
    let tvs = h.register_tvs(1).await;
    let media = h.upload(&["bg.jpg", "clip.mp4"]).await;
    let template = h
        .templates
        .create(TemplateDraft {
            name: "Lobby".into(),
            background: Some("/files/bg.jpg".into()),
            footnote: None,
            show_clock: true,
            content_area: Default::default(),
        })
        .await
        .unwrap();

    let mut request = PlaylistRequest::new("Lobby", media).with_tvs(tvs.clone());
    request.duration_secs = Some(8);
    request.loop_playback = Some(false);
    request.template_id = Some(template.id.clone());
    let p1 = h.playlists.create(request).await.unwrap();
    h.playlists.activate(p1.id()).await.unwrap();

    let content = h.playlists.content_for(&tvs[0]).await.unwrap();
    assert_eq!(content.tv_id, tvs[0]);
    assert_eq!(content.duration_secs, 8);
    assert!(!content.loop_playback);
    let urls: Vec<&str> = content.slides.iter().map(|s| s.url.as_str()).collect();
    assert_eq!(urls, vec!["/files/bg.jpg", "/files/clip.mp4"]);
    assert_eq!(content.slides[1].media_type, MediaType::Video);
    assert_eq!(content.template.unwrap().id, template.id);
}

#[tokio::test]
async fn test_content_for_unknown_or_unassigned_tv() {
    let h = harness(ActivationScope::Overlapping);
    let tvs = h.register_tvs(1).await;

    let content = h.playlists.content_for(&tvs[0]).await.unwrap();
    assert!(content.is_empty());
    assert!(content.playlist_id.is_none());

    let err = h
        .playlists
        .content_for(&TvId::from_sequence(99))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_playlist_ids_are_never_reused() {
    let h = harness(ActivationScope::Overlapping);
    let media = h.upload(&["a.png"]).await;

    let p1 = h.playlists.create(PlaylistRequest::new("One", media.clone())).await.unwrap();
    h.playlists.create(PlaylistRequest::new("Two", media.clone())).await.unwrap();
    h.playlists.delete(p1.id()).await.unwrap();
    let p3 = h.playlists.create(PlaylistRequest::new("Three", media)).await.unwrap();

    assert_eq!(p3.id().as_str(), "playlist3");
    let names: Vec<String> = h.playlists.list().await.unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["Two", "Three"]);
}
