mod helpers;

use std::collections::HashSet;

use chrono::{Duration, Utc};
use helpers::{image_fixture, setup_test_db, video_fixture};
use lumina_core::models::{
    AssetBulkUpdate, AssetRelations, AssetSearchOptions, AssetStatsOptions, AssetType, AssetUpdate,
    ExifUpsert, LivePhotoSearchOptions, MapMarkerSearchOptions, PaginationOptions, SortOrder,
    WithProperty, WithoutProperty,
};
use lumina_core::CatalogError;
use lumina_db::{AssetRepository, ExifRepository};
use uuid::Uuid;

#[tokio::test]
async fn create_and_get_by_id() {
    let db = setup_test_db().await;
    let repo = AssetRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();

    let created = repo.create(image_fixture(owner, 1)).await.unwrap();
    assert_eq!(created.owner_id, owner);
    assert_eq!(created.asset_type, AssetType::Image);
    assert!(!created.is_trashed());

    let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.checksum, created.checksum);

    assert!(repo.get_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_checksum_is_a_conflict() {
    let db = setup_test_db().await;
    let repo = AssetRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();

    let first = repo.create(image_fixture(owner, 1)).await.unwrap();

    // Same content, different device identity.
    let mut dup = image_fixture(owner, 2);
    dup.checksum = first.checksum.clone();
    let err = repo.create(dup.clone()).await.unwrap_err();
    assert!(matches!(err, CatalogError::Conflict(_)));

    // The caller recovers the winner by checksum.
    let winner = repo
        .get_by_checksum(owner, &first.checksum)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(winner.id, first.id);

    // A different owner may hold identical content.
    let mut other_owner_dup = image_fixture(Uuid::new_v4(), 1);
    other_owner_dup.checksum = first.checksum.clone();
    repo.create(other_owner_dup).await.unwrap();

    // Trashing the original frees the slot for re-import.
    repo.soft_delete_all(&[first.id]).await.unwrap();
    repo.create(dup).await.unwrap();
}

#[tokio::test]
async fn duplicate_device_identity_is_a_conflict() {
    let db = setup_test_db().await;
    let repo = AssetRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();

    repo.create(image_fixture(owner, 1)).await.unwrap();

    // Same (device_id, device_asset_id, owner) with new content.
    let mut retry = image_fixture(owner, 1);
    retry.checksum = b"different-content".to_vec();
    let err = repo.create(retry).await.unwrap_err();
    assert!(matches!(err, CatalogError::Conflict(_)));
}

#[tokio::test]
async fn save_applies_partial_patch() {
    let db = setup_test_db().await;
    let repo = AssetRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();

    let mut dto = image_fixture(owner, 1);
    dto.sidecar_path = Some("/upload/photos/1.xmp".to_string());
    let asset = repo.create(dto).await.unwrap();

    // Set one field; everything else is untouched.
    let mut patch = AssetUpdate::new(asset.id);
    patch.is_favorite = Some(true);
    let saved = repo.save(patch).await.unwrap();
    assert!(saved.is_favorite);
    assert_eq!(saved.sidecar_path.as_deref(), Some("/upload/photos/1.xmp"));
    assert!(saved.updated_at >= asset.updated_at);

    // Explicit Some(None) clears a nullable field; None leaves it alone.
    let mut patch = AssetUpdate::new(asset.id);
    patch.sidecar_path = Some(None);
    patch.preview_path = Some(Some("/previews/1.webp".to_string()));
    let saved = repo.save(patch).await.unwrap();
    assert!(saved.sidecar_path.is_none());
    assert_eq!(saved.preview_path.as_deref(), Some("/previews/1.webp"));
    assert!(saved.is_favorite);

    let err = repo.save(AssetUpdate::new(Uuid::new_v4())).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn update_all_sets_fields_in_bulk() {
    let db = setup_test_db().await;
    let repo = AssetRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();

    let a = repo.create(image_fixture(owner, 1)).await.unwrap();
    let b = repo.create(image_fixture(owner, 2)).await.unwrap();
    let c = repo.create(image_fixture(owner, 3)).await.unwrap();

    let fields = AssetBulkUpdate {
        is_archived: Some(true),
        ..Default::default()
    };
    repo.update_all(&[a.id, b.id], fields).await.unwrap();

    assert!(repo.get_by_id(a.id).await.unwrap().unwrap().is_archived);
    assert!(repo.get_by_id(b.id).await.unwrap().unwrap().is_archived);
    assert!(!repo.get_by_id(c.id).await.unwrap().unwrap().is_archived);
}

#[tokio::test]
async fn trash_lifecycle_is_reversible_and_idempotent() {
    let db = setup_test_db().await;
    let repo = AssetRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();

    let asset = repo.create(image_fixture(owner, 1)).await.unwrap();

    repo.soft_delete_all(&[asset.id]).await.unwrap();
    let trashed = repo.get_by_id(asset.id).await.unwrap().unwrap();
    assert!(trashed.is_trashed());

    // Trashing again keeps the original trash timestamp.
    repo.soft_delete_all(&[asset.id]).await.unwrap();
    let again = repo.get_by_id(asset.id).await.unwrap().unwrap();
    assert_eq!(again.deleted_at, trashed.deleted_at);

    // Trashed assets drop out of default listings.
    let page = repo
        .get_by_user_id(
            PaginationOptions::first(10),
            owner,
            &AssetSearchOptions::default(),
        )
        .await
        .unwrap();
    assert!(page.items.is_empty());

    // But reappear with the opt-in.
    let page = repo
        .get_by_user_id(
            PaginationOptions::first(10),
            owner,
            &AssetSearchOptions {
                with_deleted: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);

    repo.restore_all(&[asset.id]).await.unwrap();
    let restored = repo.get_by_id(asset.id).await.unwrap().unwrap();
    assert!(!restored.is_trashed());
    // Restoring an active asset is a no-op.
    repo.restore_all(&[asset.id]).await.unwrap();
}

#[tokio::test]
async fn trashed_before_finds_expired_trash_only() {
    let db = setup_test_db().await;
    let repo = AssetRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();

    let trashed = repo.create(image_fixture(owner, 1)).await.unwrap();
    let active = repo.create(image_fixture(owner, 2)).await.unwrap();
    repo.soft_delete_all(&[trashed.id]).await.unwrap();

    let expired = repo
        .get_by_user_id(
            PaginationOptions::first(10),
            owner,
            &AssetSearchOptions {
                trashed_before: Some(Utc::now() + Duration::days(1)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(expired.items.len(), 1);
    assert_eq!(expired.items[0].id, trashed.id);

    // A cutoff in the past matches nothing yet.
    let expired = repo
        .get_by_user_id(
            PaginationOptions::first(10),
            owner,
            &AssetSearchOptions {
                trashed_before: Some(Utc::now() - Duration::days(30)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(expired.items.is_empty());
    let _ = active;
}

#[tokio::test]
async fn remove_hard_deletes() {
    let db = setup_test_db().await;
    let repo = AssetRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();

    let asset = repo.create(image_fixture(owner, 1)).await.unwrap();
    repo.remove(asset.id).await.unwrap();
    assert!(repo.get_by_id(asset.id).await.unwrap().is_none());

    let err = repo.remove(asset.id).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn delete_all_clears_an_owner() {
    let db = setup_test_db().await;
    let repo = AssetRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();

    for n in 1..=3 {
        repo.create(image_fixture(owner, n)).await.unwrap();
    }
    let kept = repo.create(image_fixture(other, 1)).await.unwrap();

    let deleted = repo.delete_all(owner).await.unwrap();
    assert_eq!(deleted, 3);
    assert!(repo.get_by_id(kept.id).await.unwrap().is_some());
}

#[tokio::test]
async fn pagination_sweeps_without_gaps_or_duplicates() {
    let db = setup_test_db().await;
    let repo = AssetRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();

    let mut all_ids = HashSet::new();
    for n in 1..=25 {
        let asset = repo.create(image_fixture(owner, n)).await.unwrap();
        all_ids.insert(asset.id);
    }

    let options = AssetSearchOptions::default();
    let mut seen = HashSet::new();
    let mut pagination = PaginationOptions::first(10);
    let mut pages = 0;
    loop {
        let page = repo
            .get_by_user_id(pagination, owner, &options)
            .await
            .unwrap();
        pages += 1;
        for asset in &page.items {
            assert!(seen.insert(asset.id), "duplicate asset in sweep");
        }
        match page.next {
            Some(cursor) => pagination = PaginationOptions::after(10, cursor),
            None => break,
        }
    }

    assert_eq!(pages, 3);
    assert_eq!(seen, all_ids);
}

#[tokio::test]
async fn listing_honors_sort_order_and_type_filter() {
    let db = setup_test_db().await;
    let repo = AssetRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();

    for n in 1..=3 {
        repo.create(image_fixture(owner, n)).await.unwrap();
    }
    let video = repo.create(video_fixture(owner, 10)).await.unwrap();

    let page = repo
        .get_by_user_id(
            PaginationOptions::first(10),
            owner,
            &AssetSearchOptions {
                asset_type: Some(AssetType::Video),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, video.id);

    let desc = repo
        .get_by_user_id(
            PaginationOptions::first(10),
            owner,
            &AssetSearchOptions {
                order: SortOrder::Desc,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let asc = repo
        .get_by_user_id(
            PaginationOptions::first(10),
            owner,
            &AssetSearchOptions::default(),
        )
        .await
        .unwrap();
    let mut reversed: Vec<_> = desc.items.iter().map(|a| a.id).collect();
    reversed.reverse();
    let forward: Vec<_> = asc.items.iter().map(|a| a.id).collect();
    assert_eq!(forward, reversed);
}

#[tokio::test]
async fn get_by_ids_loads_requested_relations() {
    let db = setup_test_db().await;
    let assets = AssetRepository::new(db.pool.clone());
    let exif = ExifRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();

    let a = assets.create(image_fixture(owner, 1)).await.unwrap();
    let b = assets.create(image_fixture(owner, 2)).await.unwrap();

    let mut dto = ExifUpsert::new(a.id);
    dto.camera_make = Some("Canon".to_string());
    exif.upsert(dto).await.unwrap();

    let details = assets
        .get_by_ids(
            &[a.id, b.id],
            AssetRelations {
                exif: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(details.len(), 2);

    let detail_a = details.iter().find(|d| d.asset.id == a.id).unwrap();
    assert_eq!(
        detail_a.exif.as_ref().unwrap().camera_make.as_deref(),
        Some("Canon")
    );
    let detail_b = details.iter().find(|d| d.asset.id == b.id).unwrap();
    assert!(detail_b.exif.is_none());

    // Without the flag, no side data is loaded.
    let bare = assets
        .get_by_ids(&[a.id], AssetRelations::default())
        .await
        .unwrap();
    assert!(bare[0].exif.is_none());
}

#[tokio::test]
async fn get_without_returns_backlog_oldest_first() {
    let db = setup_test_db().await;
    let repo = AssetRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();

    let first = repo.create(image_fixture(owner, 1)).await.unwrap();
    let second = repo.create(image_fixture(owner, 2)).await.unwrap();
    let third = repo.create(image_fixture(owner, 3)).await.unwrap();

    // One already has a preview; one is trashed.
    let mut patch = AssetUpdate::new(second.id);
    patch.preview_path = Some(Some("/previews/2.webp".to_string()));
    repo.save(patch).await.unwrap();
    repo.soft_delete_all(&[third.id]).await.unwrap();

    let backlog = repo
        .get_without(PaginationOptions::first(10), WithoutProperty::Thumbnail)
        .await
        .unwrap();
    assert_eq!(backlog.items.len(), 1);
    assert_eq!(backlog.items[0].id, first.id);

    // Completing the work item drains the backlog.
    let mut patch = AssetUpdate::new(first.id);
    patch.preview_path = Some(Some("/previews/1.webp".to_string()));
    repo.save(patch).await.unwrap();
    let backlog = repo
        .get_without(PaginationOptions::first(10), WithoutProperty::Thumbnail)
        .await
        .unwrap();
    assert!(backlog.items.is_empty());

    // Encoded-video backlog only ever contains videos.
    let video = repo.create(video_fixture(owner, 10)).await.unwrap();
    let encode_backlog = repo
        .get_without(PaginationOptions::first(10), WithoutProperty::EncodedVideo)
        .await
        .unwrap();
    let ids: Vec<_> = encode_backlog.items.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![video.id]);
}

#[tokio::test]
async fn get_without_exif_uses_side_table_presence() {
    let db = setup_test_db().await;
    let assets = AssetRepository::new(db.pool.clone());
    let exif = ExifRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();

    let a = assets.create(image_fixture(owner, 1)).await.unwrap();
    let b = assets.create(image_fixture(owner, 2)).await.unwrap();
    exif.upsert(ExifUpsert::new(a.id)).await.unwrap();

    let backlog = assets
        .get_without(PaginationOptions::first(10), WithoutProperty::Exif)
        .await
        .unwrap();
    let ids: Vec<_> = backlog.items.iter().map(|x| x.id).collect();
    assert_eq!(ids, vec![b.id]);
}

#[tokio::test]
async fn get_with_scopes_by_library() {
    let db = setup_test_db().await;
    let repo = AssetRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();
    let library = Uuid::new_v4();

    let mut in_library = image_fixture(owner, 1);
    in_library.library_id = Some(library);
    in_library.sidecar_path = Some("/upload/photos/1.xmp".to_string());
    let in_library = repo.create(in_library).await.unwrap();

    let mut elsewhere = image_fixture(owner, 2);
    elsewhere.sidecar_path = Some("/upload/photos/2.xmp".to_string());
    repo.create(elsewhere).await.unwrap();

    let scoped = repo
        .get_with(
            PaginationOptions::first(10),
            WithProperty::Sidecar,
            Some(library),
        )
        .await
        .unwrap();
    let ids: Vec<_> = scoped.items.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![in_library.id]);

    let unscoped = repo
        .get_with(PaginationOptions::first(10), WithProperty::Sidecar, None)
        .await
        .unwrap();
    assert_eq!(unscoped.items.len(), 2);
}

#[tokio::test]
async fn live_photo_match_is_symmetric() {
    let db = setup_test_db().await;
    let assets = AssetRepository::new(db.pool.clone());
    let exif = ExifRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();

    let still = assets.create(image_fixture(owner, 1)).await.unwrap();
    let motion = assets.create(video_fixture(owner, 2)).await.unwrap();
    for id in [still.id, motion.id] {
        let mut dto = ExifUpsert::new(id);
        dto.live_photo_cid = Some("CID-1234".to_string());
        exif.upsert(dto).await.unwrap();
    }

    let found = assets
        .find_live_photo_match(&LivePhotoSearchOptions {
            owner_id: owner,
            live_photo_cid: "CID-1234".to_string(),
            other_asset_id: still.id,
            asset_type: AssetType::Video,
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, motion.id);

    let found = assets
        .find_live_photo_match(&LivePhotoSearchOptions {
            owner_id: owner,
            live_photo_cid: "CID-1234".to_string(),
            other_asset_id: motion.id,
            asset_type: AssetType::Image,
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, still.id);

    // No match across owners or unknown ids.
    let missing = assets
        .find_live_photo_match(&LivePhotoSearchOptions {
            owner_id: Uuid::new_v4(),
            live_photo_cid: "CID-1234".to_string(),
            other_asset_id: still.id,
            asset_type: AssetType::Video,
        })
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn statistics_count_per_type_with_filters() {
    let db = setup_test_db().await;
    let repo = AssetRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();

    let mut fav = image_fixture(owner, 1);
    fav.is_favorite = true;
    repo.create(fav).await.unwrap();
    repo.create(image_fixture(owner, 2)).await.unwrap();
    let video = repo.create(video_fixture(owner, 3)).await.unwrap();
    let trashed = repo.create(image_fixture(owner, 4)).await.unwrap();
    repo.soft_delete_all(&[trashed.id]).await.unwrap();

    let stats = repo
        .get_statistics(owner, AssetStatsOptions::default())
        .await
        .unwrap();
    assert_eq!(stats.images, 2);
    assert_eq!(stats.videos, 1);
    assert_eq!(stats.total(), 3);

    let favorites = repo
        .get_statistics(
            owner,
            AssetStatsOptions {
                is_favorite: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(favorites.images, 1);
    assert_eq!(favorites.videos, 0);

    let in_trash = repo
        .get_statistics(
            owner,
            AssetStatsOptions {
                is_trashed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(in_trash.total(), 1);
    let _ = video;
}

#[tokio::test]
async fn map_markers_require_gps_coordinates() {
    let db = setup_test_db().await;
    let assets = AssetRepository::new(db.pool.clone());
    let exif = ExifRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();

    let tagged = assets.create(image_fixture(owner, 1)).await.unwrap();
    let untagged = assets.create(image_fixture(owner, 2)).await.unwrap();

    let mut dto = ExifUpsert::new(tagged.id);
    dto.latitude = Some(59.33);
    dto.longitude = Some(18.07);
    exif.upsert(dto).await.unwrap();
    // EXIF without coordinates does not produce a marker.
    exif.upsert(ExifUpsert::new(untagged.id)).await.unwrap();

    let markers = assets
        .get_map_markers(owner, MapMarkerSearchOptions::default())
        .await
        .unwrap();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].id, tagged.id);
    assert!((markers[0].lat - 59.33).abs() < 1e-9);
    assert!((markers[0].lon - 18.07).abs() < 1e-9);
}

#[tokio::test]
async fn library_lookups_match_by_path() {
    let db = setup_test_db().await;
    let repo = AssetRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();
    let library = Uuid::new_v4();

    let mut dto = image_fixture(owner, 1);
    dto.library_id = Some(library);
    let asset = repo.create(dto).await.unwrap();

    let found = repo
        .get_by_library_id_and_original_path(library, "/upload/photos/1.jpg")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, asset.id);

    assert!(repo
        .get_by_library_id_and_original_path(library, "/upload/photos/missing.jpg")
        .await
        .unwrap()
        .is_none());

    let in_libraries = repo.get_by_library_ids(&[library]).await.unwrap();
    assert_eq!(in_libraries.len(), 1);
}

#[tokio::test]
async fn get_random_samples_visible_assets() {
    let db = setup_test_db().await;
    let repo = AssetRepository::new(db.pool.clone());
    let owner = Uuid::new_v4();

    for n in 1..=5 {
        repo.create(image_fixture(owner, n)).await.unwrap();
    }
    let trashed = repo.create(image_fixture(owner, 6)).await.unwrap();
    repo.soft_delete_all(&[trashed.id]).await.unwrap();

    let sample = repo.get_random(owner, 3).await.unwrap();
    assert_eq!(sample.len(), 3);
    assert!(sample.iter().all(|a| !a.is_trashed()));
}
