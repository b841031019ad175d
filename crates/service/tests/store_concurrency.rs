use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use service::errors::ServiceError;
use service::storage::Database;

fn tmp_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("chirpy_{tag}_{}.json", uuid::Uuid::new_v4()))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_never_share_an_id() -> anyhow::Result<()> {
    let tmp = tmp_path("concurrent");
    let db = Database::open(&tmp).await?;

    let mut handles = Vec::new();
    for i in 0..32 {
        let db = Arc::clone(&db);
        handles.push(tokio::spawn(async move { db.create_post(&format!("chirp {i}")).await }));
    }
    let mut ids = BTreeSet::new();
    for h in handles {
        let post = h.await??;
        assert!(post.id > 0);
        assert!(ids.insert(post.id), "duplicate id {}", post.id);
    }
    assert_eq!(ids, (1..=32).collect::<BTreeSet<u64>>());

    // no write was lost
    let posts = db.get_posts().await?;
    assert_eq!(posts.len(), 32);
    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_see_whole_cycles_only() -> anyhow::Result<()> {
    let tmp = tmp_path("readers");
    let db = Database::open(&tmp).await?;

    let writer = {
        let db = Arc::clone(&db);
        tokio::spawn(async move {
            for i in 0..20 {
                db.create_post(&format!("w{i}")).await?;
                db.create_user(&format!("u{i}@example.com")).await?;
            }
            Ok::<_, ServiceError>(())
        })
    };
    let reader = {
        let db = Arc::clone(&db);
        tokio::spawn(async move {
            for _ in 0..20 {
                let posts = db.get_posts().await?;
                // always a gap-free ascending prefix: never a torn file
                let ids: Vec<u64> = posts.iter().map(|p| p.id).collect();
                let expected: Vec<u64> = (1..=ids.len() as u64).collect();
                assert_eq!(ids, expected);
            }
            Ok::<_, ServiceError>(())
        })
    };
    writer.await??;
    reader.await??;
    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}

#[tokio::test]
async fn ids_are_positive_and_fresh() -> anyhow::Result<()> {
    let tmp = tmp_path("fresh");
    let db = Database::open(&tmp).await?;
    let mut seen = BTreeSet::new();
    for n in 0..10 {
        let body = "b".repeat(n * 14);
        let post = db.create_post(&body).await?;
        assert!(post.id > 0);
        assert!(seen.insert(post.id));
    }
    let posts = db.get_posts().await?;
    assert_eq!(posts.len(), 10);
    assert!(posts.windows(2).all(|w| w[0].id < w[1].id));
    assert!(matches!(db.get_post(11).await, Err(ServiceError::NotFound(_))));
    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}

#[tokio::test]
async fn store_survives_reopen() -> anyhow::Result<()> {
    let tmp = tmp_path("reopen");
    let (posts, user) = {
        let db = Database::open(&tmp).await?;
        let a = db.create_post("first").await?;
        let b = db.create_post("second").await?;
        let u = db.create_user("walt@breakingbad.com").await?;
        let u = db.update_user(u.id, "walt@breakingbad.com", "$argon2id$fake").await?;
        (vec![a, b], u)
    };

    let db = Database::open(&tmp).await?;
    assert_eq!(db.get_posts().await?, posts);
    assert_eq!(db.get_user(user.id).await?, user);
    assert_eq!(db.create_post("third").await?.id, 3);
    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}
