use sqlx::SqlitePool;

use crate::{
    auth,
    error::AppError,
    models::{ArticleRow, ArticleUpdate, ArticleView, NewArticle, Profile},
    pagination::{ArticleFilter, Page},
    slug, store,
};

/// Assemble the viewer-scoped view of one article: author profile, ordered
/// tag list, favorite count, and the viewer's own favorite/follow state.
///
/// A missing author row is a referential-integrity fault; it still surfaces
/// as `NotFound` rather than leaking storage detail.
pub async fn compose(
    pool: &SqlitePool,
    article: &ArticleRow,
    viewer: Option<i64>,
) -> Result<ArticleView, AppError> {
    let author = store::users::by_id(pool, article.author_id)
        .await?
        .ok_or(AppError::NotFound("article author"))?;

    let tag_list = store::tags::for_article(pool, article.id).await?;
    let favorites_count = store::social::favorites_count(pool, article.id).await?;

    let (favorited, following) = match viewer {
        Some(viewer) => (
            store::social::is_favorited(pool, viewer, article.id).await?,
            store::social::is_following(pool, viewer, author.id).await?,
        ),
        None => (false, false),
    };

    Ok(ArticleView {
        slug: article.slug.clone(),
        title: article.title.clone(),
        description: article.description.clone(),
        body: article.body.clone(),
        tag_list,
        created_at: article.created_at,
        updated_at: article.updated_at,
        favorited,
        favorites_count,
        author: Profile {
            username: author.username,
            bio: author.bio,
            image: author.image,
            following,
        },
    })
}

/// Compose every row in input order; the first failure aborts the batch so
/// a listing is either fully consistent or an error, never partial.
pub async fn compose_all(
    pool: &SqlitePool,
    articles: &[ArticleRow],
    viewer: Option<i64>,
) -> Result<Vec<ArticleView>, AppError> {
    let mut views = Vec::with_capacity(articles.len());

    for article in articles {
        views.push(compose(pool, article, viewer).await?);
    }

    Ok(views)
}

fn required(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

pub async fn create(
    pool: &SqlitePool,
    author_id: i64,
    new: NewArticle,
) -> Result<ArticleView, AppError> {
    required(&new.title, "title is required")?;
    required(&new.description, "description is required")?;
    required(&new.body, "body is required")?;

    let slug = slug::unique(pool, &new.title).await?;

    let article = store::articles::insert(
        pool,
        &slug,
        &new.title,
        &new.description,
        &new.body,
        author_id,
    )
    .await?;

    if let Some(tags) = &new.tag_list {
        store::tags::replace_for_article(pool, article.id, tags).await?;
    }

    compose(pool, &article, Some(author_id)).await
}

pub async fn get(
    pool: &SqlitePool,
    slug: &str,
    viewer: Option<i64>,
) -> Result<ArticleView, AppError> {
    let article = store::articles::by_slug(pool, slug)
        .await?
        .ok_or(AppError::NotFound("article"))?;

    compose(pool, &article, viewer).await
}

/// Partial update by the author. A changed title regenerates the slug; the
/// old slug is gone for good, no alias is kept.
pub async fn update(
    pool: &SqlitePool,
    slug: &str,
    requester_id: i64,
    update: ArticleUpdate,
) -> Result<ArticleView, AppError> {
    let mut article = store::articles::by_slug(pool, slug)
        .await?
        .ok_or(AppError::NotFound("article"))?;

    if !auth::is_owner(article.author_id, requester_id) {
        return Err(AppError::Forbidden);
    }

    let mut changed = false;

    if let Some(title) = update.title {
        required(&title, "title is required")?;
        // Only an actual title change invalidates the slug.
        if title != article.title {
            article.slug = slug::unique(pool, &title).await?;
        }
        article.title = title;
        changed = true;
    }
    if let Some(description) = update.description {
        article.description = description;
        changed = true;
    }
    if let Some(body) = update.body {
        article.body = body;
        changed = true;
    }

    if changed {
        store::articles::update(pool, &article).await?;
    }

    if let Some(tags) = &update.tag_list {
        store::tags::replace_for_article(pool, article.id, tags).await?;
    }

    compose(pool, &article, Some(requester_id)).await
}

pub async fn delete(pool: &SqlitePool, slug: &str, requester_id: i64) -> Result<(), AppError> {
    let article = store::articles::by_slug(pool, slug)
        .await?
        .ok_or(AppError::NotFound("article"))?;

    if !auth::is_owner(article.author_id, requester_id) {
        return Err(AppError::Forbidden);
    }

    store::articles::delete(pool, article.id).await
}

pub async fn list(
    pool: &SqlitePool,
    filter: &ArticleFilter,
    page: Page,
    viewer: Option<i64>,
) -> Result<(Vec<ArticleView>, i64), AppError> {
    let (articles, total) = store::articles::list(pool, filter, page).await?;

    Ok((compose_all(pool, &articles, viewer).await?, total))
}

pub async fn feed(
    pool: &SqlitePool,
    viewer: i64,
    page: Page,
) -> Result<(Vec<ArticleView>, i64), AppError> {
    let (articles, total) = store::articles::feed(pool, viewer, page).await?;

    Ok((compose_all(pool, &articles, Some(viewer)).await?, total))
}

/// Idempotent: favoriting twice is a silent no-op.
pub async fn favorite(
    pool: &SqlitePool,
    slug: &str,
    user_id: i64,
) -> Result<ArticleView, AppError> {
    let article = store::articles::by_slug(pool, slug)
        .await?
        .ok_or(AppError::NotFound("article"))?;

    store::social::favorite(pool, user_id, article.id).await?;

    compose(pool, &article, Some(user_id)).await
}

/// Not symmetric with [`favorite`]: removing a favorite that does not
/// exist is an error.
pub async fn unfavorite(
    pool: &SqlitePool,
    slug: &str,
    user_id: i64,
) -> Result<ArticleView, AppError> {
    let article = store::articles::by_slug(pool, slug)
        .await?
        .ok_or(AppError::NotFound("article"))?;

    if !store::social::unfavorite(pool, user_id, article.id).await? {
        return Err(AppError::NotFound("favorite"));
    }

    compose(pool, &article, Some(user_id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{service, testutil};

    fn new_article(title: &str, tags: Option<Vec<&str>>) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            description: "a description".to_string(),
            body: "a body".to_string(),
            tag_list: tags.map(|t| t.into_iter().map(str::to_string).collect()),
        }
    }

    #[tokio::test]
    async fn create_composes_fresh_view() {
        let pool = testutil::pool().await;
        let alice = testutil::user(&pool, "alice").await;

        let view = create(&pool, alice.id, new_article("Hello World", Some(vec!["Rust", "web"])))
            .await
            .unwrap();

        assert!(view.slug.starts_with("hello-world"));
        assert_eq!(view.favorites_count, 0);
        assert!(!view.favorited);
        assert_eq!(view.author.username, "alice");
        // normalized and lexicographically ordered
        assert_eq!(view.tag_list, vec!["rust", "web"]);
    }

    #[tokio::test]
    async fn blank_fields_rejected() {
        let pool = testutil::pool().await;
        let alice = testutil::user(&pool, "alice").await;

        assert!(matches!(
            create(&pool, alice.id, new_article("   ", None)).await.unwrap_err(),
            AppError::Validation(_)
        ));

        let mut blank_body = new_article("Fine Title", None);
        blank_body.body = "".to_string();
        assert!(matches!(
            create(&pool, alice.id, blank_body).await.unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn favorite_state_is_viewer_scoped() {
        let pool = testutil::pool().await;
        let alice = testutil::user(&pool, "alice").await;
        let bob = testutil::user(&pool, "bob").await;
        let view = testutil::article(&pool, alice.id, "Hello World").await;

        let as_bob = favorite(&pool, &view.slug, bob.id).await.unwrap();
        assert!(as_bob.favorited);
        assert_eq!(as_bob.favorites_count, 1);

        let anonymous = get(&pool, &view.slug, None).await.unwrap();
        assert!(!anonymous.favorited);
        assert!(!anonymous.author.following);
        assert_eq!(anonymous.favorites_count, 1);
    }

    #[tokio::test]
    async fn favorite_twice_is_noop_unfavorite_twice_errors() {
        let pool = testutil::pool().await;
        let alice = testutil::user(&pool, "alice").await;
        let bob = testutil::user(&pool, "bob").await;
        let view = testutil::article(&pool, alice.id, "Hello World").await;

        favorite(&pool, &view.slug, bob.id).await.unwrap();
        let second = favorite(&pool, &view.slug, bob.id).await.unwrap();
        assert_eq!(second.favorites_count, 1);

        let after = unfavorite(&pool, &view.slug, bob.id).await.unwrap();
        assert_eq!(after.favorites_count, 0);

        assert!(matches!(
            unfavorite(&pool, &view.slug, bob.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn only_the_author_may_update_or_delete() {
        let pool = testutil::pool().await;
        let alice = testutil::user(&pool, "alice").await;
        let bob = testutil::user(&pool, "bob").await;
        let view = testutil::article(&pool, alice.id, "Hello World").await;

        let err = update(
            &pool,
            &view.slug,
            bob.id,
            ArticleUpdate {
                body: Some("hijacked".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));

        assert!(matches!(
            delete(&pool, &view.slug, bob.id).await.unwrap_err(),
            AppError::Forbidden
        ));

        // Still intact for the author.
        assert!(delete(&pool, &view.slug, alice.id).await.is_ok());
    }

    #[tokio::test]
    async fn title_change_regenerates_slug() {
        let pool = testutil::pool().await;
        let alice = testutil::user(&pool, "alice").await;
        let view = testutil::article(&pool, alice.id, "Hello World").await;

        let updated = update(
            &pool,
            &view.slug,
            alice.id,
            ArticleUpdate {
                title: Some("Goodbye World".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(updated.slug.starts_with("goodbye-world"));

        // The old slug is permanently invalid.
        assert!(matches!(
            get(&pool, &view.slug, None).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(get(&pool, &updated.slug, None).await.is_ok());
    }

    #[tokio::test]
    async fn unchanged_title_keeps_slug() {
        let pool = testutil::pool().await;
        let alice = testutil::user(&pool, "alice").await;
        let view = testutil::article(&pool, alice.id, "Hello World").await;

        let updated = update(
            &pool,
            &view.slug,
            alice.id,
            ArticleUpdate {
                title: Some("Hello World".to_string()),
                body: Some("revised".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.slug, view.slug);
        assert_eq!(updated.body, "revised");
    }

    #[tokio::test]
    async fn empty_tag_list_clears_tags() {
        let pool = testutil::pool().await;
        let alice = testutil::user(&pool, "alice").await;

        let view = create(&pool, alice.id, new_article("Tagged", Some(vec!["rust"])))
            .await
            .unwrap();
        assert_eq!(view.tag_list, vec!["rust"]);

        let updated = update(
            &pool,
            &view.slug,
            alice.id,
            ArticleUpdate {
                tag_list: Some(vec![]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(updated.tag_list.is_empty());

        // The tag itself survives for the global tag list.
        assert_eq!(store::tags::all(&pool).await.unwrap(), vec!["rust"]);
    }

    #[tokio::test]
    async fn delete_cascades_to_dependents() {
        let pool = testutil::pool().await;
        let alice = testutil::user(&pool, "alice").await;
        let bob = testutil::user(&pool, "bob").await;

        let view = create(&pool, alice.id, new_article("Doomed", Some(vec!["rust"])))
            .await
            .unwrap();
        favorite(&pool, &view.slug, bob.id).await.unwrap();
        service::comments::create(&pool, &view.slug, bob.id, "nice")
            .await
            .unwrap();

        delete(&pool, &view.slug, alice.id).await.unwrap();

        assert!(matches!(
            get(&pool, &view.slug, None).await.unwrap_err(),
            AppError::NotFound(_)
        ));

        let orphans: i64 = sqlx::query_scalar(
            "SELECT (SELECT COUNT(*) FROM comments)
                  + (SELECT COUNT(*) FROM favorites)
                  + (SELECT COUNT(*) FROM article_tags)",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn list_filters_combine_with_and() {
        let pool = testutil::pool().await;
        let alice = testutil::user(&pool, "alice").await;
        let bob = testutil::user(&pool, "bob").await;

        create(&pool, alice.id, new_article("Rust Post", Some(vec!["rust"])))
            .await
            .unwrap();
        create(&pool, alice.id, new_article("Web Post", Some(vec!["web"])))
            .await
            .unwrap();
        create(&pool, bob.id, new_article("Bob Rust", Some(vec!["rust"])))
            .await
            .unwrap();

        let filter = ArticleFilter {
            tag: Some("rust".to_string()),
            author: Some("alice".to_string()),
            favorited: None,
        };
        let (articles, total) = list(&pool, &filter, Page::default(), None).await.unwrap();

        assert_eq!(total, 1);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Rust Post");
    }

    #[tokio::test]
    async fn tag_filter_matches_any_case() {
        let pool = testutil::pool().await;
        let alice = testutil::user(&pool, "alice").await;

        create(&pool, alice.id, new_article("Tagged", Some(vec!["Rust"])))
            .await
            .unwrap();

        for tag in ["Rust", "rust", " RUST "] {
            let filter = ArticleFilter {
                tag: Some(tag.to_string()),
                ..Default::default()
            };
            let (articles, total) = list(&pool, &filter, Page::default(), None).await.unwrap();

            assert_eq!(total, 1, "tag filter missed {tag:?}");
            assert_eq!(articles[0].tag_list, vec!["rust"]);
        }
    }

    #[tokio::test]
    async fn favorited_by_filter() {
        let pool = testutil::pool().await;
        let alice = testutil::user(&pool, "alice").await;
        let bob = testutil::user(&pool, "bob").await;

        let liked = testutil::article(&pool, alice.id, "Liked").await;
        testutil::article(&pool, alice.id, "Ignored").await;
        favorite(&pool, &liked.slug, bob.id).await.unwrap();

        let filter = ArticleFilter {
            favorited: Some("bob".to_string()),
            ..Default::default()
        };
        let (articles, total) = list(&pool, &filter, Page::default(), None).await.unwrap();

        assert_eq!(total, 1);
        assert_eq!(articles[0].slug, liked.slug);
    }

    #[tokio::test]
    async fn total_count_ignores_pagination() {
        let pool = testutil::pool().await;
        let alice = testutil::user(&pool, "alice").await;
        for i in 0..5 {
            testutil::article(&pool, alice.id, &format!("Post {i}")).await;
        }

        let filter = ArticleFilter::default();
        let small = Page { limit: 1, offset: 0 };
        let large = Page { limit: 100, offset: 0 };

        let (page, small_total) = list(&pool, &filter, small, None).await.unwrap();
        let (all, large_total) = list(&pool, &filter, large, None).await.unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(all.len(), 5);
        assert_eq!(small_total, 5);
        assert_eq!(small_total, large_total);
    }

    #[tokio::test]
    async fn feed_restricted_to_followed_authors() {
        let pool = testutil::pool().await;
        let alice = testutil::user(&pool, "alice").await;
        let bob = testutil::user(&pool, "bob").await;
        let carol = testutil::user(&pool, "carol").await;

        testutil::article(&pool, alice.id, "From Alice").await;
        testutil::article(&pool, carol.id, "From Carol").await;

        service::profiles::follow(&pool, bob.id, "alice").await.unwrap();

        let (articles, total) = feed(&pool, bob.id, Page::default()).await.unwrap();

        assert_eq!(total, 1);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].author.username, "alice");
        assert!(articles[0].author.following);
    }

    #[tokio::test]
    async fn feed_ignores_own_articles() {
        let pool = testutil::pool().await;
        let bob = testutil::user(&pool, "bob").await;
        testutil::article(&pool, bob.id, "Mine").await;

        let (_, total) = feed(&pool, bob.id, Page::default()).await.unwrap();
        assert_eq!(total, 0);
    }
}
