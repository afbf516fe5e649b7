use std::sync::Arc;

use yatube_core::domain::{CurrentUser, Group, NewGroup, NewPost, Post, PostChanges, PostFilter, User};
use yatube_core::error::RepoError;
use yatube_core::forms::{PostForm, TEXT_FIELD};
use yatube_core::ports::{BaseRepository, GroupRepository, PostRepository, UserRepository};
use yatube_core::service::{FormOutcome, Redirect};
use yatube_core::{BlogService, DomainError};

use super::InMemoryStore;

struct Fixture {
    store: Arc<InMemoryStore>,
    blog: BlogService,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let blog = BlogService::new(store.clone(), store.clone(), store.clone());
        Self { store, blog }
    }

    fn users(&self) -> &dyn UserRepository {
        self.store.as_ref()
    }

    fn groups(&self) -> &dyn GroupRepository {
        self.store.as_ref()
    }

    fn posts(&self) -> &dyn PostRepository {
        self.store.as_ref()
    }

    async fn user(&self, username: &str) -> (User, CurrentUser) {
        let user = self.users().create(User::new(username)).await.unwrap();
        let viewer = CurrentUser::from(&user);
        (user, viewer)
    }

    async fn group(&self, title: &str, slug: &str) -> Group {
        let group = NewGroup::new(title, slug, "Test description").unwrap();
        self.groups().create(group).await.unwrap()
    }

    async fn post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        self.posts()
            .create(NewPost {
                text: text.to_string(),
                author_id: author.id,
                group_id: group.map(|g| g.id),
            })
            .await
            .unwrap()
    }

    async fn total_posts(&self) -> u64 {
        self.posts().count(PostFilter::All).await.unwrap()
    }
}

#[tokio::test]
async fn test_duplicate_slug_is_constraint_violation() {
    let fx = Fixture::new();
    fx.group("Cats", "cats").await;

    let result = fx
        .groups()
        .create(NewGroup::new("Other cats", "cats", "").unwrap())
        .await;

    assert!(matches!(result, Err(RepoError::Constraint(_))));
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let fx = Fixture::new();
    let (author, _) = fx.user("leo").await;
    for n in 0..5 {
        fx.post(&author, &format!("Post {n}"), None).await;
    }

    let posts = fx.posts().list(PostFilter::All).await.unwrap();

    let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![5, 4, 3, 2, 1]);
    assert!(posts.windows(2).all(|w| w[0].pub_date >= w[1].pub_date));
}

#[tokio::test]
async fn test_deleting_group_clears_posts_group() {
    let fx = Fixture::new();
    let (author, _) = fx.user("leo").await;
    let group = fx.group("Cats", "cats").await;
    let post = fx.post(&author, "Cat picture", Some(&group)).await;

    BaseRepository::<Group, i64>::delete(fx.store.as_ref(), group.id)
        .await
        .unwrap();

    let post = fx.posts().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(post.group_id, None);
    assert_eq!(fx.total_posts().await, 1);
}

#[tokio::test]
async fn test_deleting_user_deletes_their_posts() {
    let fx = Fixture::new();
    let (leo, _) = fx.user("leo").await;
    let (mia, _) = fx.user("mia").await;
    fx.post(&leo, "by leo", None).await;
    fx.post(&mia, "by mia", None).await;

    fx.users().delete(leo.id).await.unwrap();

    let remaining = fx.posts().list(PostFilter::All).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].author_id, mia.id);
}

#[tokio::test]
async fn test_post_requires_existing_author_and_group() {
    let fx = Fixture::new();
    let (author, _) = fx.user("leo").await;

    let orphan = fx
        .posts()
        .create(NewPost {
            text: "text".to_string(),
            author_id: uuid::Uuid::new_v4(),
            group_id: None,
        })
        .await;
    assert!(matches!(orphan, Err(RepoError::Constraint(_))));

    let missing_group = fx
        .posts()
        .create(NewPost {
            text: "text".to_string(),
            author_id: author.id,
            group_id: Some(99),
        })
        .await;
    assert!(matches!(missing_group, Err(RepoError::Constraint(_))));
}

#[tokio::test]
async fn test_update_missing_post_is_not_found() {
    let fx = Fixture::new();

    let result = fx
        .posts()
        .update(
            42,
            PostChanges {
                text: "text".to_string(),
                group_id: None,
            },
        )
        .await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_ensure_records_identity_once() {
    let fx = Fixture::new();
    let identity = CurrentUser {
        id: uuid::Uuid::new_v4(),
        username: "fresh".to_string(),
    };

    let first = fx.users().ensure(&identity).await.unwrap();
    let second = fx.users().ensure(&identity).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.id, identity.id);
    let found = fx.users().find_by_username("fresh").await.unwrap();
    assert_eq!(found, Some(first));
}

#[tokio::test]
async fn test_ensure_rejects_taken_username() {
    let fx = Fixture::new();
    fx.user("leo").await;
    let impostor = CurrentUser {
        id: uuid::Uuid::new_v4(),
        username: "leo".to_string(),
    };

    let result = fx.users().ensure(&impostor).await;

    assert!(matches!(result, Err(RepoError::Constraint(_))));
}

#[tokio::test]
async fn test_create_post_records_unknown_author() {
    let fx = Fixture::new();
    let viewer = CurrentUser {
        id: uuid::Uuid::new_v4(),
        username: "fresh".to_string(),
    };

    let outcome = fx
        .blog
        .create_post(&viewer, PostForm::new("hello", None))
        .await
        .unwrap();

    assert_eq!(outcome.redirect(), Some(&Redirect::Index));
    let profile = fx.blog.profile(Some(&viewer), "fresh", None).await.unwrap();
    assert_eq!(profile.author.id, viewer.id);
    assert_eq!(profile.post_count, 1);
    assert!(profile.edit);
}

#[tokio::test]
async fn test_create_post_with_clashing_username_is_duplicate() {
    let fx = Fixture::new();
    fx.user("leo").await;
    let viewer = CurrentUser {
        id: uuid::Uuid::new_v4(),
        username: "leo".to_string(),
    };

    let result = fx.blog.create_post(&viewer, PostForm::new("hello", None)).await;

    assert!(matches!(result, Err(DomainError::Duplicate(_))));
    assert_eq!(fx.total_posts().await, 0);
}

#[tokio::test]
async fn test_create_post_adds_exactly_one() {
    let fx = Fixture::new();
    let (_, viewer) = fx.user("leo").await;
    let group = fx.group("Cats", "cats").await;
    let before = fx.total_posts().await;

    let outcome = fx
        .blog
        .create_post(&viewer, PostForm::new("Fresh post", Some(group.id)))
        .await
        .unwrap();

    assert_eq!(outcome.redirect(), Some(&Redirect::Index));
    assert_eq!(fx.total_posts().await, before + 1);

    let index = fx.blog.index(None).await.unwrap();
    let newest = &index.page.object_list[0];
    assert_eq!(newest.post.text, "Fresh post");
    assert_eq!(newest.post.author_id, viewer.id);
    assert_eq!(newest.group.as_ref().map(|g| g.id), Some(group.id));
}

#[tokio::test]
async fn test_create_post_with_empty_text_rerenders_form() {
    let fx = Fixture::new();
    let (_, viewer) = fx.user("leo").await;

    let outcome = fx
        .blog
        .create_post(&viewer, PostForm::new("   ", None))
        .await
        .unwrap();

    let FormOutcome::Render(context) = outcome else {
        panic!("expected the form to be shown again");
    };
    assert!(context.errors.has(TEXT_FIELD, "required"));
    assert!(!context.edit);
    assert_eq!(fx.total_posts().await, 0);
}

#[tokio::test]
async fn test_edit_as_author_changes_text_and_group_only() {
    let fx = Fixture::new();
    let (author, viewer) = fx.user("leo").await;
    let group = fx.group("Cats", "cats").await;
    let post = fx.post(&author, "Original", None).await;

    let outcome = fx
        .blog
        .update_post(&viewer, "leo", post.id, PostForm::new("Edited", Some(group.id)))
        .await
        .unwrap();

    assert_eq!(
        outcome.redirect(),
        Some(&Redirect::Post {
            username: "leo".to_string(),
            post_id: post.id,
        })
    );
    let stored = fx.posts().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Edited");
    assert_eq!(stored.group_id, Some(group.id));
    assert_eq!(stored.pub_date, post.pub_date);
    assert_eq!(stored.author_id, post.author_id);
}

#[tokio::test]
async fn test_edit_as_other_user_redirects_without_change() {
    let fx = Fixture::new();
    let (author, _) = fx.user("leo").await;
    let (_, intruder) = fx.user("mia").await;
    let post = fx.post(&author, "Original", None).await;

    let outcome = fx
        .blog
        .update_post(&intruder, "leo", post.id, PostForm::new("Hacked", None))
        .await
        .unwrap();

    assert_eq!(
        outcome.redirect(),
        Some(&Redirect::Post {
            username: "leo".to_string(),
            post_id: post.id,
        })
    );
    let stored = fx.posts().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored, post);

    let form = fx
        .blog
        .edit_post_form(&intruder, "leo", post.id)
        .await
        .unwrap();
    assert!(form.redirect().is_some());
}

#[tokio::test]
async fn test_edit_form_is_prepopulated() {
    let fx = Fixture::new();
    let (author, viewer) = fx.user("leo").await;
    let group = fx.group("Cats", "cats").await;
    let post = fx.post(&author, "Original", Some(&group)).await;

    let outcome = fx.blog.edit_post_form(&viewer, "leo", post.id).await.unwrap();

    let context = outcome.form().expect("form");
    assert!(context.edit);
    assert_eq!(context.form.text.as_deref(), Some("Original"));
    assert_eq!(context.form.group, Some(group.id.to_string()));
    assert_eq!(context.groups, vec![group]);
}

#[tokio::test]
async fn test_edit_with_invalid_group_keeps_post() {
    let fx = Fixture::new();
    let (author, viewer) = fx.user("leo").await;
    let post = fx.post(&author, "Original", None).await;

    let outcome = fx
        .blog
        .update_post(&viewer, "leo", post.id, PostForm::new("Edited", Some(77)))
        .await
        .unwrap();

    assert!(outcome.form().is_some());
    let stored = fx.posts().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Original");
}

#[tokio::test]
async fn test_post_lookup_requires_matching_author() {
    let fx = Fixture::new();
    let (leo, viewer) = fx.user("leo").await;
    fx.user("mia").await;
    let post = fx.post(&leo, "Leo's post", None).await;

    let wrong_author = fx.blog.post_view(None, "mia", post.id).await;
    assert!(matches!(wrong_author, Err(DomainError::NotFound { .. })));

    let missing = fx.blog.update_post(&viewer, "leo", 999, PostForm::new("x", None)).await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_thirteen_posts_paginate_ten_and_three() {
    let fx = Fixture::new();
    let (author, _) = fx.user("leo").await;
    for n in 0..13 {
        fx.post(&author, &format!("Post number {n}"), None).await;
    }

    let first = fx.blog.index(None).await.unwrap();
    let second = fx.blog.index(Some("2")).await.unwrap();

    assert_eq!(first.page.len(), 10);
    assert_eq!(second.page.len(), 3);
    assert_eq!(second.page.object_list[2].post.text, "Post number 0");
}

#[tokio::test]
async fn test_group_listing_excludes_other_groups() {
    let fx = Fixture::new();
    let (author, _) = fx.user("leo").await;
    let group_a = fx.group("Group A", "test-slug").await;
    let group_b = fx.group("Group B", "other-slug").await;
    let post = fx.post(&author, "Only in A", Some(&group_a)).await;

    let a = fx.blog.group_posts("test-slug", None).await.unwrap();
    let b = fx.blog.group_posts("other-slug", None).await.unwrap();

    assert_eq!(a.group, group_a);
    assert_eq!(a.page.len(), 1);
    assert_eq!(a.page.object_list[0].post, post);
    assert_eq!(b.group, group_b);
    assert!(b.page.is_empty());
}

#[tokio::test]
async fn test_unknown_slug_and_username_are_not_found() {
    let fx = Fixture::new();

    assert!(matches!(
        fx.blog.group_posts("nope", None).await,
        Err(DomainError::NotFound { entity_type: "Group", .. })
    ));
    assert!(matches!(
        fx.blog.profile(None, "nobody", None).await,
        Err(DomainError::NotFound { entity_type: "User", .. })
    ));
}

#[tokio::test]
async fn test_profile_counts_and_edit_flag() {
    let fx = Fixture::new();
    let (leo, leo_viewer) = fx.user("leo").await;
    let (mia, mia_viewer) = fx.user("mia").await;
    fx.post(&leo, "one", None).await;
    fx.post(&leo, "two", None).await;
    fx.post(&mia, "other", None).await;

    let own = fx.blog.profile(Some(&leo_viewer), "leo", None).await.unwrap();
    assert_eq!(own.author, leo);
    assert_eq!(own.post_count, 2);
    assert!(own.edit);
    assert!(own.page.iter().all(|v| v.author == leo));

    let visiting = fx.blog.profile(Some(&mia_viewer), "leo", None).await.unwrap();
    assert!(!visiting.edit);

    let anonymous = fx.blog.profile(None, "leo", None).await.unwrap();
    assert!(!anonymous.edit);
}

#[tokio::test]
async fn test_post_view_context() {
    let fx = Fixture::new();
    let (leo, viewer) = fx.user("leo").await;
    let group = fx.group("Cats", "cats").await;
    let post = fx.post(&leo, "Cat picture", Some(&group)).await;
    fx.post(&leo, "Another", None).await;

    let context = fx.blog.post_view(Some(&viewer), "leo", post.id).await.unwrap();

    assert_eq!(context.author, leo);
    assert_eq!(context.post.post, post);
    assert_eq!(context.post.group, Some(group));
    assert_eq!(context.post_count, 2);
    assert!(context.edit);
}
