//! Request handling: lookups, access checks, pagination and form flows.
//!
//! Each method serves one endpoint and returns the context to render or
//! the redirect to issue. The current user is passed explicitly; write
//! methods take an already-guarded [`CurrentUser`] (see [`crate::access`]).

mod views;

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::access;
use crate::domain::{CurrentUser, Group, Post, PostFilter, User};
use crate::error::{DomainError, RepoError};
use crate::forms::{FormErrors, PostForm};
use crate::pagination::{Page, Paginator, POSTS_PER_PAGE};
use crate::ports::{GroupRepository, PostRepository, UserRepository};

pub use views::{
    FormContext, FormOutcome, GroupContext, IndexContext, PostContext, PostView, ProfileContext,
    Redirect, Template,
};

/// The blog's request-handling core, over injected repositories.
#[derive(Clone)]
pub struct BlogService {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
}

impl BlogService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
        posts: Arc<dyn PostRepository>,
    ) -> Self {
        Self {
            users,
            groups,
            posts,
        }
    }

    pub fn users(&self) -> &dyn UserRepository {
        self.users.as_ref()
    }

    pub fn groups(&self) -> &dyn GroupRepository {
        self.groups.as_ref()
    }

    pub fn posts(&self) -> &dyn PostRepository {
        self.posts.as_ref()
    }

    /// GET / - every post, newest first.
    pub async fn index(&self, page: Option<&str>) -> Result<IndexContext, DomainError> {
        let page = self.paginate(PostFilter::All, page).await?;
        Ok(IndexContext { page })
    }

    /// GET /group/{slug}/ - posts of one group.
    pub async fn group_posts(
        &self,
        slug: &str,
        page: Option<&str>,
    ) -> Result<GroupContext, DomainError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Group", slug))?;

        let page = self.paginate(PostFilter::Group(group.id), page).await?;
        Ok(GroupContext { group, page })
    }

    /// GET /{username}/ - posts of one author.
    pub async fn profile(
        &self,
        viewer: Option<&CurrentUser>,
        username: &str,
        page: Option<&str>,
    ) -> Result<ProfileContext, DomainError> {
        let author = self.find_author(username).await?;
        let page = self.paginate(PostFilter::Author(author.id), page).await?;

        Ok(ProfileContext {
            edit: access::is_self(viewer, &author),
            post_count: page.count as u64,
            author,
            page,
        })
    }

    /// GET /{username}/{post_id}/ - a single post.
    pub async fn post_view(
        &self,
        viewer: Option<&CurrentUser>,
        username: &str,
        post_id: i64,
    ) -> Result<PostContext, DomainError> {
        let (author, post) = self.find_post(username, post_id).await?;
        let post_count = self.posts.count(PostFilter::Author(author.id)).await?;
        let group = self.group_of(&post).await?;

        Ok(PostContext {
            edit: access::is_self(viewer, &author),
            post: PostView {
                post,
                author: author.clone(),
                group,
            },
            author,
            post_count,
        })
    }

    /// GET /new/ - an empty form.
    pub async fn new_post_form(&self, _viewer: &CurrentUser) -> Result<FormContext, DomainError> {
        self.form_context(PostForm::default(), FormErrors::default(), None)
            .await
    }

    /// POST /new/ - store a post authored by `viewer`.
    pub async fn create_post(
        &self,
        viewer: &CurrentUser,
        form: PostForm,
    ) -> Result<FormOutcome, DomainError> {
        let clean = match form.clean(self.groups.as_ref()).await {
            Ok(clean) => clean,
            Err(DomainError::InvalidForm(errors)) => {
                tracing::debug!(author = %viewer.username, %errors, "Rejected new post");
                let context = self.form_context(form, errors, None).await?;
                return Ok(FormOutcome::Render(context));
            }
            Err(e) => return Err(e),
        };

        let author = self.ensure_author(viewer).await?;
        let post = self.posts.create(clean.into_new_post(author.id)).await?;
        tracing::info!(post_id = post.id, author = %viewer.username, "Post created");

        Ok(FormOutcome::Redirect(Redirect::Index))
    }

    /// GET /{username}/{post_id}/edit/ - the form pre-populated, for the author only.
    pub async fn edit_post_form(
        &self,
        viewer: &CurrentUser,
        username: &str,
        post_id: i64,
    ) -> Result<FormOutcome, DomainError> {
        let (author, post) = self.find_post(username, post_id).await?;
        if !access::is_owner(viewer, &post) {
            return Ok(Self::deny_edit(viewer, &author, &post));
        }

        let form = PostForm::from_post(&post);
        let context = self
            .form_context(form, FormErrors::default(), Some(post))
            .await?;
        Ok(FormOutcome::Render(context))
    }

    /// POST /{username}/{post_id}/edit/ - change text and group of the author's post.
    pub async fn update_post(
        &self,
        viewer: &CurrentUser,
        username: &str,
        post_id: i64,
        form: PostForm,
    ) -> Result<FormOutcome, DomainError> {
        let (author, post) = self.find_post(username, post_id).await?;
        if !access::is_owner(viewer, &post) {
            return Ok(Self::deny_edit(viewer, &author, &post));
        }

        let clean = match form.clean(self.groups.as_ref()).await {
            Ok(clean) => clean,
            Err(DomainError::InvalidForm(errors)) => {
                let context = self.form_context(form, errors, Some(post)).await?;
                return Ok(FormOutcome::Render(context));
            }
            Err(e) => return Err(e),
        };

        let updated = self.posts.update(post.id, clean.into_changes()).await?;
        tracing::info!(post_id = updated.id, author = %author.username, "Post updated");

        Ok(FormOutcome::Redirect(Redirect::Post {
            username: author.username,
            post_id: updated.id,
        }))
    }

    fn deny_edit(viewer: &CurrentUser, author: &User, post: &Post) -> FormOutcome {
        tracing::warn!(
            post_id = post.id,
            viewer = %viewer.username,
            "Edit attempted by someone other than the author"
        );
        FormOutcome::Redirect(Redirect::Post {
            username: author.username.clone(),
            post_id: post.id,
        })
    }

    async fn form_context(
        &self,
        form: PostForm,
        errors: FormErrors,
        post: Option<Post>,
    ) -> Result<FormContext, DomainError> {
        Ok(FormContext {
            form,
            errors,
            groups: self.groups.list_all().await?,
            edit: post.is_some(),
            post,
        })
    }

    /// The requesting user as stored, recorded on their first write.
    async fn ensure_author(&self, viewer: &CurrentUser) -> Result<User, DomainError> {
        self.users.ensure(viewer).await.map_err(|e| match e {
            RepoError::Constraint(msg) => DomainError::Duplicate(msg),
            other => other.into(),
        })
    }

    async fn find_author(&self, username: &str) -> Result<User, DomainError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", username))
    }

    /// A post looked up by its author's username and its id; both must agree.
    async fn find_post(&self, username: &str, post_id: i64) -> Result<(User, Post), DomainError> {
        let author = self.find_author(username).await?;
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .filter(|post| post.is_authored_by(author.id))
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        Ok((author, post))
    }

    async fn group_of(&self, post: &Post) -> Result<Option<Group>, DomainError> {
        match post.group_id {
            Some(id) => Ok(self.groups.find_by_id(id).await?),
            None => Ok(None),
        }
    }

    async fn paginate(
        &self,
        filter: PostFilter,
        page: Option<&str>,
    ) -> Result<Page<PostView>, DomainError> {
        let posts = self.posts.list(filter).await?;
        let page = Paginator::new(posts, POSTS_PER_PAGE).get_page(page);
        tracing::debug!(
            ?filter,
            page = page.number,
            num_pages = page.num_pages,
            "Paginated posts"
        );
        self.present(page).await
    }

    /// Resolve authors and groups for the posts of one page.
    async fn present(&self, page: Page<Post>) -> Result<Page<PostView>, DomainError> {
        let mut authors: HashMap<Uuid, User> = HashMap::new();
        let mut groups: HashMap<i64, Option<Group>> = HashMap::new();
        let mut views = Vec::with_capacity(page.len());

        for post in &page {
            if !authors.contains_key(&post.author_id) {
                let author = self.users.find_by_id(post.author_id).await?.ok_or_else(|| {
                    DomainError::Internal(format!("post {} has no author", post.id))
                })?;
                authors.insert(post.author_id, author);
            }
            if let Some(group_id) = post.group_id {
                if !groups.contains_key(&group_id) {
                    let group = self.groups.find_by_id(group_id).await?;
                    groups.insert(group_id, group);
                }
            }

            views.push(PostView {
                post: post.clone(),
                author: authors[&post.author_id].clone(),
                group: post.group_id.and_then(|id| groups[&id].clone()),
            });
        }

        Ok(page.with_items(views))
    }
}
