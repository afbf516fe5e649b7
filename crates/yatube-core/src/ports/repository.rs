use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{CurrentUser, Group, NewGroup, NewPost, Post, PostChanges, PostFilter, User};
use crate::error::RepoError;

/// Generic repository trait shared by every entity.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository. Deleting a user deletes their posts.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Store a user mirrored from the authentication service.
    async fn create(&self, user: User) -> Result<User, RepoError>;

    /// The stored user behind `identity`, recorded on first sight.
    ///
    /// A username already held by a different id is a constraint violation.
    async fn ensure(&self, identity: &CurrentUser) -> Result<User, RepoError>;
}

/// Group repository. Deleting a group clears the group of its posts.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, i64> {
    /// Find a group by its slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    /// Store a new group. A taken slug is a constraint violation.
    async fn create(&self, group: NewGroup) -> Result<Group, RepoError>;

    /// All groups ordered by title.
    async fn list_all(&self) -> Result<Vec<Group>, RepoError>;
}

/// Post repository. Listings are always newest first.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Store a new post, assigning its id and publication date.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Replace the text and group of an existing post.
    async fn update(&self, id: i64, changes: PostChanges) -> Result<Post, RepoError>;

    /// Posts matching `filter`, newest first.
    async fn list(&self, filter: PostFilter) -> Result<Vec<Post>, RepoError>;

    /// Number of posts matching `filter`.
    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError>;
}
