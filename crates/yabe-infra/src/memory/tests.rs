#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use yabe_core::domain::{Comment, Post, User};
    use yabe_core::error::{DomainError, RepoError};
    use yabe_core::ports::Repositories;
    use yabe_core::BlogService;

    use crate::fixtures::load_blog;
    use crate::memory::InMemoryStore;

    fn empty_store() -> Repositories {
        Arc::new(InMemoryStore::new()).into_repositories()
    }

    #[tokio::test]
    async fn test_create_and_retrieve_user() {
        let repos = empty_store();
        repos
            .users
            .save(User::new("martin@hot.ee", "secret", "Martin"))
            .await
            .unwrap();

        let martin = repos.users.find_by_email("martin@hot.ee").await.unwrap();

        assert!(martin.is_some());
        assert_eq!(martin.unwrap().fullname, "Martin");
    }

    #[tokio::test]
    async fn test_connect_as_user() {
        let repos = empty_store();
        repos
            .users
            .save(User::new("martin@hot.ee", "secret", "Martin"))
            .await
            .unwrap();
        let blog = BlogService::new(repos);

        assert!(blog.connect("martin@hot.ee", "secret").await.unwrap().is_some());
        assert!(blog.connect("martin@hot.ee", "badpassword").await.unwrap().is_none());
        assert!(blog.connect("renar@hot.ee", "secret").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_post() {
        let repos = empty_store();
        let martin = repos
            .users
            .save(User::new("martin@hot.ee", "secret", "Martin"))
            .await
            .unwrap();

        repos
            .posts
            .save(Post::new(&martin, "My first post", "Hello world"))
            .await
            .unwrap();

        assert_eq!(repos.posts.count().await.unwrap(), 1);

        let martin_posts = repos.posts.find_by_author(martin.id).await.unwrap();
        assert_eq!(martin_posts.len(), 1);

        let first_post = &martin_posts[0];
        assert_eq!(first_post.author_id, martin.id);
        assert_eq!(first_post.title, "My first post");
        assert_eq!(first_post.content, "Hello world");
    }

    #[tokio::test]
    async fn test_post_comments() {
        let repos = empty_store();
        let martin = repos
            .users
            .save(User::new("martin@hot.ee", "secret", "Martin"))
            .await
            .unwrap();
        let post = repos
            .posts
            .save(Post::new(&martin, "My first post", "Hello world"))
            .await
            .unwrap();

        repos
            .comments
            .save(Comment::new(&post, "Jeff", "Nice post"))
            .await
            .unwrap();
        repos
            .comments
            .save(Comment::new(&post, "Tom", "I knew that !"))
            .await
            .unwrap();

        let comments = repos.comments.find_by_post(post.id).await.unwrap();
        assert_eq!(comments.len(), 2);

        assert_eq!(comments[0].author, "Jeff");
        assert_eq!(comments[0].content, "Nice post");
        assert_eq!(comments[1].author, "Tom");
        assert_eq!(comments[1].content, "I knew that !");
    }

    #[tokio::test]
    async fn test_comments_posted_together_keep_insertion_order() {
        let repos = empty_store();
        let bob = repos
            .users
            .save(User::new("bob@gmail.com", "secret", "Bob"))
            .await
            .unwrap();
        let post = repos
            .posts
            .save(Post::new(&bob, "About the model layer", ""))
            .await
            .unwrap();

        let same_day = Utc.with_ymd_and_hms(2009, 6, 14, 0, 0, 0).unwrap();
        for author in ["Guest", "Jim", "Mike"] {
            repos
                .comments
                .save(Comment::new(&post, author, "...").posted_at(same_day))
                .await
                .unwrap();
        }
        repos
            .comments
            .save(
                Comment::new(&post, "Early bird", "First!")
                    .posted_at(Utc.with_ymd_and_hms(2009, 6, 13, 0, 0, 0).unwrap()),
            )
            .await
            .unwrap();

        let authors: Vec<String> = repos
            .comments
            .find_by_post(post.id)
            .await
            .unwrap()
            .into_iter()
            .map(|comment| comment.author)
            .collect();
        assert_eq!(authors, ["Early bird", "Guest", "Jim", "Mike"]);
    }

    #[tokio::test]
    async fn test_delete_post_cascades_to_comments() {
        let repos = empty_store();
        let blog = BlogService::new(repos.clone());

        let martin = repos
            .users
            .save(User::new("martin@hot.ee", "secret", "Martin"))
            .await
            .unwrap();
        let post = blog
            .publish(&martin, "My first post", "Hello world")
            .await
            .unwrap();

        blog.add_comment(post.id, "Jeff", "Nice post").await.unwrap();
        blog.add_comment(post.id, "Tom", "I knew that !").await.unwrap();

        assert_eq!(repos.users.count().await.unwrap(), 1);
        assert_eq!(repos.posts.count().await.unwrap(), 1);
        assert_eq!(repos.comments.count().await.unwrap(), 2);

        let comments = blog.comments_of(post.id).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].author, "Jeff");

        blog.delete_post(post.id).await.unwrap();

        assert_eq!(repos.users.count().await.unwrap(), 1);
        assert_eq!(repos.posts.count().await.unwrap(), 0);
        assert_eq!(repos.comments.count().await.unwrap(), 0);
        assert_eq!(repos.comments.count_by_post(post.id).await.unwrap(), 0);
        assert!(repos.posts.find_by_id(post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_post_leaves_other_posts_alone() {
        let repos = empty_store();
        let blog = BlogService::new(repos.clone());
        let bob = repos
            .users
            .save(User::new("bob@gmail.com", "secret", "Bob"))
            .await
            .unwrap();

        let doomed = repos
            .posts
            .save(Post::new(&bob, "Doomed", "").tag_it_with("Red"))
            .await
            .unwrap();
        let kept = repos
            .posts
            .save(Post::new(&bob, "Kept", "").tag_it_with("Red"))
            .await
            .unwrap();
        blog.add_comment(doomed.id, "Jeff", "Bye").await.unwrap();
        blog.add_comment(kept.id, "Tom", "Hi").await.unwrap();

        blog.delete_post(doomed.id).await.unwrap();

        assert_eq!(repos.comments.count_by_post(kept.id).await.unwrap(), 1);
        let red = blog.find_tagged_with(&["Red"]).await.unwrap();
        assert_eq!(red.len(), 1);
        assert_eq!(red[0].id, kept.id);
        assert_eq!(blog.tag_cloud().await.unwrap()[0].pound, 1);
    }

    #[tokio::test]
    async fn test_delete_missing_entities_is_not_an_error() {
        let repos = empty_store();
        let missing = uuid::Uuid::new_v4();

        assert!(repos.posts.delete(missing).await.is_ok());
        assert!(repos.comments.delete(missing).await.is_ok());
        assert!(repos.users.delete(missing).await.is_ok());
    }

    #[tokio::test]
    async fn test_author_with_posts_cannot_be_deleted() {
        let repos = empty_store();
        let bob = repos
            .users
            .save(User::new("bob@gmail.com", "secret", "Bob"))
            .await
            .unwrap();
        repos
            .posts
            .save(Post::new(&bob, "Hop", "Hello world"))
            .await
            .unwrap();

        let result = repos.users.delete(bob.id).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
        assert_eq!(repos.users.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_orphans_are_rejected() {
        let repos = empty_store();
        let ghost = User::new("ghost@gmail.com", "secret", "Ghost");
        let post = Post::new(&ghost, "Nobody wrote this", "");

        let result = repos.posts.save(post.clone()).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));

        let result = repos.comments.save(Comment::new(&post, "Tom", "?")).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));

        let blog = BlogService::new(repos);
        let result = blog.add_comment(post.id, "Tom", "?").await;
        assert!(matches!(
            result,
            Err(DomainError::NotFound { entity_type: "Post", id }) if id == post.id
        ));
    }

    #[tokio::test]
    async fn test_register() {
        let blog = BlogService::new(empty_store());

        let martin = blog
            .register("martin@hot.ee", "secret", "Martin")
            .await
            .unwrap();
        assert_eq!(martin.fullname, "Martin");

        assert!(matches!(
            blog.register("martin@hot.ee", "other", "Martin Again").await,
            Err(DomainError::Duplicate(_))
        ));
        assert!(matches!(
            blog.register("not-an-email", "secret", "Nobody").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            blog.register("tom@gmail.com", "secret", "   ").await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_constraint_violation() {
        let repos = empty_store();
        repos
            .users
            .save(User::new("bob@gmail.com", "secret", "Bob"))
            .await
            .unwrap();

        let result = repos
            .users
            .save(User::new("bob@gmail.com", "other", "Other Bob"))
            .await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_full_blog_dataset() {
        let repos = empty_store();
        let fixture = load_blog(&repos).await.unwrap();
        let blog = BlogService::new(repos.clone());

        assert_eq!(repos.users.count().await.unwrap(), 2);
        assert_eq!(repos.posts.count().await.unwrap(), 3);
        assert_eq!(repos.comments.count().await.unwrap(), 3);

        assert!(blog.connect("bob@gmail.com", "secret").await.unwrap().is_some());
        assert!(blog.connect("jeff@gmail.com", "secret").await.unwrap().is_some());
        assert!(blog.connect("jeff@gmail.com", "badpassword").await.unwrap().is_none());
        assert!(blog.connect("tom@gmail.com", "secret").await.unwrap().is_none());

        let bob_posts = repos.posts.find_by_author_email("bob@gmail.com").await.unwrap();
        assert_eq!(bob_posts.len(), 2);
        assert!(bob_posts.iter().all(|post| post.author_id == fixture.bob.id));

        let bob_comments = repos
            .comments
            .find_by_post_author_email("bob@gmail.com")
            .await
            .unwrap();
        assert_eq!(bob_comments.len(), 3);

        let front_post = blog.front_post().await.unwrap().unwrap();
        assert_eq!(front_post.title, "About the model layer");
        assert_eq!(blog.comments_of(front_post.id).await.unwrap().len(), 2);

        blog.add_comment(front_post.id, "Jim", "Hello guys").await.unwrap();
        let comments = blog.comments_of(front_post.id).await.unwrap();
        assert_eq!(comments.len(), 3);
        assert_eq!(comments[2].author, "Jim");
        assert_eq!(repos.comments.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_tags() {
        let repos = empty_store();
        let blog = BlogService::new(repos.clone());

        let bob = repos
            .users
            .save(User::new("bob@gmail.com", "secret", "Bob"))
            .await
            .unwrap();
        let bob_post = repos
            .posts
            .save(
                Post::new(&bob, "My first post", "Hello world")
                    .posted_at(Utc.with_ymd_and_hms(2009, 6, 1, 0, 0, 0).unwrap()),
            )
            .await
            .unwrap();
        let another_bob_post = repos
            .posts
            .save(
                Post::new(&bob, "Hop", "Hello world")
                    .posted_at(Utc.with_ymd_and_hms(2009, 6, 2, 0, 0, 0).unwrap()),
            )
            .await
            .unwrap();
        let (older, newer) = (bob_post.id, another_bob_post.id);

        assert!(blog.find_tagged_with(&["Red"]).await.unwrap().is_empty());

        repos
            .posts
            .save(bob_post.tag_it_with("Red").tag_it_with("Blue"))
            .await
            .unwrap();
        repos
            .posts
            .save(another_bob_post.tag_it_with("Red").tag_it_with("Green"))
            .await
            .unwrap();

        let ids = |posts: Vec<Post>| posts.into_iter().map(|post| post.id).collect::<Vec<_>>();

        assert_eq!(ids(blog.find_tagged_with(&["Red"]).await.unwrap()), [newer, older]);
        assert_eq!(ids(blog.find_tagged_with(&["Blue"]).await.unwrap()), [older]);
        assert_eq!(ids(blog.find_tagged_with(&["Green"]).await.unwrap()), [newer]);
        assert_eq!(ids(blog.find_tagged_with(&["Red", "Blue"]).await.unwrap()), [older]);
        assert_eq!(ids(blog.find_tagged_with(&["Red", "Green"]).await.unwrap()), [newer]);
        assert_eq!(ids(blog.find_tagged_with(&["Blue", "Red", "Blue"]).await.unwrap()), [older]);
        assert!(blog.find_tagged_with(&["Red", "Green", "Blue"]).await.unwrap().is_empty());
        assert!(blog.find_tagged_with(&["Green", "Blue"]).await.unwrap().is_empty());
        assert!(blog.find_tagged_with(&[]).await.unwrap().is_empty());

        let cloud = blog.tag_cloud().await.unwrap();
        let rendered: Vec<String> = cloud.iter().map(ToString::to_string).collect();
        assert_eq!(
            format!("[{}]", rendered.join(", ")),
            "[{tag=Blue, pound=1}, {tag=Green, pound=1}, {tag=Red, pound=2}]"
        );
        assert_eq!(blog.tag_cloud().await.unwrap(), cloud);
    }

    #[tokio::test]
    async fn test_tagging_twice_keeps_one_association() {
        let repos = empty_store();
        let bob = repos
            .users
            .save(User::new("bob@gmail.com", "secret", "Bob"))
            .await
            .unwrap();

        let post = repos
            .posts
            .save(
                Post::new(&bob, "My first post", "Hello world")
                    .tag_it_with("Red")
                    .tag_it_with("Red"),
            )
            .await
            .unwrap();

        let stored = repos.posts.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(stored.tags.len(), 1);
        assert_eq!(repos.posts.tag_cloud().await.unwrap()[0].pound, 1);
    }

    #[tokio::test]
    async fn test_empty_store_queries() {
        let blog = BlogService::new(empty_store());

        assert!(blog.front_post().await.unwrap().is_none());
        assert!(blog.tag_cloud().await.unwrap().is_empty());
        assert!(blog.find_tagged_with(&["Red"]).await.unwrap().is_empty());
        assert!(
            blog.repositories()
                .posts
                .find_by_author_email("nobody@gmail.com")
                .await
                .unwrap()
                .is_empty()
        );
    }
}
