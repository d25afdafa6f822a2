//! Клиентская библиотека для работы с blogicum-server по HTTP.
//!
//! `BlogClient` хранит JWT-токен после `register`/`login` и автоматически
//! использует его в защищённых операциях. Для публичных страниц (публикация,
//! профиль) токен передаётся, если он есть: так автор видит свои скрытые
//! и отложенные публикации.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{BlogClientError, BlogClientResult};
pub use http_client::HttpClient;
pub use models::{
    AuthResponse, Category, CategoryPosts, Comment, NewPost, Post, PostCategory, PostDetail,
    PostPage, PostUpdate, Profile, ProfileUpdate, PublicUser, User,
};

#[derive(Debug, Clone)]
/// Клиент блог-сервиса с хранением токена.
pub struct BlogClient {
    http: HttpClient,
    token: Option<String>,
}

impl BlogClient {
    /// Создаёт клиент для сервера с базовым URL, например `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> BlogClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(base_url)?,
            token: None,
        })
    }

    /// Устанавливает JWT-токен вручную.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Возвращает текущий JWT-токен, если он установлен.
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Очищает сохранённый JWT-токен.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Регистрирует пользователя и сохраняет полученный JWT-токен в клиенте.
    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> BlogClientResult<AuthResponse> {
        let result = self.http.register(username, email, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Выполняет вход пользователя и сохраняет полученный JWT-токен в клиенте.
    pub async fn login(&mut self, username: &str, password: &str) -> BlogClientResult<AuthResponse> {
        let result = self.http.login(username, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Страница ленты опубликованных публикаций.
    ///
    /// Отсутствующая страница даёт первую, номер вне диапазона даёт последнюю.
    pub async fn list_posts(&self, page: Option<u32>) -> BlogClientResult<PostPage> {
        self.http.list_posts(page).await
    }

    /// Публикация с комментариями.
    pub async fn get_post(&self, id: i64) -> BlogClientResult<PostDetail> {
        self.http.get_post(self.get_token(), id).await
    }

    /// Публикации категории по слагу.
    pub async fn category_posts(
        &self,
        slug: &str,
        page: Option<u32>,
    ) -> BlogClientResult<CategoryPosts> {
        self.http.category_posts(slug, page).await
    }

    /// Опубликованные категории.
    pub async fn list_categories(&self) -> BlogClientResult<Vec<Category>> {
        self.http.list_categories().await
    }

    /// Создаёт публикацию.
    ///
    /// Требует установленный JWT-токен.
    pub async fn create_post(&self, post: &NewPost) -> BlogClientResult<Post> {
        let token = self.require_token()?;
        self.http.create_post(token, post).await
    }

    /// Текущие данные публикации для редактирования.
    ///
    /// Не автору возвращается [`BlogClientError::Redirected`].
    pub async fn post_for_edit(&self, id: i64) -> BlogClientResult<Post> {
        let token = self.require_token()?;
        self.http.post_for_edit(token, id).await
    }

    /// Сохраняет изменения публикации.
    ///
    /// Не автору возвращается [`BlogClientError::Redirected`].
    pub async fn update_post(&self, id: i64, update: &PostUpdate) -> BlogClientResult<Post> {
        let token = self.require_token()?;
        self.http.update_post(token, id, update).await
    }

    /// Публикация, ожидающая подтверждения удаления.
    pub async fn post_for_delete(&self, id: i64) -> BlogClientResult<Post> {
        let token = self.require_token()?;
        self.http.post_for_delete(token, id).await
    }

    /// Удаляет публикацию.
    ///
    /// Не автору возвращается [`BlogClientError::Forbidden`].
    pub async fn delete_post(&self, id: i64) -> BlogClientResult<()> {
        let token = self.require_token()?;
        self.http.delete_post(token, id).await
    }

    /// Профиль пользователя и его публикации.
    pub async fn profile(&self, username: &str, page: Option<u32>) -> BlogClientResult<Profile> {
        self.http.profile(self.get_token(), username, page).await
    }

    /// Приватные данные владельца токена.
    pub async fn own_profile(&self, username: &str) -> BlogClientResult<User> {
        let token = self.require_token()?;
        self.http.own_profile(token, username).await
    }

    /// Обновляет профиль владельца токена (сегмент `username` только для адреса).
    pub async fn update_profile(
        &self,
        username: &str,
        update: &ProfileUpdate,
    ) -> BlogClientResult<User> {
        let token = self.require_token()?;
        self.http.update_profile(token, username, update).await
    }

    /// Добавляет комментарий к публикации.
    pub async fn add_comment(&self, post_id: i64, text: &str) -> BlogClientResult<Comment> {
        let token = self.require_token()?;
        self.http.add_comment(token, post_id, text).await
    }

    /// Комментарий для редактирования.
    pub async fn comment_for_edit(&self, post_id: i64, comment_id: i64) -> BlogClientResult<Comment> {
        let token = self.require_token()?;
        self.http.comment_for_edit(token, post_id, comment_id).await
    }

    /// Меняет текст комментария.
    pub async fn edit_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        text: &str,
    ) -> BlogClientResult<Comment> {
        let token = self.require_token()?;
        self.http
            .edit_comment(token, post_id, comment_id, text)
            .await
    }

    /// Комментарий, ожидающий подтверждения удаления.
    pub async fn comment_for_delete(
        &self,
        post_id: i64,
        comment_id: i64,
    ) -> BlogClientResult<Comment> {
        let token = self.require_token()?;
        self.http
            .comment_for_delete(token, post_id, comment_id)
            .await
    }

    /// Удаляет комментарий.
    pub async fn delete_comment(&self, post_id: i64, comment_id: i64) -> BlogClientResult<()> {
        let token = self.require_token()?;
        self.http.delete_comment(token, post_id, comment_id).await
    }

    fn require_token(&self) -> BlogClientResult<&str> {
        self.token.as_deref().ok_or(BlogClientError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn protected_calls_fail_fast_without_token() {
        let client = BlogClient::new("http://127.0.0.1:9").expect("client must build");

        let err = client
            .delete_post(1)
            .await
            .expect_err("token is missing");
        assert!(matches!(err, BlogClientError::Unauthorized));

        let err = client
            .add_comment(1, "hi")
            .await
            .expect_err("token is missing");
        assert!(matches!(err, BlogClientError::Unauthorized));
    }

    #[test]
    fn token_can_be_set_and_cleared() {
        let mut client = BlogClient::new("http://127.0.0.1:8080").expect("client must build");
        assert!(client.get_token().is_none());

        client.set_token("abc");
        assert_eq!(client.get_token(), Some("abc"));

        client.clear_token();
        assert!(client.get_token().is_none());
    }
}
