use reqwest::{Client, Method, RequestBuilder, Response, header, redirect};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{BlogClientError, BlogClientResult};
use crate::models::{
    AuthResponse, Category, CategoryPosts, Comment, NewPost, Post, PostDetail, PostPage,
    PostUpdate, Profile, ProfileUpdate, User,
};

#[derive(Debug, Serialize)]
struct RegisterRequestDto<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequestDto<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CommentRequestDto<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для работы с REST API `blogicum-server`.
///
/// Перенаправления не выполняются: ответ `303 See Other` превращается в
/// [`BlogClientError::Redirected`].
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт новый HTTP-клиент с базовым URL сервера.
    pub fn new(base_url: impl Into<String>) -> BlogClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_error(response: Response) -> BlogClientError {
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body.error,
            Err(_) => None,
        };
        BlogClientError::from_http_status(status, message, location)
    }

    async fn execute(request: RequestBuilder) -> BlogClientResult<Response> {
        let response = request
            .send()
            .await
            .map_err(BlogClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response)
    }

    /// отправка запроса с разбором json-ответа
    async fn fetch<TRes>(request: RequestBuilder) -> BlogClientResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        Self::execute(request)
            .await?
            .json::<TRes>()
            .await
            .map_err(BlogClientError::from_reqwest)
    }

    async fn send_json<TReq, TRes>(
        &self,
        method: Method,
        path: &str,
        body: &TReq,
        token: Option<&str>,
    ) -> BlogClientResult<TRes>
    where
        TReq: Serialize + ?Sized,
        TRes: DeserializeOwned,
    {
        Self::fetch(self.request(method, path, token).json(body)).await
    }

    async fn get<TRes>(
        &self,
        path: &str,
        page: Option<u32>,
        token: Option<&str>,
    ) -> BlogClientResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        let request = self
            .request(Method::GET, path, token)
            .query(&PageQuery { page });
        Self::fetch(request).await
    }

    /// Регистрирует пользователя и возвращает JWT + данные пользователя.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> BlogClientResult<AuthResponse> {
        let payload = RegisterRequestDto {
            username,
            email,
            password,
        };
        self.send_json(Method::POST, "/api/auth/register", &payload, None)
            .await
    }

    /// Выполняет авторизацию пользователя и возвращает JWT + данные пользователя.
    pub async fn login(&self, username: &str, password: &str) -> BlogClientResult<AuthResponse> {
        let payload = LoginRequestDto { username, password };
        self.send_json(Method::POST, "/api/auth/login", &payload, None)
            .await
    }

    /// Лента опубликованных публикаций.
    pub async fn list_posts(&self, page: Option<u32>) -> BlogClientResult<PostPage> {
        self.get("/api/posts", page, None).await
    }

    /// Публикация с комментариями. С токеном автор видит и свои скрытые публикации.
    pub async fn get_post(&self, token: Option<&str>, id: i64) -> BlogClientResult<PostDetail> {
        self.get(&format!("/api/posts/{id}"), None, token).await
    }

    /// Публикации опубликованной категории.
    pub async fn category_posts(
        &self,
        slug: &str,
        page: Option<u32>,
    ) -> BlogClientResult<CategoryPosts> {
        self.get(&format!("/api/category/{slug}"), page, None).await
    }

    /// Список опубликованных категорий.
    pub async fn list_categories(&self) -> BlogClientResult<Vec<Category>> {
        self.get("/api/categories", None, None).await
    }

    /// Создаёт публикацию от имени владельца токена.
    pub async fn create_post(&self, token: &str, post: &NewPost) -> BlogClientResult<Post> {
        self.send_json(Method::POST, "/api/posts/create", post, Some(token))
            .await
    }

    /// Текущие данные публикации для редактирования (только автор).
    pub async fn post_for_edit(&self, token: &str, id: i64) -> BlogClientResult<Post> {
        self.get(&format!("/api/posts/{id}/edit"), None, Some(token))
            .await
    }

    /// Сохраняет изменения публикации (только автор).
    pub async fn update_post(
        &self,
        token: &str,
        id: i64,
        update: &PostUpdate,
    ) -> BlogClientResult<Post> {
        self.send_json(
            Method::POST,
            &format!("/api/posts/{id}/edit"),
            update,
            Some(token),
        )
        .await
    }

    /// Публикация, ожидающая подтверждения удаления (только автор).
    pub async fn post_for_delete(&self, token: &str, id: i64) -> BlogClientResult<Post> {
        self.get(&format!("/api/posts/{id}/delete"), None, Some(token))
            .await
    }

    /// Удаляет публикацию вместе с комментариями (только автор).
    pub async fn delete_post(&self, token: &str, id: i64) -> BlogClientResult<()> {
        let request = self.request(Method::POST, &format!("/api/posts/{id}/delete"), Some(token));
        Self::execute(request).await?;
        Ok(())
    }

    /// Профиль пользователя и его публикации.
    pub async fn profile(
        &self,
        token: Option<&str>,
        username: &str,
        page: Option<u32>,
    ) -> BlogClientResult<Profile> {
        self.get(&format!("/api/profile/{username}"), page, token)
            .await
    }

    /// Приватные данные владельца токена.
    pub async fn own_profile(&self, token: &str, username: &str) -> BlogClientResult<User> {
        self.get(&format!("/api/profile/{username}/edit"), None, Some(token))
            .await
    }

    /// Обновляет профиль владельца токена.
    pub async fn update_profile(
        &self,
        token: &str,
        username: &str,
        update: &ProfileUpdate,
    ) -> BlogClientResult<User> {
        self.send_json(
            Method::POST,
            &format!("/api/profile/{username}/edit"),
            update,
            Some(token),
        )
        .await
    }

    /// Добавляет комментарий к публикации.
    pub async fn add_comment(
        &self,
        token: &str,
        post_id: i64,
        text: &str,
    ) -> BlogClientResult<Comment> {
        self.send_json(
            Method::POST,
            &format!("/api/posts/{post_id}/comment"),
            &CommentRequestDto { text },
            Some(token),
        )
        .await
    }

    /// Комментарий для редактирования (только автор).
    pub async fn comment_for_edit(
        &self,
        token: &str,
        post_id: i64,
        comment_id: i64,
    ) -> BlogClientResult<Comment> {
        self.get(
            &format!("/api/posts/{post_id}/edit_comment/{comment_id}"),
            None,
            Some(token),
        )
        .await
    }

    /// Меняет текст комментария (только автор).
    pub async fn edit_comment(
        &self,
        token: &str,
        post_id: i64,
        comment_id: i64,
        text: &str,
    ) -> BlogClientResult<Comment> {
        self.send_json(
            Method::POST,
            &format!("/api/posts/{post_id}/edit_comment/{comment_id}"),
            &CommentRequestDto { text },
            Some(token),
        )
        .await
    }

    /// Комментарий, ожидающий подтверждения удаления (только автор).
    pub async fn comment_for_delete(
        &self,
        token: &str,
        post_id: i64,
        comment_id: i64,
    ) -> BlogClientResult<Comment> {
        self.get(
            &format!("/api/posts/{post_id}/delete_comment/{comment_id}"),
            None,
            Some(token),
        )
        .await
    }

    /// Удаляет комментарий (только автор).
    pub async fn delete_comment(
        &self,
        token: &str,
        post_id: i64,
        comment_id: i64,
    ) -> BlogClientResult<()> {
        let request = self.request(
            Method::POST,
            &format!("/api/posts/{post_id}/delete_comment/{comment_id}"),
            Some(token),
        );
        Self::execute(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_normalizes_slashes() {
        let client = HttpClient::new("http://localhost:8080/").expect("client must build");
        let full = client.endpoint("/api/posts");
        assert_eq!(full, "http://localhost:8080/api/posts");
    }

    #[test]
    fn page_query_is_omitted_when_unset() {
        let client = HttpClient::new("http://localhost:8080").expect("client must build");

        let without = client
            .request(Method::GET, "/api/posts", None)
            .query(&PageQuery { page: None })
            .build()
            .expect("request must build");
        assert_eq!(without.url().query(), None);

        let with = client
            .request(Method::GET, "/api/posts", None)
            .query(&PageQuery { page: Some(3) })
            .build()
            .expect("request must build");
        assert_eq!(with.url().query(), Some("page=3"));
    }

    #[test]
    fn bearer_token_is_attached_only_when_given() {
        let client = HttpClient::new("http://localhost:8080").expect("client must build");

        let anonymous = client
            .request(Method::GET, "/api/posts/1", None)
            .build()
            .expect("request must build");
        assert!(anonymous.headers().get(header::AUTHORIZATION).is_none());

        let authorized = client
            .request(Method::GET, "/api/posts/1", Some("abc"))
            .build()
            .expect("request must build");
        assert_eq!(
            authorized
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok()),
            Some("Bearer abc")
        );
    }

    #[test]
    fn post_page_decodes_server_payload() {
        let raw = r#"{
            "posts": [{
                "id": 5,
                "title": "Day one",
                "text": "Walked to the lake",
                "pub_date": "2025-03-01T10:00:00Z",
                "author_id": 2,
                "author_username": "anna",
                "category": {"id": 1, "slug": "travel", "title": "Travel"},
                "is_published": true,
                "comment_count": 3,
                "created_at": "2025-03-01T09:00:00Z",
                "updated_at": "2025-03-01T09:30:00Z"
            }],
            "page": 1,
            "num_pages": 1,
            "per_page": 10,
            "total": 1,
            "has_next": false,
            "has_previous": false
        }"#;

        let page: PostPage = serde_json::from_str(raw).expect("payload must decode");
        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].comment_count, 3);
        assert_eq!(
            page.posts[0].category.as_ref().map(|c| c.slug.as_str()),
            Some("travel")
        );
    }

    #[test]
    fn new_post_omits_missing_pub_date() {
        let post = NewPost {
            title: "t".to_string(),
            text: "x".to_string(),
            pub_date: None,
            category_id: None,
            is_published: true,
        };
        let value = serde_json::to_value(&post).expect("must serialize");
        assert!(value.get("pub_date").is_none());
        assert_eq!(value["category_id"], serde_json::Value::Null);
    }
}
