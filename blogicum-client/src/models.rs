use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Пользователь с приватными полями (доступен только ему самому).
pub struct User {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Логин.
    pub username: String,
    /// Email.
    pub email: String,
    /// Имя.
    pub first_name: String,
    /// Фамилия.
    pub last_name: String,
    /// Дата и время регистрации (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публичная карточка пользователя на странице профиля.
pub struct PublicUser {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Логин.
    pub username: String,
    /// Полное имя (может быть пустым).
    pub full_name: String,
    /// Дата и время регистрации (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Ответ после успешной регистрации или входа.
pub struct AuthResponse {
    /// JWT access token.
    pub access_token: String,
    /// Данные пользователя.
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Краткие сведения о категории внутри публикации.
pub struct PostCategory {
    /// Идентификатор категории.
    pub id: i64,
    /// Слаг категории.
    pub slug: String,
    /// Название категории.
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публикация.
pub struct Post {
    /// Идентификатор публикации.
    pub id: i64,
    /// Заголовок.
    pub title: String,
    /// Текст.
    pub text: String,
    /// Дата публикации; будущая дата означает отложенную публикацию.
    pub pub_date: DateTime<Utc>,
    /// Идентификатор автора.
    pub author_id: i64,
    /// Логин автора.
    pub author_username: String,
    /// Категория, если назначена.
    pub category: Option<PostCategory>,
    /// Флаг публикации.
    pub is_published: bool,
    /// Количество комментариев.
    pub comment_count: i64,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего изменения (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Страница ленты публикаций (по 10 на страницу).
pub struct PostPage {
    /// Публикации текущей страницы.
    pub posts: Vec<Post>,
    /// Номер страницы, начиная с 1.
    pub page: u32,
    /// Общее число страниц (не меньше 1).
    pub num_pages: u32,
    /// Размер страницы.
    pub per_page: u32,
    /// Общее количество публикаций.
    pub total: i64,
    /// Есть ли следующая страница.
    pub has_next: bool,
    /// Есть ли предыдущая страница.
    pub has_previous: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Комментарий к публикации.
pub struct Comment {
    /// Идентификатор комментария.
    pub id: i64,
    /// Текст.
    pub text: String,
    /// Публикация, к которой относится комментарий.
    pub post_id: i64,
    /// Идентификатор автора.
    pub author_id: i64,
    /// Логин автора.
    pub author_username: String,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публикация вместе с комментариями (от старых к новым).
pub struct PostDetail {
    /// Публикация.
    pub post: Post,
    /// Комментарии.
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Опубликованная категория.
pub struct Category {
    /// Идентификатор категории.
    pub id: i64,
    /// Название.
    pub title: String,
    /// Описание.
    pub description: String,
    /// Слаг.
    pub slug: String,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Категория и страница её публикаций.
pub struct CategoryPosts {
    /// Категория.
    pub category: Category,
    /// Страница публикаций.
    pub posts: PostPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Страница профиля.
pub struct Profile {
    /// Владелец профиля.
    pub user: PublicUser,
    /// Смотрит ли владелец собственный профиль.
    pub is_owner: bool,
    /// Публикации владельца.
    pub posts: PostPage,
}

#[derive(Debug, Clone, Serialize)]
/// Данные для создания публикации.
pub struct NewPost {
    /// Заголовок.
    pub title: String,
    /// Текст.
    pub text: String,
    /// Дата публикации; по умолчанию момент создания.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<DateTime<Utc>>,
    /// Категория.
    pub category_id: Option<i64>,
    /// Флаг публикации.
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize)]
/// Полный набор полей публикации для редактирования.
pub struct PostUpdate {
    /// Заголовок.
    pub title: String,
    /// Текст.
    pub text: String,
    /// Дата публикации.
    pub pub_date: DateTime<Utc>,
    /// Категория.
    pub category_id: Option<i64>,
    /// Флаг публикации.
    pub is_published: bool,
}

impl From<Post> for PostUpdate {
    fn from(post: Post) -> Self {
        Self {
            title: post.title,
            text: post.text,
            pub_date: post.pub_date,
            category_id: post.category.map(|category| category.id),
            is_published: post.is_published,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
/// Новые данные профиля.
pub struct ProfileUpdate {
    /// Логин.
    pub username: String,
    /// Email.
    pub email: String,
    /// Имя.
    pub first_name: String,
    /// Фамилия.
    pub last_name: String,
}

impl From<User> for ProfileUpdate {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}
