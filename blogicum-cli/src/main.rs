use std::fs;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use blogicum_client::{
    AuthResponse, BlogClient, BlogClientError, Category, Comment, NewPost, Post, PostDetail,
    PostPage, PostUpdate, Profile, ProfileUpdate, User,
};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

const TOKEN_FILE: &str = ".blog_token";
const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";
const SERVER_ENV: &str = "BLOG_SERVER";

#[derive(Debug, Parser)]
#[command(name = "blogicum-cli", version, about = "CLI клиент для blogicum-server")]
struct Cli {
    /// Адрес сервера (по умолчанию BLOG_SERVER или http://127.0.0.1:8080).
    #[arg(long, global = true)]
    server: Option<String>,

    /// Печатать ответы сервера в JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Вход пользователя.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Лента опубликованных публикаций.
    List {
        #[arg(long)]
        page: Option<u32>,
    },
    /// Публикация с комментариями.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Публикации категории.
    Category {
        #[arg(long)]
        slug: String,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Список опубликованных категорий.
    Categories,
    /// Создание публикации (требует токен).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        text: String,
        /// Дата публикации в RFC 3339, например 2025-03-01T10:00:00Z.
        #[arg(long)]
        pub_date: Option<DateTime<Utc>>,
        #[arg(long)]
        category_id: Option<i64>,
        /// Сохранить как черновик (не публиковать).
        #[arg(long)]
        draft: bool,
    },
    /// Редактирование публикации (требует токен).
    ///
    /// Не указанные поля сохраняют текущие значения.
    Edit {
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        changes: PostChanges,
    },
    /// Удаление публикации (требует токен).
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Профиль пользователя.
    Profile {
        #[arg(long)]
        username: String,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Редактирование своего профиля (требует токен).
    ///
    /// Не указанные поля сохраняют текущие значения.
    EditProfile {
        /// Текущий логин (используется в адресе запроса).
        #[arg(long)]
        username: String,
        #[command(flatten)]
        changes: ProfileChanges,
    },
    /// Добавление комментария (требует токен).
    Comment {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        text: String,
    },
    /// Редактирование комментария (требует токен).
    EditComment {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        comment_id: i64,
        #[arg(long)]
        text: String,
    },
    /// Удаление комментария (требует токен).
    DeleteComment {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        comment_id: i64,
    },
}

#[derive(Debug, Default, Args)]
struct PostChanges {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    text: Option<String>,
    #[arg(long)]
    pub_date: Option<DateTime<Utc>>,
    #[arg(long, conflicts_with = "no_category")]
    category_id: Option<i64>,
    /// Убрать категорию у публикации.
    #[arg(long)]
    no_category: bool,
    /// Опубликовать (true) или скрыть (false).
    #[arg(long)]
    published: Option<bool>,
}

impl PostChanges {
    fn apply(self, mut update: PostUpdate) -> PostUpdate {
        if let Some(title) = self.title {
            update.title = title;
        }
        if let Some(text) = self.text {
            update.text = text;
        }
        if let Some(pub_date) = self.pub_date {
            update.pub_date = pub_date;
        }
        if self.no_category {
            update.category_id = None;
        } else if let Some(category_id) = self.category_id {
            update.category_id = Some(category_id);
        }
        if let Some(published) = self.published {
            update.is_published = published;
        }
        update
    }
}

#[derive(Debug, Default, Args)]
struct ProfileChanges {
    #[arg(long)]
    new_username: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
}

impl ProfileChanges {
    fn apply(self, mut update: ProfileUpdate) -> ProfileUpdate {
        if let Some(username) = self.new_username {
            update.username = username;
        }
        if let Some(email) = self.email {
            update.email = email;
        }
        if let Some(first_name) = self.first_name {
            update.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            update.last_name = last_name;
        }
        update
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = resolve_server(cli.server, std::env::var(SERVER_ENV).ok());
    let mut client = BlogClient::new(server).map_err(map_client_error)?;

    if let Some(token) = load_token().context("не удалось прочитать .blog_token")? {
        client.set_token(token);
    }

    let json = cli.json;
    match cli.command {
        Command::Register {
            username,
            email,
            password,
        } => {
            let auth = client
                .register(&username, &email, &password)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("не удалось сохранить токен")?;
            emit(json, &auth, |auth| print_auth("Регистрация успешна", auth))?;
        }
        Command::Login { username, password } => {
            let auth = client
                .login(&username, &password)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("не удалось сохранить токен")?;
            emit(json, &auth, |auth| print_auth("Вход выполнен", auth))?;
        }
        Command::List { page } => {
            let page = client.list_posts(page).await.map_err(map_client_error)?;
            emit(json, &page, |page| print_page("Лента", page))?;
        }
        Command::Get { id } => {
            let detail = client.get_post(id).await.map_err(map_client_error)?;
            emit(json, &detail, print_detail)?;
        }
        Command::Category { slug, page } => {
            let result = client
                .category_posts(&slug, page)
                .await
                .map_err(map_client_error)?;
            emit(json, &result, |result| {
                print_page(&format!("Категория «{}»", result.category.title), &result.posts)
            })?;
        }
        Command::Categories => {
            let categories = client.list_categories().await.map_err(map_client_error)?;
            emit(json, &categories, |categories| print_categories(categories))?;
        }
        Command::Create {
            title,
            text,
            pub_date,
            category_id,
            draft,
        } => {
            let new_post = NewPost {
                title,
                text,
                pub_date,
                category_id,
                is_published: !draft,
            };
            let post = client
                .create_post(&new_post)
                .await
                .map_err(map_client_error)?;
            emit(json, &post, |post| print_post("Публикация создана", post))?;
        }
        Command::Edit { id, changes } => {
            let current = client.post_for_edit(id).await.map_err(map_client_error)?;
            let update = changes.apply(PostUpdate::from(current));
            let post = client
                .update_post(id, &update)
                .await
                .map_err(map_client_error)?;
            emit(json, &post, |post| print_post("Публикация обновлена", post))?;
        }
        Command::Delete { id } => {
            client.delete_post(id).await.map_err(map_client_error)?;
            println!("Публикация удалена: id={id}");
        }
        Command::Profile { username, page } => {
            let profile = client
                .profile(&username, page)
                .await
                .map_err(map_client_error)?;
            emit(json, &profile, print_profile)?;
        }
        Command::EditProfile { username, changes } => {
            let current = client
                .own_profile(&username)
                .await
                .map_err(map_client_error)?;
            let update = changes.apply(ProfileUpdate::from(current));
            let user = client
                .update_profile(&username, &update)
                .await
                .map_err(map_client_error)?;
            emit(json, &user, |user| print_user("Профиль обновлён", user))?;
        }
        Command::Comment { post_id, text } => {
            let comment = client
                .add_comment(post_id, &text)
                .await
                .map_err(map_client_error)?;
            emit(json, &comment, |comment| {
                print_comment("Комментарий добавлен", comment)
            })?;
        }
        Command::EditComment {
            post_id,
            comment_id,
            text,
        } => {
            let comment = client
                .edit_comment(post_id, comment_id, &text)
                .await
                .map_err(map_client_error)?;
            emit(json, &comment, |comment| {
                print_comment("Комментарий изменён", comment)
            })?;
        }
        Command::DeleteComment {
            post_id,
            comment_id,
        } => {
            client
                .delete_comment(post_id, comment_id)
                .await
                .map_err(map_client_error)?;
            println!("Комментарий удалён: id={comment_id}");
        }
    }

    Ok(())
}

fn resolve_server(flag: Option<String>, env: Option<String>) -> String {
    let raw = flag
        .or(env)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    normalize_server(raw.trim().to_string())
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn parse_token_content(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn load_token() -> io::Result<Option<String>> {
    if !Path::new(TOKEN_FILE).exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(TOKEN_FILE)?;
    Ok(parse_token_content(&raw))
}

fn persist_token(client: &BlogClient) -> io::Result<()> {
    if let Some(token) = client.get_token() {
        fs::write(TOKEN_FILE, token)?;
    }
    Ok(())
}

fn map_client_error(err: BlogClientError) -> anyhow::Error {
    let message = match err {
        BlogClientError::Unauthorized => {
            "требуется авторизация: выполните `blogicum-cli login ...` или `blogicum-cli register ...`"
                .to_string()
        }
        BlogClientError::Forbidden => "операция доступна только автору".to_string(),
        BlogClientError::NotFound => "ресурс не найден".to_string(),
        BlogClientError::Redirected { location } => {
            format!("изменять можно только свои записи, см. {location}")
        }
        BlogClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        BlogClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow::anyhow!(message)
}

fn emit<T: Serialize>(json: bool, value: &T, human: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human(value);
    }
    Ok(())
}

fn print_user(title: &str, user: &User) {
    println!("{title}");
    println!("  id: {}", user.id);
    println!("  username: {}", user.username);
    println!("  email: {}", user.email);
    println!("  first_name: {}", user.first_name);
    println!("  last_name: {}", user.last_name);
    println!("  created_at: {}", user.created_at);
}

fn print_auth(title: &str, auth: &AuthResponse) {
    println!("token: {}", auth.access_token);
    print_user(title, &auth.user);
}

fn post_line(post: &Post) -> String {
    let category = post
        .category
        .as_ref()
        .map(|category| category.slug.as_str())
        .unwrap_or("-");
    format!(
        "- [{}] {} (@{}, {}, {}, комментариев: {})",
        post.id,
        post.title,
        post.author_username,
        category,
        post.pub_date.format("%Y-%m-%d %H:%M"),
        post.comment_count
    )
}

fn print_post(title: &str, post: &Post) {
    println!("{title}");
    println!("id: {}", post.id);
    println!("title: {}", post.title);
    println!("text: {}", post.text);
    println!("author: {} (id={})", post.author_username, post.author_id);
    if let Some(category) = &post.category {
        println!("category: {} ({})", category.title, category.slug);
    }
    println!("pub_date: {}", post.pub_date);
    println!("is_published: {}", post.is_published);
    println!("updated_at: {}", post.updated_at);
}

fn print_page(title: &str, page: &PostPage) {
    println!(
        "{title}: страница {}/{} (всего {})",
        page.page, page.num_pages, page.total
    );
    for post in &page.posts {
        println!("{}", post_line(post));
    }
}

fn print_comment(title: &str, comment: &Comment) {
    println!("{title}");
    println!(
        "[{}] @{} {}: {}",
        comment.id, comment.author_username, comment.created_at, comment.text
    );
}

fn print_detail(detail: &PostDetail) {
    print_post("Публикация", &detail.post);
    println!("Комментарии: {}", detail.comments.len());
    for comment in &detail.comments {
        println!(
            "  [{}] @{}: {}",
            comment.id, comment.author_username, comment.text
        );
    }
}

fn print_categories(categories: &[Category]) {
    println!("Категорий: {}", categories.len());
    for category in categories {
        println!("- {} ({}): {}", category.title, category.slug, category.description);
    }
}

fn print_profile(profile: &Profile) {
    let name = if profile.user.full_name.is_empty() {
        profile.user.username.as_str()
    } else {
        profile.user.full_name.as_str()
    };
    println!("Профиль @{} ({name})", profile.user.username);
    print_page("Публикации", &profile.posts);
}
