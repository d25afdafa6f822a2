use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `blogicum-client`.
pub enum BlogClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Требуется авторизация (отсутствует/некорректен токен).
    #[error("unauthorized")]
    Unauthorized,

    /// Операция запрещена для текущего пользователя.
    #[error("forbidden")]
    Forbidden,

    /// Запрошенный ресурс не найден.
    #[error("not found")]
    NotFound,

    /// Сервер перенаправил запрос: изменять чужие публикации и комментарии нельзя.
    #[error("redirected to {location}")]
    Redirected {
        /// Значение заголовка `Location`.
        location: String,
    },

    /// Некорректный запрос, конфликт или бизнес-ошибка валидации.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Результат операций `blogicum-client`.
pub type BlogClientResult<T> = Result<T, BlogClientError>;

impl BlogClientError {
    pub(crate) fn from_http_status(
        status: reqwest::StatusCode,
        message: Option<String>,
        location: Option<String>,
    ) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED => Self::Unauthorized,
            reqwest::StatusCode::FORBIDDEN => Self::Forbidden,
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            status if status.is_redirection() => Self::Redirected {
                location: location.unwrap_or_default(),
            },
            _ => {
                let message = message.unwrap_or_else(|| format!("http status {status}"));
                Self::InvalidRequest(message)
            }
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None, None);
        }
        Self::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::BlogClientError;

    #[test]
    fn statuses_map_to_variants() {
        assert!(matches!(
            BlogClientError::from_http_status(StatusCode::UNAUTHORIZED, None, None),
            BlogClientError::Unauthorized
        ));
        assert!(matches!(
            BlogClientError::from_http_status(StatusCode::FORBIDDEN, None, None),
            BlogClientError::Forbidden
        ));
        assert!(matches!(
            BlogClientError::from_http_status(StatusCode::NOT_FOUND, None, None),
            BlogClientError::NotFound
        ));
    }

    #[test]
    fn see_other_keeps_location() {
        let err = BlogClientError::from_http_status(
            StatusCode::SEE_OTHER,
            Some("not the author".to_string()),
            Some("/api/posts/7".to_string()),
        );
        match err {
            BlogClientError::Redirected { location } => assert_eq!(location, "/api/posts/7"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn conflict_carries_server_message() {
        let err = BlogClientError::from_http_status(
            StatusCode::CONFLICT,
            Some("resource already exists: username".to_string()),
            None,
        );
        match err {
            BlogClientError::InvalidRequest(message) => {
                assert_eq!(message, "resource already exists: username")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
