use tracing::{info, warn};

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::infrastructure::jwt::JwtService;
use crate::infrastructure::password::{PasswordError, Passwords};

#[derive(Debug, Clone)]
pub(crate) struct AuthResult {
    pub(crate) user: User,
    pub(crate) access_token: String,
}

pub(crate) struct AuthService<R: UserRepository> {
    users: R,
    jwt: JwtService,
    passwords: Passwords,
}

impl<R: UserRepository> AuthService<R> {
    pub(crate) fn new(users: R, jwt: JwtService) -> Self {
        Self {
            users,
            jwt,
            passwords: Passwords::default(),
        }
    }

    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;
        let password_hash = self.passwords.hash(&req.password).map_err(unexpected)?;

        let user = self
            .users
            .create_user(NewUser {
                username: req.username,
                email: req.email,
                first_name: req.first_name,
                last_name: req.last_name,
                password_hash,
            })
            .await?;
        info!(user_id = user.id, username = %user.username, "user registered");

        self.issue(user)
    }

    /// Unknown usernames and wrong passwords are indistinguishable to the caller.
    pub(crate) async fn login(&self, req: LoginRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        let Some(credentials) = self.users.find_by_username(&req.username).await? else {
            self.passwords.verify_dummy(&req.password);
            warn!(username = %req.username, "login attempt for unknown user");
            return Err(DomainError::InvalidCredentials);
        };

        let matches = self
            .passwords
            .verify(&req.password, &credentials.password_hash)
            .map_err(unexpected)?;
        if !matches {
            warn!(user_id = credentials.user.id, "login with wrong password");
            return Err(DomainError::InvalidCredentials);
        }
        info!(user_id = credentials.user.id, "user logged in");

        self.issue(credentials.user)
    }

    fn issue(&self, user: User) -> Result<AuthResult, DomainError> {
        let access_token = self
            .jwt
            .generate_token(user.id, &user.username)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(AuthResult { user, access_token })
    }
}

fn unexpected(err: PasswordError) -> DomainError {
    DomainError::Unexpected(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::AuthService;
    use crate::application::fakes::{FakeUserRepo, sample_user};
    use crate::data::user_repository::UserCredentials;
    use crate::domain::error::DomainError;
    use crate::domain::user::{LoginRequest, RegisterRequest};
    use crate::infrastructure::jwt::JwtService;
    use crate::infrastructure::password::Passwords;

    #[tokio::test]
    async fn register_creates_user_and_returns_token() {
        let repo = FakeUserRepo::default();
        let service = AuthService::new(repo.clone(), test_jwt());

        let req = RegisterRequest {
            username: "  valid_user  ".to_string(),
            email: "  VALID@EXAMPLE.COM  ".to_string(),
            password: "very-secure-password".to_string(),
            first_name: " Lev ".to_string(),
            last_name: "Tolstoy".to_string(),
        };

        let result = service.register(req).await.expect("register must succeed");

        assert_eq!(result.user.username, "valid_user");
        assert_eq!(result.user.first_name, "Lev");
        assert!(!result.access_token.is_empty());

        let created = repo
            .take_created_input()
            .expect("create_user must be called");
        assert_eq!(created.username, "valid_user");
        assert_eq!(created.email, "valid@example.com");
        assert_eq!(created.last_name, "Tolstoy");
        assert!(created.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_username() {
        let repo = FakeUserRepo::with_users(vec![sample_user(1, "valid_user")]);
        let service = AuthService::new(repo, test_jwt());

        let req = RegisterRequest {
            username: "valid_user".to_string(),
            email: "other@example.com".to_string(),
            password: "very-secure-password".to_string(),
            first_name: String::new(),
            last_name: String::new(),
        };

        let err = service.register(req).await.expect_err("must conflict");
        assert!(matches!(err, DomainError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn login_returns_invalid_credentials_for_missing_user() {
        let service = AuthService::new(FakeUserRepo::default(), test_jwt());

        let req = LoginRequest {
            username: "valid_user".to_string(),
            password: "some-password".to_string(),
        };

        let err = service.login(req).await.expect_err("login must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_returns_invalid_credentials_for_wrong_password() {
        let repo = FakeUserRepo::default();
        let service = AuthService::new(repo.clone(), test_jwt());

        let hash = Passwords::default()
            .hash("correct-password")
            .expect("hash must be created");
        repo.set_credentials(UserCredentials {
            user: sample_user(1, "valid_user"),
            password_hash: hash,
        });

        let req = LoginRequest {
            username: "valid_user".to_string(),
            password: "wrong-password".to_string(),
        };

        let err = service.login(req).await.expect_err("login must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_returns_token_for_valid_credentials() {
        let repo = FakeUserRepo::default();
        let jwt = test_jwt();
        let service = AuthService::new(repo.clone(), test_jwt());

        let hash = Passwords::default()
            .hash("correct-password")
            .expect("hash must be created");
        repo.set_credentials(UserCredentials {
            user: sample_user(1, "valid_user"),
            password_hash: hash,
        });

        let req = LoginRequest {
            username: "valid_user".to_string(),
            password: "correct-password".to_string(),
        };

        let result = service.login(req).await.expect("login must succeed");
        assert_eq!(result.user.id, 1);

        let claims = jwt
            .verify_token(&result.access_token)
            .expect("token must be verifiable");
        assert_eq!(claims.user_id, 1);
        assert_eq!(claims.username, "valid_user");
    }

    fn test_jwt() -> JwtService {
        JwtService::new("0123456789abcdef0123456789abcdef", 3600)
    }
}
