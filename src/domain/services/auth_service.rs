use std::sync::Arc;
use crate::domain::{
    models::{
        identity::{normalize_email, Claims, Identity, RefreshTokenRecord, Session, SessionUser, TokenPair},
        profile::{Profile, UserType},
    },
    ports::{AuthRepository, IdentityRepository, ProfileRepository},
    services::events::{EventBus, SessionEvent},
};
use crate::error::AppError;
use crate::config::Config;
use argon2::{password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString}, Argon2};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use sha2::{Sha256, Digest};
use tokio::sync::broadcast;
use tracing::{error, info};

pub const AUDIENCE: &str = "futcerto-frontend";
const ACCESS_TTL_MINUTES: i64 = 15;
const REFRESH_TTL_DAYS: i64 = 7;
const MIN_PASSWORD_LEN: usize = 6;

pub struct SignUpData {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub user_type: UserType,
}

pub struct SignedIn {
    pub tokens: TokenPair,
    pub user: SessionUser,
    pub profile: Option<Profile>,
}

/// Identity and session provider: password auth, JWT access tokens,
/// rotating refresh tokens, and session-change notifications.
pub struct AuthService {
    identities: Arc<dyn IdentityRepository>,
    profiles: Arc<dyn ProfileRepository>,
    repo: Arc<dyn AuthRepository>,
    events: EventBus,
    issuer: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(
        identities: Arc<dyn IdentityRepository>,
        profiles: Arc<dyn ProfileRepository>,
        repo: Arc<dyn AuthRepository>,
        events: EventBus,
        config: &Config,
    ) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_secret_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT private key PEM: {e}")))?;
        let decoding_key = DecodingKey::from_ed_pem(config.jwt_public_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT public key PEM: {e}")))?;

        Ok(Self {
            identities,
            profiles,
            repo,
            events,
            issuer: config.auth_issuer.clone(),
            encoding_key,
            decoding_key,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe_sessions()
    }

    pub async fn sign_up(&self, data: SignUpData) -> Result<SignedIn, AppError> {
        let email = normalize_email(&data.email);
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(AppError::Validation("E-mail inválido.".into()));
        }
        if data.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!("A senha deve ter pelo menos {MIN_PASSWORD_LEN} caracteres.")));
        }
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Nome é obrigatório.".into()));
        }

        if self.identities.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("E-mail já cadastrado.".into()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(data.password.as_bytes(), &salt)
            .map_err(|_| AppError::Internal)?
            .to_string();

        let identity = self.identities.create(&Identity::new(email, password_hash)).await?;

        let profile = Profile {
            id: identity.id.clone(),
            name,
            email: identity.email.clone(),
            phone: data.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
            user_type: data.user_type,
        };
        // An identity without a profile could never book nor sign up again; undo it.
        let profile = match self.profiles.insert(&profile).await {
            Ok(profile) => profile,
            Err(e) => {
                error!(identity_id = %identity.id, "Profile creation failed, removing identity: {}", e);
                if let Err(cleanup) = self.identities.delete(&identity.id).await {
                    error!(identity_id = %identity.id, "Identity cleanup failed: {}", cleanup);
                }
                return Err(e);
            }
        };

        let user = SessionUser { id: identity.id.clone(), email: identity.email.clone() };
        let tokens = self.issue_token_pair(&identity, Uuid::new_v4()).await?;

        info!(identity_id = %identity.id, user_type = %profile.user_type, "Identity signed up");
        self.events.publish_session(SessionEvent::SignedUp(user.clone()));

        Ok(SignedIn { tokens, user, profile: Some(profile) })
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, AppError> {
        let identity = self.identities.find_by_email(&normalize_email(email)).await?
            .ok_or(AppError::Unauthorized)?;

        let parsed_hash = PasswordHash::new(&identity.password_hash)
            .map_err(|_| AppError::Internal)?;

        Argon2::default().verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AppError::Unauthorized)?;

        let tokens = self.issue_token_pair(&identity, Uuid::new_v4()).await?;
        let profile = self.profiles.find_by_id(&identity.id).await?;
        let user = SessionUser { id: identity.id.clone(), email: identity.email.clone() };

        info!(identity_id = %identity.id, "Identity signed in");
        self.events.publish_session(SessionEvent::SignedIn(user.clone()));

        Ok(SignedIn { tokens, user, profile })
    }

    pub async fn refresh(&self, raw_refresh_token: &str) -> Result<SignedIn, AppError> {
        let token_hash = self.hash_token(raw_refresh_token);

        let record = self.repo.take_refresh_token(&token_hash).await?
            .ok_or(AppError::Unauthorized)?;

        if record.expires_at < Utc::now() {
            return Err(AppError::Unauthorized);
        }

        let identity = self.identities.find_by_id(&record.identity_id).await?
            .ok_or(AppError::Unauthorized)?;

        let tokens = self.issue_token_pair(&identity, record.family_id).await?;
        let profile = self.profiles.find_by_id(&identity.id).await?;
        let user = SessionUser { id: identity.id.clone(), email: identity.email.clone() };

        self.events.publish_session(SessionEvent::Refreshed(user.clone()));
        Ok(SignedIn { tokens, user, profile })
    }

    pub async fn sign_out(&self, raw_refresh_token: Option<&str>) -> Result<(), AppError> {
        let mut identity_id = None;
        if let Some(raw) = raw_refresh_token {
            let token_hash = self.hash_token(raw);
            if let Some(record) = self.repo.take_refresh_token(&token_hash).await? {
                self.repo.delete_refresh_family(record.family_id).await?;
                identity_id = Some(record.identity_id);
            }
        }

        info!(identity_id = ?identity_id, "Signed out");
        self.events.publish_session(SessionEvent::SignedOut { identity_id });
        Ok(())
    }

    /// Validated claims for an access token, or `None` for a guest.
    pub fn decode_claims(&self, access_token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[AUDIENCE]);
        validation.set_issuer(&[self.issuer.as_str()]);

        decode::<Claims>(access_token, &self.decoding_key, &validation)
            .ok()
            .map(|data| data.claims)
    }

    pub fn current_session(&self, access_token: &str) -> Option<Session> {
        let claims = self.decode_claims(access_token)?;
        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp as i64, 0)?;
        Some(Session {
            user: SessionUser { id: claims.sub, email: claims.email },
            expires_at,
        })
    }

    async fn issue_token_pair(&self, identity: &Identity, family_id: Uuid) -> Result<TokenPair, AppError> {
        let csrf_token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect();
        let now = Utc::now();
        let exp = (now + Duration::minutes(ACCESS_TTL_MINUTES)).timestamp() as usize;

        let claims = Claims {
            iss: self.issuer.clone(),
            sub: identity.id.clone(),
            aud: AUDIENCE.to_string(),
            exp,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            email: identity.email.clone(),
            csrf_token: csrf_token.clone(),
        };

        let access_token = encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .map_err(|e| {
                error!("JWT encoding failed: {}", e);
                AppError::Internal
            })?;

        let refresh_token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect();

        let refresh_record = RefreshTokenRecord {
            token_hash: self.hash_token(&refresh_token),
            identity_id: identity.id.clone(),
            family_id,
            expires_at: now + Duration::days(REFRESH_TTL_DAYS),
            created_at: now,
        };

        self.repo.create_refresh_token(&refresh_record).await?;
        Ok(TokenPair { access_token, refresh_token, csrf_token })
    }

    pub fn hash_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}
