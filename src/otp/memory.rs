//! Process-local [`OtpService`].
//!
//! Accounts, pending registrations and password resets live in three maps
//! keyed by normalized email behind a single async mutex. A code is stored as a
//! hash bound to its email, expires after the configured TTL, is burned after
//! `max_attempts` wrong guesses and is consumed on first successful use.
//!
//! Issuing a new code for an email replaces any outstanding one, and every
//! issue first drops codes older than the TTL. The mutex is never held across
//! password hashing or the notifier call; hashing runs on the blocking pool.

use async_trait::async_trait;
use secrecy::SecretString;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::code::{code_matches, generate_code, hash_code};
use super::config::OtpConfig;
use super::notifier::{CodeNotice, CodeNotifier, CodePurpose};
use super::password::{hash_password_blocking, verify_password_blocking};
use super::types::{OtpChallenge, RegisterRequest, RegisterVerified, Role};
use super::validation::{
    normalize_email, require_code, require_email, require_full_name, require_password,
    require_same_actor,
};
use super::{OtpError, OtpResult, OtpService};

const MSG_CODE_EXPIRED: &str = "Code expired, request a new one";
const MSG_CODE_INVALID: &str = "Invalid code";
const MSG_TOO_MANY_ATTEMPTS: &str = "Too many attempts, request a new code";

#[derive(Debug)]
struct Account {
    full_name: String,
    role: Role,
    password_hash: String,
}

#[derive(Debug)]
struct IssuedCode {
    code_hash: Vec<u8>,
    issued_at: Instant,
    attempts: u32,
}

#[derive(Debug, PartialEq, Eq)]
enum CodeCheck {
    Valid,
    Expired,
    Wrong,
    Exhausted,
}

impl IssuedCode {
    fn new(email: &str, code: &str) -> Self {
        Self {
            code_hash: hash_code(email, code),
            issued_at: Instant::now(),
            attempts: 0,
        }
    }

    fn check(&mut self, email: &str, code: &str, config: &OtpConfig) -> CodeCheck {
        if self.issued_at.elapsed() >= config.code_ttl() {
            return CodeCheck::Expired;
        }
        if code_matches(&self.code_hash, email, code) {
            return CodeCheck::Valid;
        }
        self.attempts += 1;
        if self.attempts >= config.max_attempts() {
            CodeCheck::Exhausted
        } else {
            CodeCheck::Wrong
        }
    }
}

#[derive(Debug)]
struct PendingRegistration {
    account: Account,
    code: IssuedCode,
}

#[derive(Debug, Default)]
struct Store {
    accounts: HashMap<String, Account>,
    registrations: HashMap<String, PendingRegistration>,
    resets: HashMap<String, IssuedCode>,
}

impl Store {
    fn prune_expired(&mut self, ttl: Duration) {
        self.registrations
            .retain(|_, pending| pending.code.issued_at.elapsed() < ttl);
        self.resets.retain(|_, issued| issued.issued_at.elapsed() < ttl);
    }
}

pub struct InMemoryOtpService {
    config: OtpConfig,
    notifier: Arc<dyn CodeNotifier>,
    store: Mutex<Store>,
}

impl InMemoryOtpService {
    #[must_use]
    pub fn new(config: OtpConfig, notifier: Arc<dyn CodeNotifier>) -> Self {
        Self {
            config,
            notifier,
            store: Mutex::new(Store::default()),
        }
    }

    pub async fn has_account(&self, email: &str) -> bool {
        let email = normalize_email(email);
        self.store.lock().await.accounts.contains_key(&email)
    }

    /// Check a password against the stored account hash.
    pub async fn password_matches(&self, email: &str, password: &str) -> bool {
        let email = normalize_email(email);
        let stored = self
            .store
            .lock()
            .await
            .accounts
            .get(&email)
            .map(|account| account.password_hash.clone());
        match stored {
            Some(hash) => verify_password_blocking(password.to_string(), hash).await,
            None => false,
        }
    }

    fn challenge(&self, email: String, code: &str, message: &str) -> OtpChallenge {
        OtpChallenge {
            message: message.to_string(),
            email,
            expires_in_seconds: self.config.code_ttl_seconds(),
            dev_code: self.config.dev_codes().then(|| code.to_string()),
        }
    }
}

fn code_failure(check: &CodeCheck) -> OtpError {
    match check {
        CodeCheck::Expired => OtpError::invalid(MSG_CODE_EXPIRED),
        CodeCheck::Exhausted => OtpError::invalid(MSG_TOO_MANY_ATTEMPTS),
        CodeCheck::Wrong | CodeCheck::Valid => OtpError::invalid(MSG_CODE_INVALID),
    }
}

#[async_trait]
impl OtpService for InMemoryOtpService {
    #[instrument(skip_all)]
    async fn start_register(&self, request: RegisterRequest) -> OtpResult<OtpChallenge> {
        let email = require_email(request.email.as_deref())?;
        let full_name = require_full_name(request.full_name.as_deref())?;
        let password = require_password(request.password)?;
        let role = match request.role.as_deref().map(str::trim) {
            None | Some("") => Role::default(),
            Some(value) => Role::parse(value)
                .ok_or_else(|| OtpError::invalid("Role must be student or teacher"))?,
        };

        if self.store.lock().await.accounts.contains_key(&email) {
            return Err(OtpError::invalid("Email is already registered"));
        }

        let password_hash = hash_password_blocking(password).await?;
        let code = generate_code();
        let issued = IssuedCode::new(&email, &code);
        let issued_hash = issued.code_hash.clone();

        {
            let mut store = self.store.lock().await;
            if store.accounts.contains_key(&email) {
                return Err(OtpError::invalid("Email is already registered"));
            }
            store.prune_expired(self.config.code_ttl());
            store.registrations.insert(
                email.clone(),
                PendingRegistration {
                    account: Account {
                        full_name,
                        role,
                        password_hash,
                    },
                    code: issued,
                },
            );
        }

        let notice = CodeNotice {
            email: &email,
            purpose: CodePurpose::Registration,
            code: &code,
        };
        if let Err(err) = self.notifier.notify(&notice).await {
            let mut store = self.store.lock().await;
            // A concurrent start may already have replaced this entry.
            if store
                .registrations
                .get(&email)
                .is_some_and(|pending| pending.code.code_hash == issued_hash)
            {
                store.registrations.remove(&email);
            }
            drop(store);
            return Err(OtpError::Internal(
                err.context("failed to hand off registration code"),
            ));
        }

        info!(email = %email, role = %role, "registration code issued");

        Ok(self.challenge(email, &code, "Verification code sent to your email"))
    }

    #[instrument(skip_all)]
    async fn verify_register(&self, email: &str, code: &str) -> OtpResult<RegisterVerified> {
        let email = require_email(Some(email))?;
        let code = require_code(Some(code))?;

        let mut store = self.store.lock().await;
        let Some(pending) = store.registrations.get_mut(&email) else {
            return Err(OtpError::invalid("No pending registration for this email"));
        };

        let check = pending.code.check(&email, code, &self.config);
        match check {
            CodeCheck::Valid => {}
            CodeCheck::Wrong => {
                debug!(email = %email, attempts = pending.code.attempts, "wrong registration code");
                return Err(code_failure(&check));
            }
            CodeCheck::Expired | CodeCheck::Exhausted => {
                store.registrations.remove(&email);
                warn!(email = %email, outcome = ?check, "registration code discarded");
                return Err(code_failure(&check));
            }
        }

        let Some(pending) = store.registrations.remove(&email) else {
            return Err(OtpError::invalid("No pending registration for this email"));
        };
        if store.accounts.contains_key(&email) {
            return Err(OtpError::invalid("Email is already registered"));
        }

        let verified = RegisterVerified {
            success: true,
            message: "Registration completed".to_string(),
            email: email.clone(),
            full_name: pending.account.full_name.clone(),
            role: pending.account.role,
        };
        store.accounts.insert(email.clone(), pending.account);
        drop(store);

        info!(email = %email, "registration verified");

        Ok(verified)
    }

    #[instrument(skip_all)]
    async fn start_password_change(
        &self,
        email: Option<&str>,
        actor_email: Option<&str>,
    ) -> OtpResult<OtpChallenge> {
        let email = require_email(email)?;
        require_same_actor(&email, actor_email)?;

        let code = generate_code();
        let issued = IssuedCode::new(&email, &code);
        let issued_hash = issued.code_hash.clone();
        {
            let mut store = self.store.lock().await;
            if !store.accounts.contains_key(&email) {
                return Err(OtpError::invalid("No account found for this email"));
            }
            store.prune_expired(self.config.code_ttl());
            store.resets.insert(email.clone(), issued);
        }

        let notice = CodeNotice {
            email: &email,
            purpose: CodePurpose::PasswordReset,
            code: &code,
        };
        if let Err(err) = self.notifier.notify(&notice).await {
            let mut store = self.store.lock().await;
            if store
                .resets
                .get(&email)
                .is_some_and(|issued| issued.code_hash == issued_hash)
            {
                store.resets.remove(&email);
            }
            drop(store);
            return Err(OtpError::Internal(
                err.context("failed to hand off password reset code"),
            ));
        }

        info!(email = %email, "password reset code issued");

        Ok(self.challenge(email, &code, "Password reset code sent to your email"))
    }

    #[instrument(skip_all)]
    async fn complete_password_change(
        &self,
        email: Option<&str>,
        code: Option<&str>,
        new_password: Option<SecretString>,
        actor_email: Option<&str>,
    ) -> OtpResult<()> {
        let email = require_email(email)?;
        require_same_actor(&email, actor_email)?;
        let code = require_code(code)?;
        let new_password = require_password(new_password)?;

        {
            let mut store = self.store.lock().await;
            let Some(issued) = store.resets.get_mut(&email) else {
                return Err(OtpError::invalid("No password reset requested for this email"));
            };
            let check = issued.check(&email, code, &self.config);
            match check {
                CodeCheck::Valid => {
                    store.resets.remove(&email);
                }
                CodeCheck::Wrong => return Err(code_failure(&check)),
                CodeCheck::Expired | CodeCheck::Exhausted => {
                    store.resets.remove(&email);
                    warn!(email = %email, outcome = ?check, "password reset code discarded");
                    return Err(code_failure(&check));
                }
            }
        }

        // The code is already consumed; hashing happens outside the lock.
        let password_hash = hash_password_blocking(new_password).await?;

        let mut store = self.store.lock().await;
        let Some(account) = store.accounts.get_mut(&email) else {
            return Err(OtpError::invalid("No account found for this email"));
        };
        account.password_hash = password_hash;
        drop(store);

        info!(email = %email, "password changed");

        Ok(())
    }
}
